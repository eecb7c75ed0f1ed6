//! Formation logic: the lazily-triggered reversal and descent of the grid.
//!
//! Any alien touching a side edge moves the phase to `Triggered`.  The logic
//! pass consumes the trigger exactly once, however many aliens raised it.

use tracing::{debug, info};

use crate::config::Rules;
use crate::entities::{FormationPhase, GameState};
use crate::hooks::Hooks;
use crate::wave;

/// Raise the trigger; consumed by the next logic pass.
pub fn request_logic(state: &mut GameState) {
    state.formation = FormationPhase::Triggered;
}

/// Run the pending reversal/descent, if any.  Returns whether it ran.
pub fn run_logic_pass(state: &mut GameState, rules: &Rules, hooks: &mut impl Hooks) -> bool {
    if state.formation != FormationPhase::Triggered {
        return false;
    }
    state.formation = FormationPhase::Idle;

    let config = &rules.config;
    let mut invaded = false;
    for alien in state
        .entities
        .iter_mut()
        .filter(|e| e.alive && e.alien().is_some())
    {
        alien.dx = -alien.dx;
        alien.y += config.descent_step;
        invaded |= alien.y > config.invasion_line;
    }
    debug!(level = state.level.number(), invaded, "formation reversed");

    if invaded {
        info!("formation reached the invasion line");
        wave::on_ship_death(state, rules, hooks);
    }
    true
}
