//! The game loop body.
//!
//! `advance` runs one logical tick against an explicitly passed
//! `GameState`; `tick` is the non-mutating wrapper that returns a brand-new
//! state.  All randomness comes through the injected RNG, so a seeded RNG
//! replays a game exactly.
//!
//! Tick order: signals, move, render, collide, enemy fire, meteor cadence,
//! formation logic, removal flush, then ship velocity and player fire from
//! the held controls.

use rand::Rng;
use tracing::{info, trace};

use crate::collision;
use crate::config::{Level, Rules, SimConfig};
use crate::entities::{Controls, GameState};
use crate::formation;
use crate::hooks::{Hooks, SimView};
use crate::movement;
use crate::shooting;
use crate::wave;

pub const PAUSE_MESSAGE: &str = "PAUSED";

/// Everything the input collaborator hands over for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// Wall time since the previous tick.
    pub elapsed_ms: u64,
    pub move_left: bool,
    pub move_right: bool,
    pub fire: bool,
    /// Edge-triggered.
    pub pause_toggled: bool,
    /// Edge-triggered "any key".
    pub acknowledge: bool,
}

/// What happened during one call to `advance`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// False when the tick body was skipped (waiting or paused).
    pub simulated: bool,
    /// Size of the pending-removal set just before the flush.
    pub queued_removals: usize,
    /// Entities actually removed by the flush.
    pub removed: usize,
    pub collisions: usize,
    pub logic_ran: bool,
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Initial state: the level is laid out and the game waits for a key.
pub fn init_state(rules: &Rules, level: Level) -> GameState {
    let mut state = GameState::new(level);
    wave::seed_level(&mut state, rules);
    state.waiting_for_ack = true;
    state
}

pub fn view(state: &GameState) -> SimView<'_> {
    SimView {
        entities: &state.entities,
        level: state.level,
        message: &state.message,
        waiting: state.waiting_for_ack,
    }
}

/// Clamp pathological frame gaps (e.g. after the window was suspended).
pub fn clamp_elapsed(elapsed_ms: u64, config: &SimConfig) -> u64 {
    if elapsed_ms > config.max_elapsed_ms {
        trace!(elapsed_ms, clamp = config.max_elapsed_ms, "elapsed time clamped");
    }
    elapsed_ms.min(config.max_elapsed_ms)
}

// ── Signals ───────────────────────────────────────────────────────────────────

fn pause(state: &mut GameState) {
    state.paused = true;
    state.waiting_for_ack = true;
    state.message = PAUSE_MESSAGE.to_string();
    info!("paused");
}

fn resume(state: &mut GameState) {
    state.paused = false;
    state.waiting_for_ack = false;
    state.message.clear();
    info!("resumed");
}

/// Apply pause toggles and acknowledgements.  Returns true when this call
/// started a new game.
pub fn handle_signals(state: &mut GameState, rules: &Rules, input: &FrameInput) -> bool {
    if input.pause_toggled {
        if state.paused {
            resume(state);
        } else if !state.waiting_for_ack {
            pause(state);
        }
        return false;
    }
    if !input.acknowledge || !state.waiting_for_ack {
        return false;
    }
    if state.paused {
        resume(state);
        false
    } else {
        wave::new_game(state, rules);
        true
    }
}

// ── Controls ─────────────────────────────────────────────────────────────────

/// Set the ship's velocity from the held keys and try to fire.
pub fn resolve_controls(state: &mut GameState, rules: &Rules) {
    let Controls { left, right, fire } = state.controls;
    let speed = rules.config.ship_speed;
    if let Some(ship) = state.ship_mut() {
        ship.dx = match (left, right) {
            (true, false) => -speed,
            (false, true) => speed,
            _ => 0.0,
        };
    }
    if fire {
        shooting::try_player_fire(state, rules);
    }
}

// ── Per-tick update ───────────────────────────────────────────────────────────

/// Run one tick in place.
pub fn advance(
    state: &mut GameState,
    rules: &Rules,
    input: &FrameInput,
    rng: &mut impl Rng,
    hooks: &mut impl Hooks,
) -> TickReport {
    let mut report = TickReport::default();

    let fresh_start = handle_signals(state, rules, input);
    if state.waiting_for_ack {
        hooks.render(&view(state));
        return report;
    }
    // The key that started the game is not also a move or fire.
    if !fresh_start {
        state.controls = Controls {
            left: input.move_left,
            right: input.move_right,
            fire: input.fire,
        };
    }
    report.simulated = true;

    let elapsed = clamp_elapsed(input.elapsed_ms, &rules.config);
    state.clock_ms += elapsed as i64;

    // ── 1. Move ──────────────────────────────────────────────────────────────
    movement::move_entities(state, rules, elapsed as f64);
    hooks.render(&view(state));

    // ── 2. Collide ───────────────────────────────────────────────────────────
    report.collisions = collision::resolve_collisions(state, rules, hooks);

    // ── 3. Enemy fire and hazards ────────────────────────────────────────────
    if state.level.has_formation() {
        shooting::alien_fire(state, rules, rng);
    }
    wave::maybe_spawn_meteor(state, rules, rng);

    // ── 4. Formation logic ───────────────────────────────────────────────────
    report.logic_ran = formation::run_logic_pass(state, rules, hooks);

    // ── 5. Flush ─────────────────────────────────────────────────────────────
    report.queued_removals = state.pending_removal.len();
    report.removed = state.flush();

    // ── 6. Controls for the next tick ────────────────────────────────────────
    resolve_controls(state, rules);

    report
}

/// Advance a copy of `state` by one tick and return it.
pub fn tick(
    state: &GameState,
    rules: &Rules,
    input: &FrameInput,
    rng: &mut impl Rng,
    hooks: &mut impl Hooks,
) -> GameState {
    let mut next = state.clone();
    advance(&mut next, rules, input, rng, hooks);
    next
}
