//! Wave control: formation seeding, win/loss, speed-up and the meteor
//! gauntlet.

use rand::Rng;
use tracing::{debug, info};

use crate::collision::spawn_explosion;
use crate::config::{AssetRef, Level, Rules};
use crate::entities::{AlienSlot, Controls, Entity, FormationPhase, GameState, Role};
use crate::hooks::Hooks;

pub const LOSS_MESSAGE: &str = "Oh no! They got you, try again?";
pub const WIN_MESSAGE: &str = "Well done! You Win!";

// ── Seeding ───────────────────────────────────────────────────────────────────

/// Clear the field and lay out the ship plus the formation for the current
/// level.  Only the bottom row starts with shooting rights.
pub fn seed_level(state: &mut GameState, rules: &Rules) {
    let config = &rules.config;
    state.entities.clear();
    state.pending_removal.clear();
    state.pending_spawn.clear();

    let id = state.alloc_id();
    let (sx, sy) = config.ship_spawn;
    state
        .entities
        .push(Entity::new(id, Role::Ship, AssetRef::SHIP, rules.sheet.ship, sx, sy));

    state.alien_count = 0;
    let (Some(asset), Some(footprint)) = (state.level.alien_asset(), rules.sheet.alien(state.level))
    else {
        return;
    };

    let (ox, oy) = config.formation_origin;
    let (gap_x, gap_y) = config.formation_spacing;
    let bottom = config.formation_rows - 1;
    for row in 0..config.formation_rows {
        for column in 0..config.formation_columns {
            let id = state.alloc_id();
            let slot = AlienSlot {
                row,
                column,
                shot_allowed: row == bottom,
            };
            let x = ox + f64::from(column) * gap_x;
            let y = oy + f64::from(row) * gap_y;
            let alien = Entity::new(id, Role::Alien(slot), asset, footprint, x, y)
                .with_velocity(-config.alien_speed, 0.0);
            state.entities.push(alien);
            state.alien_count += 1;
        }
    }
    debug!(level = state.level.number(), aliens = state.alien_count, "formation seeded");
}

/// Start a fresh game at the current level.
pub fn new_game(state: &mut GameState, rules: &Rules) {
    seed_level(state, rules);
    state.controls = Controls::default();
    state.formation = FormationPhase::Idle;
    state.last_alien_fire_ms = state.clock_ms;
    state.gauntlet_ticks = 0;
    state.waiting_for_ack = false;
    state.paused = false;
    state.message.clear();
    info!(level = state.level.number(), label = state.level.label(), "new game");
}

// ── Win / loss ────────────────────────────────────────────────────────────────

/// An alien died: count it, then either win or speed up the survivors.
pub fn on_alien_killed(state: &mut GameState, rules: &Rules, hooks: &mut impl Hooks) {
    state.alien_count = state.alien_count.saturating_sub(1);
    if state.alien_count == 0 {
        on_win(state, hooks);
        return;
    }
    let factor = rules.config.speed_up_factor;
    for alien in state
        .entities
        .iter_mut()
        .filter(|e| e.alive && e.alien().is_some())
    {
        alien.dx *= factor;
    }
}

/// Every alien is gone.  The next acknowledgement starts the next level.
pub fn on_win(state: &mut GameState, hooks: &mut impl Hooks) {
    let cleared = state.level;
    state.level = cleared.next();
    state.waiting_for_ack = true;
    state.message = WIN_MESSAGE.to_string();
    info!(
        cleared = cleared.number(),
        next = state.level.number(),
        "level cleared"
    );
    hooks.win(WIN_MESSAGE);
}

/// The ship was hit or the formation landed.  Only the first death while
/// playing counts.
pub fn on_ship_death(state: &mut GameState, rules: &Rules, hooks: &mut impl Hooks) {
    if state.waiting_for_ack {
        return;
    }
    if let Some((x, y)) = state.ship().map(|s| (s.x, s.y)) {
        spawn_explosion(state, rules, hooks, x, y);
    }
    state.waiting_for_ack = true;
    state.message = LOSS_MESSAGE.to_string();
    info!(level = state.level.number(), "ship destroyed");
    hooks.game_over(LOSS_MESSAGE);
}

// ── Meteor gauntlet ───────────────────────────────────────────────────────────

/// On the gauntlet level, drop a meteor every `meteor_every_ticks` ticks.
pub fn maybe_spawn_meteor(state: &mut GameState, rules: &Rules, rng: &mut impl Rng) -> bool {
    if state.level != Level::GAUNTLET {
        return false;
    }
    let config = &rules.config;
    let due = state.gauntlet_ticks % config.meteor_every_ticks == 0;
    state.gauntlet_ticks += 1;
    if !due || state.waiting_for_ack {
        return false;
    }

    let x = rng.gen_range(0.0..config.field_width);
    let dx = if rng.gen_bool(config.meteor_drift_chance) {
        config.meteor_drift_speed
    } else {
        0.0
    };
    let id = state.alloc_id();
    let meteor = Entity::new(
        id,
        Role::Meteor,
        AssetRef::METEOR,
        rules.sheet.meteor,
        x,
        config.meteor_spawn_y,
    )
    .with_velocity(dx, config.meteor_speed);
    state.pending_spawn.push(meteor);
    debug!(x, dx, "meteor spawned");
    true
}
