//! Shooting rights and shot spawning.
//!
//! One living alien per column may fire.  When it dies the right passes to
//! the nearest alien up to two rows above it in the same column, or is lost.

use rand::Rng;
use tracing::debug;

use crate::config::{AssetRef, Rules, SimConfig};
use crate::entities::{AlienSlot, Entity, EntityId, GameState, Role};

// ── Right transfer ────────────────────────────────────────────────────────────

/// Pass the shooting right of a dead alien to its successor.
///
/// Scans newest-first and stops at the first living alien in the same
/// column one or two rows above.  Returns the id of the new holder, or
/// `None` when the column has no eligible successor and the right is lost.
pub fn transfer_shooting_right(entities: &mut [Entity], dead: &AlienSlot) -> Option<EntityId> {
    let dead_row = i64::from(dead.row);
    for entity in entities.iter_mut().rev().filter(|e| e.alive) {
        let id = entity.id;
        if let Some(slot) = entity.alien_mut() {
            let row = i64::from(slot.row);
            if slot.column == dead.column && (row == dead_row - 1 || row == dead_row - 2) {
                slot.shot_allowed = true;
                debug!(column = dead.column, row = slot.row, "shooting right transferred");
                return Some(id);
            }
        }
    }
    debug!(column = dead.column, "shooting right lost");
    None
}

// ── Enemy fire ────────────────────────────────────────────────────────────────

/// Whether the ship sits in the alien's firing lane: the ship's centre lies
/// within the alien's horizontal span.
pub fn has_target(alien: &Entity, ship: &Entity) -> bool {
    let cx = ship.center_x();
    cx >= alien.x && cx <= alien.x + alien.footprint.width
}

/// Required quiet time before the next alien shot, drawn per candidate.
pub fn alien_fire_threshold(config: &SimConfig, rng: &mut impl Rng) -> i64 {
    if rng.gen_bool(config.alien_fire_slow_chance) {
        config.alien_fire_slow_ms
    } else {
        config.alien_fire_fast_ms
    }
}

/// Decide whether an alien fires this tick and queue its shot.
///
/// Every armed, on-target alien whose cooldown has elapsed overwrites the
/// previous candidate, so the last match in scan order is the one that
/// fires.  The cooldown is reset inside the scan.
pub fn alien_fire(state: &mut GameState, rules: &Rules, rng: &mut impl Rng) -> Option<EntityId> {
    let config = &rules.config;
    let ship = state.ship()?.clone();

    let mut chosen: Option<(f64, f64)> = None;
    for alien in state.entities.iter().filter(|e| e.alive) {
        let armed = alien.alien().is_some_and(|slot| slot.shot_allowed);
        if !armed || !has_target(alien, &ship) {
            continue;
        }
        let threshold = alien_fire_threshold(config, rng);
        if state.clock_ms - state.last_alien_fire_ms >= threshold {
            chosen = Some((alien.x, alien.y + config.alien_shot_offset_y));
            state.last_alien_fire_ms = state.clock_ms
                - i64::from(state.level.number()) * config.alien_refire_bonus_ms;
        }
    }

    let (x, y) = chosen?;
    let id = state.alloc_id();
    let shot = Entity::new(id, Role::AlienShot, AssetRef::ALIEN_SHOT, rules.sheet.alien_shot, x, y)
        .with_velocity(0.0, config.alien_shot_speed);
    state.pending_spawn.push(shot);
    debug!(x, y, "alien fired");
    Some(id)
}

// ── Player fire ───────────────────────────────────────────────────────────────

/// Fire from the ship if the fire interval has passed; otherwise the request
/// is dropped.  Runs after the removal flush, so the shot is inserted
/// directly.
pub fn try_player_fire(state: &mut GameState, rules: &Rules) -> Option<EntityId> {
    let config = &rules.config;
    if state.clock_ms - state.last_player_fire_ms < config.player_fire_interval_ms {
        return None;
    }
    let (sx, sy) = state.ship().map(|s| (s.x, s.y))?;
    state.last_player_fire_ms = state.clock_ms;

    let id = state.alloc_id();
    let (ox, oy) = config.player_shot_offset;
    let shot = Entity::new(
        id,
        Role::PlayerShot,
        AssetRef::PLAYER_SHOT,
        rules.sheet.player_shot,
        sx + ox,
        sy + oy,
    )
    .with_velocity(0.0, config.player_shot_speed);
    state.entities.push(shot);
    Some(id)
}
