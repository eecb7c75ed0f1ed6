//! Per-tick movement: `position += velocity * elapsed`.
//!
//! Movement never removes anything directly.  Entities that leave the field
//! (or explosions that expire) are queued for the end-of-tick flush, and an
//! alien reaching a side edge only raises the formation trigger.

use crate::config::{Rules, SimConfig};
use crate::entities::{Entity, EntityKind, FormationPhase, GameState, Role};

/// True if this alien is at a side edge while still heading into it.
pub fn alien_at_edge(alien: &Entity, config: &SimConfig) -> bool {
    (alien.dx < 0.0 && alien.x < config.alien_left_edge)
        || (alien.dx > 0.0 && alien.x > config.alien_right_edge)
}

fn ship_blocked(ship: &Entity, config: &SimConfig) -> bool {
    (ship.dx < 0.0 && ship.x < config.ship_min_x) || (ship.dx > 0.0 && ship.x > config.ship_max_x)
}

/// Advance every living entity by `elapsed_ms`.
pub fn move_entities(state: &mut GameState, rules: &Rules, elapsed_ms: f64) {
    let config = &rules.config;
    let secs = elapsed_ms / 1000.0;
    let GameState {
        entities,
        pending_removal,
        formation,
        ..
    } = state;

    for entity in entities.iter_mut().filter(|e| e.alive) {
        match entity.kind() {
            EntityKind::Ship if ship_blocked(entity, config) => continue,
            EntityKind::Alien if alien_at_edge(entity, config) => {
                *formation = FormationPhase::Triggered;
            }
            _ => {}
        }

        let mut expired = false;
        if let Role::Explosion { ttl_ms } = &mut entity.role {
            *ttl_ms -= elapsed_ms;
            expired = *ttl_ms <= 0.0;
        }

        entity.x += entity.dx * secs;
        entity.y += entity.dy * secs;

        let gone = match entity.role {
            Role::Meteor => entity.y > config.field_height,
            Role::PlayerShot => entity.y < config.player_shot_min_y,
            Role::AlienShot => entity.y > config.alien_shot_max_y,
            _ => expired,
        };
        if gone {
            entity.retire(pending_removal);
        }
    }
}
