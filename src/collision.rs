//! Pairwise collision detection and outcome dispatch.
//!
//! Every unordered pair of living entities is tested once per tick.  What
//! happens on overlap is looked up in a symmetric kind-by-kind table, so the
//! table can be checked on its own.  Removals are queued, never applied
//! during the sweep.

use tracing::debug;

use crate::config::{AssetRef, Rules};
use crate::entities::{Entity, EntityKind, GameState, Role};
use crate::hooks::Hooks;
use crate::shooting;
use crate::wave;

/// Result of two kinds touching.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Alien dies, the shot is spent.
    AlienShot,
    /// The player is destroyed.
    ShipHit,
    /// Meteor and shot both destroyed.
    MeteorShot,
    /// Both meteors take their average vertical speed.
    MeteorMerge,
    Nothing,
}

/// Outcome for an unordered kind pair.
pub fn outcome(a: EntityKind, b: EntityKind) -> Outcome {
    use EntityKind::*;
    match (a, b) {
        (Explosion, _) | (_, Explosion) => Outcome::Nothing,
        (Alien, PlayerShot | AlienShot) | (PlayerShot | AlienShot, Alien) => Outcome::AlienShot,
        (Ship, AlienShot | Meteor) | (AlienShot | Meteor, Ship) => Outcome::ShipHit,
        (Meteor, PlayerShot | AlienShot) | (PlayerShot | AlienShot, Meteor) => Outcome::MeteorShot,
        (Meteor, Meteor) => Outcome::MeteorMerge,
        _ => Outcome::Nothing,
    }
}

/// Queue an explosion at `(x, y)` and tell the presentation layer.
pub fn spawn_explosion(state: &mut GameState, rules: &Rules, hooks: &mut impl Hooks, x: f64, y: f64) {
    let id = state.alloc_id();
    let explosion = Entity::new(
        id,
        Role::Explosion {
            ttl_ms: rules.config.explosion_ttl_ms,
        },
        AssetRef::EXPLOSION,
        rules.sheet.explosion,
        x,
        y,
    );
    state.pending_spawn.push(explosion);
    hooks.explosion(x, y);
}

/// Test all pairs and dispatch the overlaps.  Returns the number of
/// overlapping pairs found.
pub fn resolve_collisions(state: &mut GameState, rules: &Rules, hooks: &mut impl Hooks) -> usize {
    let mut hits = 0;
    let n = state.entities.len();
    for p in 0..n {
        for s in (p + 1)..n {
            let (me, him) = (&state.entities[p], &state.entities[s]);
            if !me.alive || !him.alive || !me.overlaps(him) {
                continue;
            }
            hits += 1;
            dispatch(state, rules, hooks, p, s);
        }
    }
    hits
}

fn dispatch(state: &mut GameState, rules: &Rules, hooks: &mut impl Hooks, p: usize, s: usize) {
    let (kp, ks) = (state.entities[p].kind(), state.entities[s].kind());
    match outcome(kp, ks) {
        Outcome::AlienShot => {
            let (alien, shot) = if kp == EntityKind::Alien { (p, s) } else { (s, p) };
            kill_alien(state, rules, hooks, alien, shot);
        }
        Outcome::ShipHit => wave::on_ship_death(state, rules, hooks),
        Outcome::MeteorShot => {
            let meteor = if kp == EntityKind::Meteor { p } else { s };
            let (x, y) = (state.entities[meteor].x, state.entities[meteor].y);
            spawn_explosion(state, rules, hooks, x, y);
            state.retire(p);
            state.retire(s);
        }
        Outcome::MeteorMerge => {
            let avg = (state.entities[p].dy + state.entities[s].dy) / 2.0;
            state.entities[p].dy = avg;
            state.entities[s].dy = avg;
        }
        Outcome::Nothing => {}
    }
}

fn kill_alien(state: &mut GameState, rules: &Rules, hooks: &mut impl Hooks, alien: usize, shot: usize) {
    let (x, y) = (state.entities[alien].x, state.entities[alien].y);
    let Some(slot) = state.entities[alien].alien().copied() else {
        return;
    };
    state.retire(alien);
    state.retire(shot);
    spawn_explosion(state, rules, hooks, x, y);
    debug!(row = slot.row, column = slot.column, "alien destroyed");

    if slot.shot_allowed {
        shooting::transfer_shooting_right(&mut state.entities, &slot);
    }
    wave::on_alien_killed(state, rules, hooks);
}
