use invaders_sim::config::{AssetRef, Level};
use invaders_sim::entities::*;

fn shot(id: EntityId, x: f64, y: f64) -> Entity {
    Entity::new(id, Role::PlayerShot, AssetRef::PLAYER_SHOT, Footprint::new(6.0, 18.0), x, y)
}

fn alien(id: EntityId, row: u32, column: u32, x: f64, y: f64) -> Entity {
    let slot = AlienSlot {
        row,
        column,
        shot_allowed: false,
    };
    Entity::new(id, Role::Alien(slot), AssetRef::ALIEN_LEVEL_1, Footprint::new(50.0, 30.0), x, y)
}

#[test]
fn role_maps_to_kind() {
    assert_eq!(Role::Ship.kind(), EntityKind::Ship);
    assert_eq!(Role::Meteor.kind(), EntityKind::Meteor);
    assert_eq!(Role::Explosion { ttl_ms: 150.0 }.kind(), EntityKind::Explosion);
    assert_eq!(alien(1, 0, 0, 0.0, 0.0).kind(), EntityKind::Alien);
}

#[test]
fn alien_accessors_only_match_aliens() {
    let mut a = alien(1, 2, 7, 0.0, 0.0);
    assert_eq!(a.alien().map(|s| (s.row, s.column)), Some((2, 7)));
    a.alien_mut().unwrap().shot_allowed = true;
    assert!(a.alien().unwrap().shot_allowed);

    let mut s = shot(2, 0.0, 0.0);
    assert!(s.alien().is_none());
    assert!(s.alien_mut().is_none());
}

#[test]
fn overlap_requires_intersection_on_both_axes() {
    let a = alien(1, 0, 0, 100.0, 100.0); // 100..150 x 100..130
    assert!(a.overlaps(&shot(2, 120.0, 110.0)));
    assert!(shot(2, 120.0, 110.0).overlaps(&a));
    // Horizontally aligned but below
    assert!(!a.overlaps(&shot(3, 120.0, 140.0)));
    // Vertically aligned but to the side
    assert!(!a.overlaps(&shot(4, 160.0, 110.0)));
}

#[test]
fn touching_edges_do_not_overlap() {
    let a = alien(1, 0, 0, 100.0, 100.0);
    assert!(!a.overlaps(&shot(2, 150.0, 100.0)));
    assert!(!a.overlaps(&shot(3, 100.0, 130.0)));
}

#[test]
fn retire_queues_once() {
    let mut pending = Vec::new();
    let mut s = shot(9, 0.0, 0.0);
    assert!(s.retire(&mut pending));
    assert!(!s.retire(&mut pending));
    assert!(!s.alive);
    assert_eq!(pending, vec![9]);
}

#[test]
fn flush_removes_exactly_the_pending_set_then_appends_spawns() {
    let mut state = GameState::new(Level::first());
    for i in 0..5 {
        let id = state.alloc_id();
        state.entities.push(shot(id, i as f64 * 10.0, 0.0));
    }
    state.retire(1);
    state.retire(3);
    state.retire(3);
    let id = state.alloc_id();
    state.pending_spawn.push(shot(id, 500.0, 0.0));

    assert_eq!(state.pending_removal.len(), 2);
    let removed = state.flush();

    assert_eq!(removed, 2);
    assert!(state.pending_removal.is_empty());
    assert!(state.pending_spawn.is_empty());
    let ids: Vec<EntityId> = state.entities.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![1, 3, 5, 6]);
}

#[test]
fn alien_at_skips_retired_aliens() {
    let mut state = GameState::new(Level::first());
    state.entities.push(alien(1, 1, 4, 0.0, 0.0));
    assert!(state.alien_at(1, 4).is_some());
    state.retire(0);
    assert!(state.alien_at(1, 4).is_none());
}

#[test]
fn game_state_clone_is_independent() {
    let mut original = GameState::new(Level::first());
    original.entities.push(shot(1, 10.0, 10.0));
    let mut cloned = original.clone();

    cloned.entities[0].x = 99.0;
    cloned.alien_count = 12;
    cloned.entities.push(shot(2, 0.0, 0.0));

    assert_eq!(original.entities.len(), 1);
    assert_eq!(original.entities[0].x, 10.0);
    assert_eq!(original.alien_count, 0);
}

#[test]
fn new_state_waits_for_a_key() {
    let state = GameState::new(Level::first());
    assert!(state.waiting_for_ack);
    assert!(!state.paused);
    assert_eq!(state.formation, FormationPhase::Idle);
    assert_eq!(state.last_player_fire_ms, NEVER);
}
