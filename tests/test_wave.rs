use invaders_sim::compute::init_state;
use invaders_sim::config::{Level, Rules};
use invaders_sim::entities::*;
use invaders_sim::hooks::{EventLog, SimEvent};
use invaders_sim::wave::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn playing(rules: &Rules, level: Level) -> GameState {
    let mut state = init_state(rules, level);
    new_game(&mut state, rules);
    state
}

fn meteors(state: &GameState) -> Vec<&Entity> {
    state
        .pending_spawn
        .iter()
        .filter(|e| e.kind() == EntityKind::Meteor)
        .collect()
}

// ── Seeding ───────────────────────────────────────────────────────────────────

#[test]
fn formation_levels_seed_ship_and_thirty_aliens() {
    let rules = Rules::default();
    for n in 1..=3 {
        let state = playing(&rules, Level::new(n).unwrap());
        assert_eq!(state.entities.len(), 31);
        assert_eq!(state.entities[0].kind(), EntityKind::Ship);
        assert_eq!((state.entities[0].x, state.entities[0].y), (370.0, 550.0));
        assert_eq!(state.alien_count, 30);
        assert_eq!(state.aliens().count(), 30);
        assert!(state.aliens().all(|(e, _)| e.dx == -75.0));
    }
}

#[test]
fn formation_grid_positions() {
    let rules = Rules::default();
    let state = playing(&rules, Level::first());
    let alien = state.alien_at(2, 9).unwrap();
    assert_eq!((alien.x, alien.y), (100.0 + 9.0 * 70.0, 50.0 + 2.0 * 50.0));
    let armed: Vec<u32> = state
        .aliens()
        .filter(|(_, s)| s.shot_allowed)
        .map(|(_, s)| s.row)
        .collect();
    assert_eq!(armed, vec![2; 10]);
}

#[test]
fn gauntlet_seeds_only_the_ship() {
    let rules = Rules::default();
    let state = playing(&rules, Level::GAUNTLET);
    assert_eq!(state.entities.len(), 1);
    assert_eq!(state.alien_count, 0);
    assert!(state.ship().is_some());
}

#[test]
fn new_game_clears_the_previous_round() {
    let rules = Rules::default();
    let mut state = playing(&rules, Level::first());
    state.retire(3);
    state.formation = FormationPhase::Triggered;
    state.message = LOSS_MESSAGE.to_string();
    state.waiting_for_ack = true;
    state.clock_ms = 9000;

    new_game(&mut state, &rules);
    assert_eq!(state.entities.len(), 31);
    assert!(state.pending_removal.is_empty());
    assert_eq!(state.formation, FormationPhase::Idle);
    assert!(state.message.is_empty());
    assert!(!state.waiting_for_ack);
    assert_eq!(state.last_alien_fire_ms, 9000);
}

// ── Alien death and win ───────────────────────────────────────────────────────

#[test]
fn each_kill_speeds_up_the_survivors() {
    let rules = Rules::default();
    let mut state = playing(&rules, Level::first());
    state.retire(1);
    let mut hooks = EventLog::default();
    on_alien_killed(&mut state, &rules, &mut hooks);

    assert_eq!(state.alien_count, 29);
    assert!(state.aliens().all(|(e, _)| e.dx == -75.0 * 1.02));
    assert!(hooks.events.is_empty());
}

#[test]
fn last_kill_wins_and_advances_the_level() {
    let rules = Rules::default();
    let mut state = playing(&rules, Level::first());
    state.alien_count = 1;
    let mut hooks = EventLog::default();
    on_alien_killed(&mut state, &rules, &mut hooks);

    assert_eq!(state.alien_count, 0);
    assert_eq!(state.level.number(), 2);
    assert!(state.waiting_for_ack);
    assert_eq!(state.message, WIN_MESSAGE);
    assert_eq!(hooks.events, vec![SimEvent::Win(WIN_MESSAGE.to_string())]);
}

#[test]
fn winning_the_gauntlet_wraps_to_the_first_level() {
    let mut state = GameState::new(Level::GAUNTLET);
    state.waiting_for_ack = false;
    let mut hooks = EventLog::default();
    on_win(&mut state, &mut hooks);
    assert_eq!(state.level, Level::first());
    assert_eq!(hooks.wins(), 1);
}

#[test]
fn ship_death_while_waiting_is_ignored() {
    let rules = Rules::default();
    let mut state = playing(&rules, Level::first());
    let mut hooks = EventLog::default();
    on_ship_death(&mut state, &rules, &mut hooks);
    on_ship_death(&mut state, &rules, &mut hooks);

    assert_eq!(state.message, LOSS_MESSAGE);
    assert_eq!(hooks.game_overs(), 1);
    assert_eq!(hooks.explosions(), 1);
    assert_eq!(state.level, Level::first());
}

// ── Meteors ───────────────────────────────────────────────────────────────────

#[test]
fn meteors_fall_every_tenth_gauntlet_tick() {
    let rules = Rules::default();
    let mut state = playing(&rules, Level::GAUNTLET);
    let mut rng = StdRng::seed_from_u64(7);

    let spawned: Vec<bool> = (0..21)
        .map(|_| maybe_spawn_meteor(&mut state, &rules, &mut rng))
        .collect();
    let ticks: Vec<usize> = spawned
        .iter()
        .enumerate()
        .filter(|(_, s)| **s)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(ticks, vec![0, 10, 20]);

    let queued = meteors(&state);
    assert_eq!(queued.len(), 3);
    for meteor in queued {
        assert_eq!(meteor.y, -10.0);
        assert_eq!(meteor.dy, 300.0);
        assert!((0.0..800.0).contains(&meteor.x));
        assert!(meteor.dx == 0.0 || meteor.dx == 200.0);
    }
}

#[test]
fn some_meteors_drift() {
    let rules = Rules::default();
    let mut state = playing(&rules, Level::GAUNTLET);
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..2000 {
        maybe_spawn_meteor(&mut state, &rules, &mut rng);
    }
    let drifting = meteors(&state).iter().filter(|m| m.dx != 0.0).count();
    assert_eq!(meteors(&state).len(), 200);
    assert!(drifting > 0 && drifting < 200);
}

#[test]
fn no_meteors_while_waiting() {
    let rules = Rules::default();
    let mut state = init_state(&rules, Level::GAUNTLET);
    let mut rng = StdRng::seed_from_u64(7);
    assert!(!maybe_spawn_meteor(&mut state, &rules, &mut rng));
    assert!(state.pending_spawn.is_empty());
}

#[test]
fn no_meteors_outside_the_gauntlet() {
    let rules = Rules::default();
    let mut state = playing(&rules, Level::first());
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..30 {
        assert!(!maybe_spawn_meteor(&mut state, &rules, &mut rng));
    }
    assert_eq!(state.gauntlet_ticks, 0);
}
