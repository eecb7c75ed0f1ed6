//! All simulation entity types and the master game state.  Pure data plus
//! the small amount of bookkeeping needed for deferred removal.

use std::collections::HashSet;

use crate::config::{AssetRef, Level};

pub type EntityId = u64;

/// Collision-relevant kind of an entity, without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Ship,
    Alien,
    PlayerShot,
    AlienShot,
    Meteor,
    Explosion,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Ship,
        EntityKind::Alien,
        EntityKind::PlayerShot,
        EntityKind::AlienShot,
        EntityKind::Meteor,
        EntityKind::Explosion,
    ];
}

/// Width and height of an entity's bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Footprint {
    pub width: f64,
    pub height: f64,
}

impl Footprint {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Grid slot of an alien.  `row` and `column` never change after spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AlienSlot {
    pub row: u32,
    pub column: u32,
    /// At most one living alien per column holds this.
    pub shot_allowed: bool,
}

/// Kind-specific state.
#[derive(Clone, Debug, PartialEq)]
pub enum Role {
    Ship,
    Alien(AlienSlot),
    PlayerShot,
    AlienShot,
    Meteor,
    /// Remaining lifetime in milliseconds.
    Explosion { ttl_ms: f64 },
}

impl Role {
    pub fn kind(&self) -> EntityKind {
        match self {
            Role::Ship => EntityKind::Ship,
            Role::Alien(_) => EntityKind::Alien,
            Role::PlayerShot => EntityKind::PlayerShot,
            Role::AlienShot => EntityKind::AlienShot,
            Role::Meteor => EntityKind::Meteor,
            Role::Explosion { .. } => EntityKind::Explosion,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub role: Role,
    pub asset: AssetRef,
    pub x: f64,
    pub y: f64,
    /// Horizontal velocity, units/second.
    pub dx: f64,
    /// Vertical velocity, units/second.
    pub dy: f64,
    pub footprint: Footprint,
    /// Cleared only when the entity is queued for removal.
    pub alive: bool,
}

impl Entity {
    pub fn new(id: EntityId, role: Role, asset: AssetRef, footprint: Footprint, x: f64, y: f64) -> Self {
        Self {
            id,
            role,
            asset,
            x,
            y,
            dx: 0.0,
            dy: 0.0,
            footprint,
            alive: true,
        }
    }

    pub fn with_velocity(mut self, dx: f64, dy: f64) -> Self {
        self.dx = dx;
        self.dy = dy;
        self
    }

    pub fn kind(&self) -> EntityKind {
        self.role.kind()
    }

    pub fn alien(&self) -> Option<&AlienSlot> {
        match &self.role {
            Role::Alien(slot) => Some(slot),
            _ => None,
        }
    }

    pub fn alien_mut(&mut self) -> Option<&mut AlienSlot> {
        match &mut self.role {
            Role::Alien(slot) => Some(slot),
            _ => None,
        }
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.footprint.width / 2.0
    }

    /// Axis-aligned bounding-box overlap; touching edges do not count.
    pub fn overlaps(&self, other: &Entity) -> bool {
        self.x < other.x + other.footprint.width
            && other.x < self.x + self.footprint.width
            && self.y < other.y + other.footprint.height
            && other.y < self.y + self.footprint.height
    }

    /// Queue this entity for the end-of-tick flush.  Returns `false` if it
    /// was already queued.
    pub fn retire(&mut self, pending: &mut Vec<EntityId>) -> bool {
        if !self.alive {
            return false;
        }
        self.alive = false;
        pending.push(self.id);
        true
    }
}

// ── Formation logic phase ─────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FormationPhase {
    #[default]
    Idle,
    /// A boundary was reached; reverse and descend on the next logic pass.
    Triggered,
}

// ── Held controls ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// Timestamp far enough in the past that any cooldown has elapsed.
pub const NEVER: i64 = i64::MIN / 2;

/// The entire simulation state.  Owned by the game loop and handed to each
/// tick explicitly; nothing in the core keeps state anywhere else.
#[derive(Clone, Debug)]
pub struct GameState {
    /// Insertion order matters for shooting-right transfer and enemy fire.
    pub entities: Vec<Entity>,
    /// Ids queued for removal this tick.
    pub pending_removal: Vec<EntityId>,
    /// Entities created this tick, appended after the removal flush.
    pub pending_spawn: Vec<Entity>,
    pub level: Level,
    pub alien_count: u32,
    /// Simulation clock in milliseconds.
    pub clock_ms: i64,
    pub last_player_fire_ms: i64,
    pub last_alien_fire_ms: i64,
    /// Ticks run on the meteor gauntlet, for spawn cadence.
    pub gauntlet_ticks: u64,
    pub formation: FormationPhase,
    pub waiting_for_ack: bool,
    pub paused: bool,
    pub message: String,
    pub controls: Controls,
    pub next_id: EntityId,
}

impl GameState {
    pub fn new(level: Level) -> Self {
        Self {
            entities: Vec::new(),
            pending_removal: Vec::new(),
            pending_spawn: Vec::new(),
            level,
            alien_count: 0,
            clock_ms: 0,
            last_player_fire_ms: NEVER,
            last_alien_fire_ms: 0,
            gauntlet_ticks: 0,
            formation: FormationPhase::Idle,
            waiting_for_ack: true,
            paused: false,
            message: String::new(),
            controls: Controls::default(),
            next_id: 1,
        }
    }

    pub fn alloc_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn ship(&self) -> Option<&Entity> {
        self.entities.iter().find(|e| e.kind() == EntityKind::Ship)
    }

    pub fn ship_mut(&mut self) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.kind() == EntityKind::Ship)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn living(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.alive)
    }

    pub fn aliens(&self) -> impl Iterator<Item = (&Entity, &AlienSlot)> {
        self.living().filter_map(|e| e.alien().map(|slot| (e, slot)))
    }

    /// Find the living alien in a grid slot.
    pub fn alien_at(&self, row: u32, column: u32) -> Option<&Entity> {
        self.aliens()
            .find(|(_, slot)| slot.row == row && slot.column == column)
            .map(|(e, _)| e)
    }

    /// Queue the entity at `index` for removal.
    pub fn retire(&mut self, index: usize) -> bool {
        match self.entities.get_mut(index) {
            Some(entity) => entity.retire(&mut self.pending_removal),
            None => false,
        }
    }

    /// Apply the pending removals, then append the pending spawns.
    /// Returns the number of entities removed.
    pub fn flush(&mut self) -> usize {
        let doomed: HashSet<EntityId> = self.pending_removal.drain(..).collect();
        let before = self.entities.len();
        self.entities.retain(|e| !doomed.contains(&e.id));
        let removed = before - self.entities.len();
        debug_assert_eq!(removed, doomed.len());
        self.entities.append(&mut self.pending_spawn);
        removed
    }
}
