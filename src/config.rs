//! Tunables, the level table and the asset footprint table.
//!
//! Everything here is resolved and validated once at startup.  A tick never
//! looks anything up by name, so a missing asset or an unknown level can only
//! fail before the game starts.

use std::collections::HashMap;

use crate::entities::Footprint;
use crate::error::ConfigError;

// ── Levels ───────────────────────────────────────────────────────────────────

/// A playable level, always in `1..=4`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Level(u8);

impl Level {
    pub const LAST: u8 = 4;
    /// The no-alien meteor gauntlet.
    pub const GAUNTLET: Level = Level(4);

    pub fn new(number: u8) -> Result<Self, ConfigError> {
        if (1..=Self::LAST).contains(&number) {
            Ok(Level(number))
        } else {
            Err(ConfigError::UnknownLevel(number))
        }
    }

    pub fn first() -> Self {
        Level(1)
    }

    pub fn number(self) -> u8 {
        self.0
    }

    /// Level reached after a win; wraps from the last level back to the first.
    pub fn next(self) -> Self {
        if self.0 >= Self::LAST {
            Level(1)
        } else {
            Level(self.0 + 1)
        }
    }

    /// HUD label.
    pub fn label(self) -> &'static str {
        match self.0 {
            1 => "Defend",
            2 => "Attack",
            3 => "Annihilate",
            _ => "The Evasion",
        }
    }

    pub fn has_formation(self) -> bool {
        self != Self::GAUNTLET
    }

    /// Sprite used by this level's formation, if it has one.
    pub fn alien_asset(self) -> Option<AssetRef> {
        match self.0 {
            1 => Some(AssetRef::ALIEN_LEVEL_1),
            2 => Some(AssetRef::ALIEN_LEVEL_2),
            3 => Some(AssetRef::ALIEN_LEVEL_3),
            _ => None,
        }
    }
}

impl Default for Level {
    fn default() -> Self {
        Level::first()
    }
}

// ── Assets ───────────────────────────────────────────────────────────────────

/// Opaque handle the renderer uses to pick a sprite.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AssetRef(pub &'static str);

impl AssetRef {
    pub const SHIP: AssetRef = AssetRef("ship");
    pub const PLAYER_SHOT: AssetRef = AssetRef("shot");
    pub const ALIEN_SHOT: AssetRef = AssetRef("alien_shot");
    pub const METEOR: AssetRef = AssetRef("meteor");
    pub const EXPLOSION: AssetRef = AssetRef("explosion");
    pub const ALIEN_LEVEL_1: AssetRef = AssetRef("alien_level_1");
    pub const ALIEN_LEVEL_2: AssetRef = AssetRef("alien_level_2");
    pub const ALIEN_LEVEL_3: AssetRef = AssetRef("alien_level_3");
}

/// Collision footprints keyed by asset, as supplied by the asset loader.
#[derive(Clone, Debug)]
pub struct FootprintTable {
    entries: HashMap<AssetRef, Footprint>,
}

impl FootprintTable {
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn insert(&mut self, asset: AssetRef, footprint: Footprint) {
        self.entries.insert(asset, footprint);
    }

    pub fn remove(&mut self, asset: AssetRef) {
        self.entries.remove(&asset);
    }

    pub fn get(&self, asset: AssetRef) -> Result<Footprint, ConfigError> {
        let fp = self
            .entries
            .get(&asset)
            .copied()
            .ok_or(ConfigError::MissingFootprint(asset.0))?;
        if fp.width <= 0.0 || fp.height <= 0.0 {
            return Err(ConfigError::InvalidFootprint {
                asset: asset.0,
                width: fp.width,
                height: fp.height,
            });
        }
        Ok(fp)
    }
}

impl Default for FootprintTable {
    /// Sizes of the stock sprite set.
    fn default() -> Self {
        let mut table = Self::empty();
        table.insert(AssetRef::SHIP, Footprint::new(30.0, 30.0));
        table.insert(AssetRef::PLAYER_SHOT, Footprint::new(6.0, 18.0));
        table.insert(AssetRef::ALIEN_SHOT, Footprint::new(6.0, 18.0));
        table.insert(AssetRef::METEOR, Footprint::new(40.0, 40.0));
        table.insert(AssetRef::EXPLOSION, Footprint::new(40.0, 40.0));
        table.insert(AssetRef::ALIEN_LEVEL_1, Footprint::new(50.0, 30.0));
        table.insert(AssetRef::ALIEN_LEVEL_2, Footprint::new(50.0, 30.0));
        table.insert(AssetRef::ALIEN_LEVEL_3, Footprint::new(50.0, 30.0));
        table
    }
}

/// Every footprint the simulation can need, resolved up front.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteSheet {
    pub ship: Footprint,
    pub player_shot: Footprint,
    pub alien_shot: Footprint,
    pub meteor: Footprint,
    pub explosion: Footprint,
    aliens: [Footprint; 3],
}

impl SpriteSheet {
    pub fn resolve(table: &FootprintTable) -> Result<Self, ConfigError> {
        Ok(Self {
            ship: table.get(AssetRef::SHIP)?,
            player_shot: table.get(AssetRef::PLAYER_SHOT)?,
            alien_shot: table.get(AssetRef::ALIEN_SHOT)?,
            meteor: table.get(AssetRef::METEOR)?,
            explosion: table.get(AssetRef::EXPLOSION)?,
            aliens: [
                table.get(AssetRef::ALIEN_LEVEL_1)?,
                table.get(AssetRef::ALIEN_LEVEL_2)?,
                table.get(AssetRef::ALIEN_LEVEL_3)?,
            ],
        })
    }

    pub fn alien(&self, level: Level) -> Option<Footprint> {
        level
            .has_formation()
            .then(|| self.aliens[usize::from(level.number() - 1)])
    }
}

impl Default for SpriteSheet {
    fn default() -> Self {
        let table = FootprintTable::default();
        let fp = |asset: AssetRef| table.entries[&asset];
        Self {
            ship: fp(AssetRef::SHIP),
            player_shot: fp(AssetRef::PLAYER_SHOT),
            alien_shot: fp(AssetRef::ALIEN_SHOT),
            meteor: fp(AssetRef::METEOR),
            explosion: fp(AssetRef::EXPLOSION),
            aliens: [
                fp(AssetRef::ALIEN_LEVEL_1),
                fp(AssetRef::ALIEN_LEVEL_2),
                fp(AssetRef::ALIEN_LEVEL_3),
            ],
        }
    }
}

// ── Tunables ─────────────────────────────────────────────────────────────────

/// All gameplay constants.  Distances are playfield units, speeds are
/// units/second, times are milliseconds.
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    pub field_width: f64,
    pub field_height: f64,

    pub ship_spawn: (f64, f64),
    pub ship_speed: f64,
    pub ship_min_x: f64,
    pub ship_max_x: f64,

    pub player_fire_interval_ms: i64,
    pub player_shot_offset: (f64, f64),
    pub player_shot_speed: f64,
    pub player_shot_min_y: f64,

    pub formation_rows: u32,
    pub formation_columns: u32,
    pub formation_origin: (f64, f64),
    pub formation_spacing: (f64, f64),
    pub alien_speed: f64,
    pub alien_left_edge: f64,
    pub alien_right_edge: f64,
    pub descent_step: f64,
    pub invasion_line: f64,
    pub speed_up_factor: f64,

    pub alien_shot_offset_y: f64,
    pub alien_shot_speed: f64,
    pub alien_shot_max_y: f64,
    pub alien_fire_slow_ms: i64,
    pub alien_fire_fast_ms: i64,
    pub alien_fire_slow_chance: f64,
    pub alien_refire_bonus_ms: i64,

    pub meteor_every_ticks: u64,
    pub meteor_spawn_y: f64,
    pub meteor_speed: f64,
    pub meteor_drift_speed: f64,
    pub meteor_drift_chance: f64,

    pub explosion_ttl_ms: f64,

    pub tick_ms: u64,
    pub max_elapsed_ms: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            field_width: 800.0,
            field_height: 600.0,

            ship_spawn: (370.0, 550.0),
            ship_speed: 400.0,
            ship_min_x: 10.0,
            ship_max_x: 750.0,

            player_fire_interval_ms: 300,
            player_shot_offset: (10.0, -30.0),
            player_shot_speed: -300.0,
            player_shot_min_y: -100.0,

            formation_rows: 3,
            formation_columns: 10,
            formation_origin: (100.0, 50.0),
            formation_spacing: (70.0, 50.0),
            alien_speed: 75.0,
            alien_left_edge: 10.0,
            alien_right_edge: 750.0,
            descent_step: 10.0,
            invasion_line: 570.0,
            speed_up_factor: 1.02,

            alien_shot_offset_y: 60.0,
            alien_shot_speed: 350.0,
            alien_shot_max_y: 700.0,
            alien_fire_slow_ms: 2000,
            alien_fire_fast_ms: 1000,
            alien_fire_slow_chance: 0.5,
            alien_refire_bonus_ms: 200,

            meteor_every_ticks: 10,
            meteor_spawn_y: -10.0,
            meteor_speed: 300.0,
            meteor_drift_speed: 200.0,
            meteor_drift_chance: 0.2,

            explosion_ttl_ms: 150.0,

            tick_ms: 10,
            max_elapsed_ms: 100,
        }
    }
}

impl SimConfig {
    /// Default tunables at a different loop cadence.  The elapsed clamp is
    /// raised so a slow tick is never cut short.
    pub fn with_tick_ms(tick_ms: u64) -> Self {
        let defaults = Self::default();
        Self {
            tick_ms,
            max_elapsed_ms: defaults.max_elapsed_ms.max(tick_ms),
            ..defaults
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: &str) -> ConfigError {
            ConfigError::InvalidSetting {
                field,
                reason: reason.to_string(),
            }
        }

        if self.field_width <= 0.0 || self.field_height <= 0.0 {
            return Err(invalid("field", "playfield dimensions must be positive"));
        }
        if self.tick_ms == 0 {
            return Err(invalid("tick_ms", "must be at least 1"));
        }
        if self.max_elapsed_ms < self.tick_ms {
            return Err(invalid("max_elapsed_ms", "must not be shorter than tick_ms"));
        }
        if self.formation_rows == 0 || self.formation_columns == 0 {
            return Err(invalid("formation", "needs at least one row and column"));
        }
        if self.meteor_every_ticks == 0 {
            return Err(invalid("meteor_every_ticks", "must be at least 1"));
        }
        for (field, p) in [
            ("alien_fire_slow_chance", self.alien_fire_slow_chance),
            ("meteor_drift_chance", self.meteor_drift_chance),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(invalid(field, "probability must be within [0, 1]"));
            }
        }
        if self.speed_up_factor < 1.0 {
            return Err(invalid("speed_up_factor", "aliens must not slow down"));
        }
        if self.alien_left_edge >= self.alien_right_edge {
            return Err(invalid("alien edges", "left edge must be left of right edge"));
        }
        Ok(())
    }
}

// ── Rules ────────────────────────────────────────────────────────────────────

/// Validated tunables plus resolved footprints; read-only during a tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Rules {
    pub config: SimConfig,
    pub sheet: SpriteSheet,
}

impl Rules {
    pub fn new(config: SimConfig, footprints: &FootprintTable) -> Result<Self, ConfigError> {
        config.validate()?;
        let sheet = SpriteSheet::resolve(footprints)?;
        Ok(Self { config, sheet })
    }
}
