//! Simulation core for a fixed-tick space invaders arcade game.
//!
//! The core owns entity state and rules only.  Drawing, sound, windowing and
//! input devices live with the caller, which talks to the core through
//! [`compute::FrameInput`] and the [`hooks::Hooks`] callbacks.

pub mod collision;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod formation;
pub mod hooks;
pub mod movement;
pub mod shooting;
pub mod wave;

pub use config::{AssetRef, FootprintTable, Level, Rules, SimConfig, SpriteSheet};
pub use error::ConfigError;
