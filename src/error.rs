//! Startup configuration errors.
//!
//! The tick path is total; everything that can go wrong is caught here,
//! before the first tick runs.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("unknown level {0} (expected 1..=4)")]
    UnknownLevel(u8),

    #[error("no footprint registered for asset `{0}`")]
    MissingFootprint(&'static str),

    #[error("footprint for asset `{asset}` must be positive, got {width}x{height}")]
    InvalidFootprint {
        asset: &'static str,
        width: f64,
        height: f64,
    },

    #[error("invalid setting `{field}`: {reason}")]
    InvalidSetting {
        field: &'static str,
        reason: String,
    },
}
