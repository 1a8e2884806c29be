//! Core error type.
//!
//! Sub-crates wrap `CoreError` as one variant of their own error enums via
//! `#[from]`, so geometry and configuration failures keep their original
//! message all the way up to the caller.

use thiserror::Error;

/// Errors raised by buffers, coordinates, budgets, and settings.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid buffer radius {0} m: must be a positive finite number")]
    InvalidRadius(f64),

    #[error("invalid travel budget: max cutoff {max_cutoff_secs} s, speed {speed_mps} m/s (both must be > 0)")]
    InvalidBudget { max_cutoff_secs: f64, speed_mps: f64 },

    #[error("invalid coordinate ({lon}, {lat})")]
    InvalidCoordinate { lon: f64, lat: f64 },

    #[error("unknown routing modus {0:?}: expected \"default\", \"scenario\", or \"comparison\"")]
    UnknownModus(String),

    #[error("configuration value {0:?} is not set")]
    ConfigurationMissing(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("settings parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `sn-core`.
pub type CoreResult<T> = Result<T, CoreError>;
