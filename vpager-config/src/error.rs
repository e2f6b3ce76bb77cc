//! Configuration error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while parsing or validating pager configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid color {0:?}")]
    InvalidColor(String),

    #[error("{field} must be a positive finite number, got {value}")]
    InvalidDimension { field: &'static str, value: f32 },

    #[error("condensed window must hold an odd, non-zero number of slots, got {0}")]
    InvalidWindow(usize),

    #[error("unknown indicator type {0} (expected 0 or 1)")]
    UnknownIndicatorType(i64),

    #[error("unknown indicator layout {0:?} (expected \"full\" or \"condensed\")")]
    UnknownLayout(String),

    #[error("malformed {what}: {reason}")]
    Malformed { what: &'static str, reason: String },

    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON options")]
    Json(#[from] serde_json::Error),

    #[error("invalid TOML options")]
    Toml(#[from] toml::de::Error),

    #[error("unsupported options format for {0} (expected .json or .toml)")]
    UnsupportedFormat(PathBuf),
}
