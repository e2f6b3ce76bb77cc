//! Shared configuration library for the vertical pager.
//!
//! Embedders hand the pager loosely shaped option maps (JSON objects, TOML
//! tables, or values built in code). This crate turns them into a single
//! normalized [`PagerSettings`] at the boundary, validating sizes and colors
//! once so the rest of the workspace only ever sees well-formed values.
//! Unrecognized or malformed indicator options are reported as
//! [`ConfigWarning`]s and leave the previous values in effect.

pub mod color;
pub mod constants;
pub mod error;
pub mod loader;
pub mod models;

pub use color::Color;
pub use error::ConfigError;
pub use loader::{ConfigLoad, ConfigLoader};
pub use models::indicator::{
    HorizontalAnchor, IndicatorConfig, IndicatorKind, IndicatorLayout,
    IndicatorMount, IndicatorPlacement, IndicatorStyle, VerticalAnchor,
};
pub use models::{ConfigWarning, PagerOptions, PagerSettings};
