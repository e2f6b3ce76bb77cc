//! Default values for pager and indicator configuration.
//!
//! Tuning should happen here so the config loader, the indicator renderer and
//! the simulator agree on the same numbers.

use crate::color::Color;

/// Pager-level defaults.
pub mod pager {
    /// Neighboring pages the host keeps materialized on each side.
    pub const DEFAULT_CACHE_SIZE: usize = 3;
    /// Lower bound applied to any requested cache size.
    pub const MIN_CACHE_SIZE: usize = 1;
}

/// Dot indicator defaults, in layout units.
pub mod indicator {
    use super::Color;

    /// Radius of an inactive dot.
    pub const NORMAL_DOT_SIZE: f32 = 6.0;
    /// Radius of the dot for the current page.
    pub const ACTIVE_DOT_SIZE: f32 = 8.0;
    /// Radius of the faintest dots at the edge of the condensed window.
    pub const MIN_DOT_SIZE: f32 = 3.0;
    /// Gap between two adjacent dots.
    pub const DOT_SPACING: f32 = 16.0;
    /// Visible slots in the condensed layout. Must be odd.
    pub const WINDOW_SLOTS: usize = 9;
    /// Margin used when no vertical anchor is configured.
    pub const DEFAULT_BOTTOM_MARGIN: i32 = 40;
    /// Extra cross-axis room added to the preferred size.
    pub const CROSS_AXIS_PADDING: f32 = 16.0;
    /// Extra main-axis room added to the preferred size.
    pub const MAIN_AXIS_PADDING: f32 = 40.0;

    /// `#80FFFFFF`
    pub const INACTIVE_COLOR: Color = Color::from_argb(0x80, 0xFF, 0xFF, 0xFF);
    /// `#FFFFFFFF`
    pub const ACTIVE_COLOR: Color = Color::WHITE;

    /// Alpha values used by the renderer.
    pub mod alpha {
        pub const ACTIVE: u8 = 255;
        /// Inactive dots in the full layout (~60%).
        pub const FULL_INACTIVE: u8 = 153;
        pub const NEAR: u8 = 204;
        pub const MID: u8 = 180;
        pub const FAR: u8 = 128;
    }
}
