//! Pager timing and window constants
//!
//! Shared constants for preload scheduling and memory release. Tuning should
//! happen here so the scheduler and the facade stay consistent.

/// Predictive preload cadence and window shape.
pub mod preload {
    /// Delay between a settle and the first preload step (ms).
    pub const DEBOUNCE_MS: u64 = 100;
    /// Delay between consecutive preload steps (ms).
    pub const STEP_INTERVAL_MS: u64 = 50;
    /// Pages warmed past the cache window when the swipe had a direction.
    pub const DIRECTIONAL_EXTRA: usize = 2;
    /// Pages warmed past the cache window on each side when it did not.
    pub const SYMMETRIC_EXTRA: usize = 1;
}

/// Memory release behavior.
pub mod release {
    /// How long the host runs with its default offscreen limit before the
    /// pager restores its own (ms).
    pub const RESTORE_DELAY_MS: u64 = 100;
}
