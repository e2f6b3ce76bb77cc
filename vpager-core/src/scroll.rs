//! Drag/settle state machine.
//!
//! [`ScrollTracker`] turns the host's raw signals (drag begin, position
//! updates, settle) into phase, direction and current-page bookkeeping. It
//! does not emit events itself; the pager turns the returned outcomes into
//! [`crate::PagerEvent`]s.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    None,
    /// Towards higher page indices.
    Forward,
    /// Towards lower page indices.
    Backward,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::None => "none",
            Direction::Forward => "forward",
            Direction::Backward => "backward",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollPhase {
    #[default]
    Idle,
    Dragging,
}

/// Snapshot of the tracker.
///
/// `current_page` is authoritative only while `phase` is `Idle`; while
/// dragging, `last_position` and `last_fraction` are.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PagerState {
    pub current_page: usize,
    pub cache_window: usize,
    pub phase: ScrollPhase,
    pub direction: Direction,
    pub last_position: usize,
    pub last_fraction: f32,
    pub gesture_moved: bool,
}

/// One accepted position update while dragging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSample {
    pub position: usize,
    pub offset: f32,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleOutcome {
    /// Settle arrived without a drag in progress.
    NotDragging,
    /// The host reported a page outside the collection. Nothing changed.
    OutOfRange { reported: usize },
    Settled {
        current_page: usize,
        previous_page: usize,
        changed: bool,
        preload_direction: Direction,
    },
}

#[derive(Debug, Clone)]
pub struct ScrollTracker {
    state: PagerState,
}

impl ScrollTracker {
    pub fn new(cache_window: usize) -> Self {
        Self {
            state: PagerState {
                current_page: 0,
                cache_window,
                phase: ScrollPhase::Idle,
                direction: Direction::None,
                last_position: 0,
                last_fraction: 0.0,
                gesture_moved: false,
            },
        }
    }

    pub fn state(&self) -> PagerState {
        self.state
    }

    pub fn current_page(&self) -> usize {
        self.state.current_page
    }

    pub fn phase(&self) -> ScrollPhase {
        self.state.phase
    }

    pub fn direction(&self) -> Direction {
        self.state.direction
    }

    pub fn set_cache_window(&mut self, window: usize) {
        self.state.cache_window = window;
    }

    /// `Idle -> Dragging`. Returns the `(current_page, direction)` to announce,
    /// or `None` if a drag was already in progress.
    pub fn drag_begin(&mut self) -> Option<(usize, Direction)> {
        if self.state.phase == ScrollPhase::Dragging {
            log::trace!("drag begin ignored: already dragging");
            return None;
        }
        self.state.phase = ScrollPhase::Dragging;
        self.state.gesture_moved = false;
        self.state.last_position = self.state.current_page;
        self.state.last_fraction = 0.0;
        Some((self.state.current_page, self.state.direction))
    }

    /// Record a position update. Returns a sample only while dragging.
    pub fn position_changed(
        &mut self,
        position: usize,
        fraction: f32,
        pixels: f32,
    ) -> Option<ScrollSample> {
        let dragging = self.state.phase == ScrollPhase::Dragging;
        if dragging {
            if position > self.state.last_position {
                self.state.direction = Direction::Forward;
                self.state.gesture_moved = true;
            } else if position < self.state.last_position {
                self.state.direction = Direction::Backward;
                self.state.gesture_moved = true;
            } else if fraction != self.state.last_fraction {
                self.state.gesture_moved = true;
            }
        }

        self.state.last_position = position;
        self.state.last_fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };

        dragging.then_some(ScrollSample {
            position,
            offset: pixels,
            direction: self.state.direction,
        })
    }

    /// `Dragging -> Idle` on the page the host settled on.
    pub fn settle(&mut self, reported: usize, page_count: usize) -> SettleOutcome {
        if self.state.phase != ScrollPhase::Dragging {
            return SettleOutcome::NotDragging;
        }
        self.state.phase = ScrollPhase::Idle;
        self.state.last_fraction = 0.0;

        if reported >= page_count {
            log::warn!(
                "host settled on page {reported} but only {page_count} pages exist"
            );
            self.state.last_position = self.state.current_page;
            return SettleOutcome::OutOfRange { reported };
        }

        let previous_page = self.state.current_page;
        self.state.current_page = reported;
        self.state.last_position = reported;

        let preload_direction = if self.state.gesture_moved {
            self.state.direction
        } else {
            Direction::None
        };

        SettleOutcome::Settled {
            current_page: reported,
            previous_page,
            changed: reported != previous_page,
            preload_direction,
        }
    }

    /// Programmatic jump. Does not touch the phase or direction.
    pub fn set_current_page(&mut self, index: usize) {
        self.state.current_page = index;
        if self.state.phase == ScrollPhase::Idle {
            self.state.last_position = index;
            self.state.last_fraction = 0.0;
        }
    }

    /// Keep the current page inside `[0, page_count)`. Returns true if it moved.
    pub fn clamp_to(&mut self, page_count: usize) -> bool {
        let max = page_count.saturating_sub(1);
        if self.state.current_page > max {
            self.set_current_page(max);
            return true;
        }
        false
    }

    /// `(position, fraction)` the indicator should draw.
    pub fn indicator_position(&self) -> (usize, f32) {
        match self.state.phase {
            ScrollPhase::Dragging => {
                (self.state.last_position, self.state.last_fraction)
            }
            ScrollPhase::Idle => (self.state.current_page, 0.0),
        }
    }
}

impl Default for ScrollTracker {
    fn default() -> Self {
        Self::new(vpager_config::constants::pager::DEFAULT_CACHE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_swipe_settles_with_change() {
        let mut tracker = ScrollTracker::default();

        assert_eq!(tracker.drag_begin(), Some((0, Direction::None)));
        let first = tracker.position_changed(1, 0.5, 320.0).unwrap();
        assert_eq!(first.direction, Direction::Forward);
        let second = tracker.position_changed(2, 0.1, 64.0).unwrap();
        assert_eq!(second.direction, Direction::Forward);
        assert_eq!(second.position, 2);

        let outcome = tracker.settle(2, 5);
        assert_eq!(
            outcome,
            SettleOutcome::Settled {
                current_page: 2,
                previous_page: 0,
                changed: true,
                preload_direction: Direction::Forward,
            }
        );
        assert_eq!(tracker.phase(), ScrollPhase::Idle);
        assert_eq!(tracker.current_page(), 2);
    }

    #[test]
    fn backward_then_equal_keeps_direction() {
        let mut tracker = ScrollTracker::default();
        tracker.set_current_page(4);
        tracker.drag_begin();
        tracker.position_changed(3, 0.7, 0.0);
        let sample = tracker.position_changed(3, 0.2, 0.0).unwrap();
        assert_eq!(sample.direction, Direction::Backward);
    }

    #[test]
    fn second_drag_begin_is_ignored() {
        let mut tracker = ScrollTracker::default();
        assert!(tracker.drag_begin().is_some());
        assert!(tracker.drag_begin().is_none());
    }

    #[test]
    fn positions_are_recorded_when_idle_without_samples() {
        let mut tracker = ScrollTracker::default();
        assert!(tracker.position_changed(1, 0.3, 10.0).is_none());
        assert_eq!(tracker.state().last_position, 1);
        assert_eq!(tracker.direction(), Direction::None);
        // Idle indicator ignores the stale position.
        assert_eq!(tracker.indicator_position(), (0, 0.0));
    }

    #[test]
    fn settle_without_drag_does_nothing() {
        let mut tracker = ScrollTracker::default();
        assert_eq!(tracker.settle(1, 3), SettleOutcome::NotDragging);
        assert_eq!(tracker.current_page(), 0);
    }

    #[test]
    fn out_of_range_settle_keeps_page() {
        let mut tracker = ScrollTracker::default();
        tracker.set_current_page(1);
        tracker.drag_begin();
        tracker.position_changed(2, 0.0, 0.0);

        assert_eq!(
            tracker.settle(9, 3),
            SettleOutcome::OutOfRange { reported: 9 }
        );
        assert_eq!(tracker.current_page(), 1);
        assert_eq!(tracker.phase(), ScrollPhase::Idle);
    }

    #[test]
    fn motionless_gesture_preloads_symmetrically() {
        let mut tracker = ScrollTracker::default();
        tracker.drag_begin();
        tracker.position_changed(1, 0.0, 0.0);
        tracker.settle(1, 5);

        // A later drag that never moves should not reuse the old direction.
        tracker.drag_begin();
        let outcome = tracker.settle(1, 5);
        assert_eq!(
            outcome,
            SettleOutcome::Settled {
                current_page: 1,
                previous_page: 1,
                changed: false,
                preload_direction: Direction::None,
            }
        );
        assert_eq!(tracker.direction(), Direction::Forward);
    }

    #[test]
    fn clamp_pulls_current_page_back() {
        let mut tracker = ScrollTracker::default();
        tracker.set_current_page(7);
        assert!(tracker.clamp_to(3));
        assert_eq!(tracker.current_page(), 2);
        assert!(!tracker.clamp_to(3));
        assert!(tracker.clamp_to(0));
        assert_eq!(tracker.current_page(), 0);
    }

    #[test]
    fn dragging_indicator_follows_position() {
        let mut tracker = ScrollTracker::default();
        tracker.drag_begin();
        tracker.position_changed(0, 0.25, 80.0);
        assert_eq!(tracker.indicator_position(), (0, 0.25));
    }
}
