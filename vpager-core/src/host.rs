//! Seams to the host toolkit's view-recycling container.

use std::sync::Arc;

use crate::binding::{Placeholder, ViewBindingAdapter};
use crate::page::{SlotId, VisualRef};

/// The toolkit container that recycles slots and reports gestures.
///
/// Implementations must not call back into the pager synchronously from
/// these methods.
#[cfg_attr(test, mockall::automock)]
pub trait HostContainer: Send + Sync {
    /// Page the container currently shows (or settled on).
    fn current_item(&self) -> usize;

    fn set_current_item(&self, index: usize, animated: bool);

    /// Pages kept materialized on each side of the current one. `None`
    /// restores the container's own default.
    fn set_offscreen_limit(&self, limit: Option<usize>);

    fn register_adapter(&self, adapter: Arc<ViewBindingAdapter>);

    /// Rebind every slot.
    fn notify_data_changed(&self);

    /// Ask for the indicator to be redrawn.
    fn invalidate_indicator(&self);
}

/// A short-lived container the host reuses for whichever page scrolls into
/// it. Only one visual is shown at a time.
pub trait Slot {
    fn id(&self) -> SlotId;

    /// Remove whatever the slot shows. Visuals are detached, not destroyed.
    fn clear(&mut self);

    fn attach(&mut self, visual: VisualRef);

    fn show_placeholder(&mut self, placeholder: &Placeholder);
}
