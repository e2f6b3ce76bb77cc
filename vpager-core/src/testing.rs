//! In-memory host, slots, visuals and event recorder.
//!
//! Used by this crate's tests, the integration tests and the headless
//! simulator. None of these types draw anything; they record what the pager
//! asked for so it can be asserted on or printed.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::binding::{BindOutcome, Placeholder, ViewBindingAdapter};
use crate::events::{EventSink, PagerEvent};
use crate::host::{HostContainer, Slot};
use crate::page::{NativeHandle, SlotId, Visual, VisualRef};

/// A visual that only tracks its parent slot.
#[derive(Debug)]
pub struct BasicVisual {
    handle: NativeHandle,
    parent: Mutex<Option<SlotId>>,
}

impl BasicVisual {
    pub fn new(handle: u64) -> Self {
        Self {
            handle: NativeHandle(handle),
            parent: Mutex::new(None),
        }
    }

    pub fn shared(handle: u64) -> VisualRef {
        Arc::new(Self::new(handle))
    }
}

impl Visual for BasicVisual {
    fn native_handle(&self) -> NativeHandle {
        self.handle
    }

    fn attached_to(&self) -> Option<SlotId> {
        *self.parent.lock()
    }

    fn attach_to(&self, slot: SlotId) {
        *self.parent.lock() = Some(slot);
    }

    fn detach(&self) {
        *self.parent.lock() = None;
    }
}

#[derive(Debug)]
pub struct MemorySlot {
    id: SlotId,
    children: Vec<VisualRef>,
    placeholder: Option<Placeholder>,
    clears: usize,
}

impl MemorySlot {
    pub fn new(id: u64) -> Self {
        Self {
            id: SlotId(id),
            children: Vec::new(),
            placeholder: None,
            clears: 0,
        }
    }

    pub fn children(&self) -> &[VisualRef] {
        &self.children
    }

    pub fn placeholder(&self) -> Option<&Placeholder> {
        self.placeholder.as_ref()
    }

    pub fn shows(&self, visual: &VisualRef) -> bool {
        self.children.iter().any(|child| Arc::ptr_eq(child, visual))
    }

    pub fn clear_count(&self) -> usize {
        self.clears
    }
}

impl Slot for MemorySlot {
    fn id(&self) -> SlotId {
        self.id
    }

    fn clear(&mut self) {
        self.clears += 1;
        for child in self.children.drain(..) {
            if child.attached_to() == Some(self.id) {
                child.detach();
            }
        }
        self.placeholder = None;
    }

    fn attach(&mut self, visual: VisualRef) {
        self.children.push(visual);
    }

    fn show_placeholder(&mut self, placeholder: &Placeholder) {
        self.placeholder = Some(placeholder.clone());
    }
}

#[derive(Debug, Default)]
struct HostLog {
    current_item: usize,
    moves: Vec<(usize, bool)>,
    limits: Vec<Option<usize>>,
    data_changes: usize,
    indicator_invalidations: usize,
    adapter: Option<Arc<ViewBindingAdapter>>,
}

/// A [`HostContainer`] that records every request.
///
/// The container's notion of the current item is driven by the caller via
/// [`MemoryHost::settle_on`], the way a real container decides which page a
/// fling lands on.
#[derive(Debug, Default)]
pub struct MemoryHost {
    log: Mutex<HostLog>,
}

impl MemoryHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make the container report `index` as its current item.
    pub fn settle_on(&self, index: usize) {
        self.log.lock().current_item = index;
    }

    /// `(index, animated)` for every `set_current_item` call.
    pub fn moves(&self) -> Vec<(usize, bool)> {
        self.log.lock().moves.clone()
    }

    /// Every offscreen limit requested, in order.
    pub fn limits(&self) -> Vec<Option<usize>> {
        self.log.lock().limits.clone()
    }

    pub fn offscreen_limit(&self) -> Option<usize> {
        self.log.lock().limits.last().copied().flatten()
    }

    pub fn data_changes(&self) -> usize {
        self.log.lock().data_changes
    }

    pub fn indicator_invalidations(&self) -> usize {
        self.log.lock().indicator_invalidations
    }

    pub fn adapter(&self) -> Option<Arc<ViewBindingAdapter>> {
        self.log.lock().adapter.clone()
    }

    /// Bind the current item into `slot` through the registered adapter.
    pub fn bind_current(&self, slot: &mut dyn Slot) -> Option<BindOutcome> {
        let (adapter, index) = {
            let log = self.log.lock();
            (log.adapter.clone()?, log.current_item)
        };
        Some(adapter.bind(index, slot))
    }
}

impl HostContainer for MemoryHost {
    fn current_item(&self) -> usize {
        self.log.lock().current_item
    }

    fn set_current_item(&self, index: usize, animated: bool) {
        let mut log = self.log.lock();
        log.current_item = index;
        log.moves.push((index, animated));
    }

    fn set_offscreen_limit(&self, limit: Option<usize>) {
        self.log.lock().limits.push(limit);
    }

    fn register_adapter(&self, adapter: Arc<ViewBindingAdapter>) {
        self.log.lock().adapter = Some(adapter);
    }

    fn notify_data_changed(&self) {
        self.log.lock().data_changes += 1;
    }

    fn invalidate_indicator(&self) {
        self.log.lock().indicator_invalidations += 1;
    }
}

/// Collects delivered events.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<PagerEvent>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<PagerEvent> {
        self.events.lock().clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events.lock().iter().map(PagerEvent::name).collect()
    }

    pub fn count(&self, name: &str) -> usize {
        self.events.lock().iter().filter(|e| e.name() == name).count()
    }

    pub fn take(&self) -> Vec<PagerEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl EventSink for RecordingSink {
    fn deliver(&self, event: &PagerEvent) {
        self.events.lock().push(event.clone());
    }
}
