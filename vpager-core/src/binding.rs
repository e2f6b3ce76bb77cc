//! Binding pages into host slots.
//!
//! The adapter is what the host's recycling container talks to. It works from
//! its own snapshot of the page list, refreshed through
//! [`ViewBindingAdapter::update_data`], so the host never observes a list
//! that is being mutated.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::error::PagerError;
use crate::host::{HostContainer, Slot};
use crate::page::{self, OwnerId, PageRef, VisualRef};
use crate::preload::PreloadTarget;

/// What a slot shows when a page could not produce its visual.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub index: usize,
    pub message: String,
}

impl Placeholder {
    fn from_error(err: &PagerError, index: usize) -> Self {
        Self {
            index,
            message: err.to_string(),
        }
    }
}

/// How content failures are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaceholderPolicy {
    /// Show a [`Placeholder`] in the slot.
    #[default]
    ShowError,
    /// Leave the slot empty.
    Skip,
}

#[derive(Debug)]
pub enum BindOutcome {
    Bound(VisualRef),
    Placeholder(Placeholder),
    Skipped,
}

impl BindOutcome {
    pub fn is_bound(&self) -> bool {
        matches!(self, Self::Bound(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarmOutcome {
    Warmed,
    AlreadyWarm,
}

pub struct ViewBindingAdapter {
    owner: OwnerId,
    pages: RwLock<Vec<PageRef>>,
    policy: PlaceholderPolicy,
    host: RwLock<Option<Weak<dyn HostContainer>>>,
}

impl std::fmt::Debug for ViewBindingAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewBindingAdapter")
            .field("owner", &self.owner)
            .field("items", &self.item_count())
            .field("policy", &self.policy)
            .finish()
    }
}

impl ViewBindingAdapter {
    pub fn new(owner: OwnerId, policy: PlaceholderPolicy) -> Self {
        Self {
            owner,
            pages: RwLock::new(Vec::new()),
            policy,
            host: RwLock::new(None),
        }
    }

    pub fn policy(&self) -> PlaceholderPolicy {
        self.policy
    }

    /// Host to notify when the data set changes. Held weakly.
    pub fn set_host(&self, host: Option<&Arc<dyn HostContainer>>) {
        *self.host.write() = host.map(Arc::downgrade);
    }

    pub fn item_count(&self) -> usize {
        self.pages.read().len()
    }

    pub fn page(&self, index: usize) -> Option<PageRef> {
        self.pages.read().get(index).cloned()
    }

    /// Show page `index` in `slot`.
    pub fn bind(&self, index: usize, slot: &mut dyn Slot) -> BindOutcome {
        let Some(page) = self.page(index) else {
            log::warn!(
                "bind ignored: {}",
                PagerError::InvalidIndex {
                    index,
                    len: self.item_count()
                }
            );
            return BindOutcome::Skipped;
        };

        slot.clear();
        page::claim(page.as_ref(), self.owner);

        match create_visual(&page, index) {
            Ok(visual) => {
                if let Some(previous) = visual.attached_to() {
                    log::trace!(
                        "page {} visual moving from slot {:?} to {:?}",
                        index,
                        previous,
                        slot.id()
                    );
                    visual.detach();
                }
                slot.attach(Arc::clone(&visual));
                visual.attach_to(slot.id());
                BindOutcome::Bound(visual)
            }
            Err(err) => {
                log::error!("{err}");
                match self.policy {
                    PlaceholderPolicy::ShowError => {
                        let placeholder = Placeholder::from_error(&err, index);
                        slot.show_placeholder(&placeholder);
                        BindOutcome::Placeholder(placeholder)
                    }
                    PlaceholderPolicy::Skip => BindOutcome::Skipped,
                }
            }
        }
    }

    /// Return `slot` to the host empty. The page's visual survives.
    pub fn unbind(&self, slot: &mut dyn Slot) {
        slot.clear();
    }

    /// Swap the backing snapshot and request a full rebind.
    pub fn update_data(&self, pages: Vec<PageRef>) {
        let count = pages.len();
        *self.pages.write() = pages;

        let host = self.host.read().as_ref().and_then(Weak::upgrade);
        match host {
            Some(host) => host.notify_data_changed(),
            None => log::debug!(
                "adapter updated to {count} pages with no host attached"
            ),
        }
    }

    /// Materialize page `index` without attaching it anywhere.
    pub fn warm(&self, index: usize) -> Result<WarmOutcome, PagerError> {
        let page = self.page(index).ok_or(PagerError::InvalidIndex {
            index,
            len: self.item_count(),
        })?;

        if page.is_materialized() {
            return Ok(WarmOutcome::AlreadyWarm);
        }
        page::claim(page.as_ref(), self.owner);
        create_visual(&page, index)?;
        Ok(WarmOutcome::Warmed)
    }

    /// Forget every page. Used on teardown.
    pub fn clear(&self) {
        self.pages.write().clear();
        *self.host.write() = None;
    }
}

impl PreloadTarget for ViewBindingAdapter {
    fn warm(&self, index: usize) -> Result<WarmOutcome, PagerError> {
        ViewBindingAdapter::warm(self, index)
    }
}

/// Run the page's factory, turning both errors and panics into
/// [`PagerError`]. No adapter lock is held here.
fn create_visual(page: &PageRef, index: usize) -> Result<VisualRef, PagerError> {
    match panic::catch_unwind(AssertUnwindSafe(|| page.get_or_create_visual())) {
        Ok(Ok(visual)) => Ok(visual),
        Ok(Err(err)) => Err(PagerError::content(index, err)),
        Err(payload) => Err(PagerError::ContentPanicked {
            index,
            message: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        String::from("unknown panic")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{LazyPage, Page, SlotId};
    use crate::testing::{BasicVisual, MemorySlot};

    fn adapter_with(pages: Vec<PageRef>) -> ViewBindingAdapter {
        let adapter =
            ViewBindingAdapter::new(OwnerId::next(), PlaceholderPolicy::default());
        adapter.update_data(pages);
        adapter
    }

    fn ok_page(id: u64) -> PageRef {
        LazyPage::new(format!("p{id}"), move || Ok(BasicVisual::shared(id)))
            .shared()
    }

    #[test]
    fn bind_attaches_and_claims() {
        let page = ok_page(7);
        let adapter = adapter_with(vec![Arc::clone(&page)]);
        let mut slot = MemorySlot::new(1);

        let outcome = adapter.bind(0, &mut slot);
        let BindOutcome::Bound(visual) = outcome else {
            panic!("expected bound, got {outcome:?}");
        };
        assert_eq!(visual.attached_to(), Some(SlotId(1)));
        assert!(slot.shows(&visual));
        assert!(page.owner().is_some());
    }

    #[test]
    fn bind_out_of_range_is_skipped() {
        let adapter = adapter_with(vec![ok_page(0)]);
        let mut slot = MemorySlot::new(1);
        assert!(matches!(adapter.bind(1, &mut slot), BindOutcome::Skipped));
        assert_eq!(slot.clear_count(), 0);
    }

    #[test]
    fn visual_moves_between_slots() {
        let adapter = adapter_with(vec![ok_page(0)]);
        let mut first = MemorySlot::new(1);
        let mut second = MemorySlot::new(2);

        adapter.bind(0, &mut first);
        let BindOutcome::Bound(visual) = adapter.bind(0, &mut second) else {
            panic!("expected bound");
        };
        assert_eq!(visual.attached_to(), Some(SlotId(2)));
        assert!(second.shows(&visual));
        // The first slot still lists it, but the visual's parent moved.
        assert_eq!(first.children().len(), 1);
    }

    #[test]
    fn factory_error_shows_placeholder() {
        let broken =
            LazyPage::new("broken", || anyhow::bail!("decoder failed")).shared();
        let adapter = adapter_with(vec![broken]);
        let mut slot = MemorySlot::new(1);

        let BindOutcome::Placeholder(placeholder) = adapter.bind(0, &mut slot)
        else {
            panic!("expected placeholder");
        };
        assert_eq!(placeholder.index, 0);
        assert!(placeholder.message.contains("decoder failed"));
        assert_eq!(slot.placeholder(), Some(&placeholder));
    }

    #[test]
    fn factory_panic_is_contained() {
        let exploding =
            LazyPage::new("boom", || panic!("factory exploded")).shared();
        let adapter = adapter_with(vec![exploding]);
        let mut slot = MemorySlot::new(1);

        let BindOutcome::Placeholder(placeholder) = adapter.bind(0, &mut slot)
        else {
            panic!("expected placeholder");
        };
        assert!(placeholder.message.contains("factory exploded"));
    }

    #[test]
    fn skip_policy_leaves_slot_empty() {
        let adapter =
            ViewBindingAdapter::new(OwnerId::next(), PlaceholderPolicy::Skip);
        adapter.update_data(vec![
            LazyPage::new("broken", || anyhow::bail!("nope")).shared(),
        ]);
        let mut slot = MemorySlot::new(1);

        assert!(matches!(adapter.bind(0, &mut slot), BindOutcome::Skipped));
        assert!(slot.placeholder().is_none());
        assert!(slot.children().is_empty());
    }

    #[test]
    fn unbind_keeps_visual_alive() {
        let page = ok_page(3);
        let adapter = adapter_with(vec![Arc::clone(&page)]);
        let mut slot = MemorySlot::new(1);

        adapter.bind(0, &mut slot);
        adapter.unbind(&mut slot);
        assert!(slot.children().is_empty());
        assert!(page.is_materialized());
    }

    #[test]
    fn warm_reports_already_warm() {
        let adapter = adapter_with(vec![ok_page(0)]);
        assert_eq!(adapter.warm(0).unwrap(), WarmOutcome::Warmed);
        assert_eq!(adapter.warm(0).unwrap(), WarmOutcome::AlreadyWarm);
        assert!(matches!(
            adapter.warm(4),
            Err(PagerError::InvalidIndex { index: 4, len: 1 })
        ));
    }
}
