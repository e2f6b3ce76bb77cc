//! Page and visual handles.
//!
//! Pages are supplied by the embedder and shared as [`PageRef`]. The pager
//! never owns a page; it only records a weak "owner" relation through an
//! [`OwnerId`] while the page is a member, so lifecycle calls can be routed
//! without a reference cycle.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

static NEXT_OWNER_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a pager as seen by its pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerId(u64);

impl OwnerId {
    /// Allocate a fresh, process-unique id.
    pub fn next() -> Self {
        Self(NEXT_OWNER_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// Opaque toolkit handle for a visual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeHandle(pub u64);

/// Identity of a reusable host slot (a recycled container).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(pub u64);

/// A page's visual representation. A visual has at most one parent slot.
pub trait Visual: Send + Sync {
    fn native_handle(&self) -> NativeHandle;

    /// Slot currently holding this visual, if any.
    fn attached_to(&self) -> Option<SlotId>;

    /// Record that `slot` now holds this visual.
    fn attach_to(&self, slot: SlotId);

    /// Remove this visual from whatever slot holds it.
    fn detach(&self);
}

pub type VisualRef = Arc<dyn Visual>;

impl fmt::Debug for dyn Visual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Visual")
            .field("handle", &self.native_handle())
            .field("attached_to", &self.attached_to())
            .finish()
    }
}

/// One unit of user-supplied content.
pub trait Page: Send + Sync {
    fn owner(&self) -> Option<OwnerId>;

    fn set_owner(&self, owner: Option<OwnerId>);

    /// Whether the visual already exists (creating it would be free).
    fn is_materialized(&self) -> bool;

    /// Return the page's visual, creating it on first use. May be expensive
    /// and may fail.
    fn get_or_create_visual(&self) -> anyhow::Result<VisualRef>;

    /// Human-readable name used in logs and events.
    fn label(&self) -> String {
        String::from("page")
    }
}

pub type PageRef = Arc<dyn Page>;

impl fmt::Debug for dyn Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("label", &self.label())
            .field("owner", &self.owner())
            .field("materialized", &self.is_materialized())
            .finish()
    }
}

/// Claim `page` for `owner` unless another owner already holds it.
pub(crate) fn claim(page: &dyn Page, owner: OwnerId) {
    if page.owner().is_none() {
        page.set_owner(Some(owner));
    }
}

/// Drop the owner relation if it still names `owner`.
pub(crate) fn release(page: &dyn Page, owner: OwnerId) {
    if page.owner() == Some(owner) {
        page.set_owner(None);
    }
}

type VisualFactory = dyn Fn() -> anyhow::Result<VisualRef> + Send + Sync;

/// A [`Page`] that creates its visual once from a factory and caches it.
pub struct LazyPage {
    label: String,
    owner: Mutex<Option<OwnerId>>,
    visual: Mutex<Option<VisualRef>>,
    factory: Box<VisualFactory>,
}

impl LazyPage {
    pub fn new<F>(label: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> anyhow::Result<VisualRef> + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            owner: Mutex::new(None),
            visual: Mutex::new(None),
            factory: Box::new(factory),
        }
    }

    pub fn shared(self) -> PageRef {
        Arc::new(self)
    }

    /// Drop the cached visual so the next request recreates it.
    pub fn evict(&self) -> Option<VisualRef> {
        self.visual.lock().take()
    }
}

impl fmt::Debug for LazyPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyPage")
            .field("label", &self.label)
            .field("owner", &*self.owner.lock())
            .field("materialized", &self.visual.lock().is_some())
            .finish()
    }
}

impl Page for LazyPage {
    fn owner(&self) -> Option<OwnerId> {
        *self.owner.lock()
    }

    fn set_owner(&self, owner: Option<OwnerId>) {
        *self.owner.lock() = owner;
    }

    fn is_materialized(&self) -> bool {
        self.visual.lock().is_some()
    }

    fn get_or_create_visual(&self) -> anyhow::Result<VisualRef> {
        // Held across the factory call so concurrent callers create once.
        let mut cached = self.visual.lock();
        if let Some(visual) = cached.as_ref() {
            return Ok(Arc::clone(visual));
        }
        let visual = (self.factory)()?;
        *cached = Some(Arc::clone(&visual));
        Ok(visual)
    }

    fn label(&self) -> String {
        self.label.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::BasicVisual;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn owner_ids_are_unique() {
        let a = OwnerId::next();
        let b = OwnerId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn lazy_page_creates_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let page = LazyPage::new("p0", move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            Ok(BasicVisual::shared(n as u64))
        });

        assert!(!page.is_materialized());
        let first = page.get_or_create_visual().unwrap();
        let second = page.get_or_create_visual().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        page.evict();
        assert!(!page.is_materialized());
        page.get_or_create_visual().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn failed_creation_is_not_cached() {
        let page = LazyPage::new("broken", || anyhow::bail!("no content"));
        assert!(page.get_or_create_visual().is_err());
        assert!(!page.is_materialized());
    }

    #[test]
    fn release_only_clears_matching_owner() {
        let page = LazyPage::new("p", || Ok(BasicVisual::shared(0)));
        let mine = OwnerId::next();
        let theirs = OwnerId::next();

        claim(&page, theirs);
        claim(&page, mine);
        assert_eq!(page.owner(), Some(theirs));

        release(&page, mine);
        assert_eq!(page.owner(), Some(theirs));
        release(&page, theirs);
        assert_eq!(page.owner(), None);
    }
}
