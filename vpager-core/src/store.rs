//! Ordered page collection.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::PagerError;
use crate::page::{self, OwnerId, PageRef};

/// The pager's pages, in display order.
///
/// Cloning shares the same collection. Every page held here is claimed for
/// `owner`; pages leaving the store are released unless another copy of the
/// same handle is still a member.
#[derive(Clone)]
pub struct PageStore {
    owner: OwnerId,
    pages: Arc<RwLock<Vec<PageRef>>>,
}

impl std::fmt::Debug for PageStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageStore")
            .field("owner", &self.owner)
            .field("len", &self.len())
            .finish()
    }
}

impl PageStore {
    pub fn new(owner: OwnerId) -> Self {
        Self {
            owner,
            pages: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    /// Swap in a new page list. Old pages are released before the new ones
    /// are claimed so a page present in both keeps its owner.
    pub fn replace(&self, pages: Vec<PageRef>) {
        let mut guard = self.pages.write();
        for old in guard.iter() {
            page::release(old.as_ref(), self.owner);
        }
        for new in &pages {
            page::claim(new.as_ref(), self.owner);
        }
        log::debug!("page store replaced: {} -> {} pages", guard.len(), pages.len());
        *guard = pages;
    }

    pub fn append(&self, page: PageRef) {
        page::claim(page.as_ref(), self.owner);
        self.pages.write().push(page);
    }

    /// Remove and return the page at `index`. Out of range is a logged no-op.
    pub fn remove_at(&self, index: usize) -> Option<PageRef> {
        let mut guard = self.pages.write();
        if index >= guard.len() {
            log::warn!(
                "remove ignored: {}",
                PagerError::InvalidIndex {
                    index,
                    len: guard.len()
                }
            );
            return None;
        }
        let removed = guard.remove(index);
        let still_member = guard.iter().any(|p| Arc::ptr_eq(p, &removed));
        if !still_member {
            page::release(removed.as_ref(), self.owner);
        }
        Some(removed)
    }

    pub fn snapshot(&self) -> Vec<PageRef> {
        self.pages.read().clone()
    }

    pub fn get(&self, index: usize) -> Option<PageRef> {
        self.pages.read().get(index).cloned()
    }

    pub fn len(&self) -> usize {
        self.pages.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.read().is_empty()
    }

    /// Release every page and empty the store.
    pub fn release_all(&self) -> usize {
        let drained: Vec<PageRef> = std::mem::take(&mut *self.pages.write());
        for page in &drained {
            page::release(page.as_ref(), self.owner);
        }
        drained.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{LazyPage, Page};
    use crate::testing::BasicVisual;

    fn pages(n: usize) -> Vec<PageRef> {
        (0..n)
            .map(|i| {
                LazyPage::new(format!("p{i}"), move || {
                    Ok(BasicVisual::shared(i as u64))
                })
                .shared()
            })
            .collect()
    }

    fn same(a: &[PageRef], b: &[PageRef]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| Arc::ptr_eq(x, y))
    }

    #[test]
    fn replace_then_snapshot_preserves_order_and_duplicates() {
        let store = PageStore::new(OwnerId::next());
        let mut input = pages(3);
        input.push(Arc::clone(&input[0]));

        store.replace(input.clone());
        assert!(same(&store.snapshot(), &input));
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn replace_moves_ownership() {
        let store = PageStore::new(OwnerId::next());
        let first = pages(2);
        let second = pages(2);
        let kept = Arc::clone(&first[1]);

        store.replace(first.clone());
        assert!(first.iter().all(|p| p.owner() == Some(store.owner())));

        store.replace(vec![Arc::clone(&second[0]), Arc::clone(&kept)]);
        assert_eq!(first[0].owner(), None);
        assert_eq!(kept.owner(), Some(store.owner()));
        assert_eq!(second[0].owner(), Some(store.owner()));
    }

    #[test]
    fn remove_out_of_range_leaves_snapshot_unchanged() {
        let store = PageStore::new(OwnerId::next());
        let input = pages(3);
        store.replace(input.clone());

        assert!(store.remove_at(3).is_none());
        assert!(store.remove_at(usize::MAX).is_none());
        assert!(same(&store.snapshot(), &input));
    }

    #[test]
    fn remove_releases_owner_unless_still_present() {
        let store = PageStore::new(OwnerId::next());
        let input = pages(2);
        store.replace(vec![
            Arc::clone(&input[0]),
            Arc::clone(&input[1]),
            Arc::clone(&input[0]),
        ]);

        let removed = store.remove_at(0).unwrap();
        assert!(Arc::ptr_eq(&removed, &input[0]));
        assert_eq!(input[0].owner(), Some(store.owner()));

        store.remove_at(1);
        assert_eq!(input[0].owner(), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn release_all_clears_everything() {
        let store = PageStore::new(OwnerId::next());
        let input = pages(4);
        store.replace(input.clone());

        assert_eq!(store.release_all(), 4);
        assert!(store.is_empty());
        assert!(input.iter().all(|p| p.owner().is_none()));
    }

    #[test]
    fn foreign_owner_is_left_alone() {
        let other = OwnerId::next();
        let store = PageStore::new(OwnerId::next());
        let page = pages(1).remove(0);
        page.set_owner(Some(other));

        store.append(Arc::clone(&page));
        store.release_all();
        assert_eq!(page.owner(), Some(other));
    }
}
