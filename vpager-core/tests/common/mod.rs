//! Shared harness for pager integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use vpager_core::config::PagerSettings;
use vpager_core::testing::{BasicVisual, MemoryHost, RecordingSink};
use vpager_core::{LazyPage, Page, PageRef, VerticalPager};

/// A pager attached to an in-memory host with one recording listener.
pub struct Harness {
    pub pager: VerticalPager,
    pub host: Arc<MemoryHost>,
    pub sink: Arc<RecordingSink>,
    pub pages: Vec<PageRef>,
}

impl Harness {
    pub fn new(count: usize) -> Self {
        Self::with_settings(count, PagerSettings::default())
    }

    pub fn with_settings(count: usize, settings: PagerSettings) -> Self {
        let pages = pages(count);
        let pager = VerticalPager::with_pages(pages.clone(), settings);
        let host = MemoryHost::new();
        let sink = RecordingSink::new();
        pager.add_listener(sink.clone());
        pager.attach_host(host.clone());
        Self {
            pager,
            host,
            sink,
            pages,
        }
    }

    /// Drag through each position in `path`, then settle on `target`.
    pub fn swipe(&self, path: &[(usize, f32)], target: usize) {
        self.pager.on_drag_begin();
        for &(position, fraction) in path {
            self.pager
                .on_position_changed(position, fraction, fraction * 800.0);
        }
        self.host.settle_on(target);
        self.pager.on_settle();
    }

    /// Indices of pages whose visual exists.
    pub fn materialized(&self) -> Vec<usize> {
        self.pages
            .iter()
            .enumerate()
            .filter(|(_, page)| page.is_materialized())
            .map(|(i, _)| i)
            .collect()
    }
}

pub fn pages(count: usize) -> Vec<PageRef> {
    (0..count)
        .map(|i| {
            LazyPage::new(format!("page-{i}"), move || {
                Ok(BasicVisual::shared(i as u64))
            })
            .shared()
        })
        .collect()
}

pub async fn sleep_ms(ms: u64) {
    tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
}
