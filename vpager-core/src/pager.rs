//! The pager facade.
//!
//! [`VerticalPager`] is what both sides talk to. The embedder mutates pages,
//! scrolls and configures the indicator; the host container forwards its
//! gesture signals (`on_drag_begin`, `on_position_changed`, `on_settle`).
//! Nothing here returns an error to the caller: invalid requests are logged
//! and ignored, and work that needs a host is remembered until one attaches.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use vpager_config::models::clamp_cache_size;
use vpager_config::{ConfigWarning, IndicatorConfig, PagerOptions, PagerSettings};

use crate::binding::{PlaceholderPolicy, ViewBindingAdapter};
use crate::constants::release as release_consts;
use crate::error::PagerError;
use crate::events::{EventSink, PagerEvent};
use crate::host::HostContainer;
use crate::indicator::{self, IndicatorFrame, Size};
use crate::page::{OwnerId, PageRef};
use crate::preload::{PreloadScheduler, PreloadTiming};
use crate::scroll::{PagerState, ScrollTracker, SettleOutcome};
use crate::store::PageStore;

#[derive(Debug, Default)]
pub struct PagerBuilder {
    settings: PagerSettings,
    pages: Vec<PageRef>,
    timing: PreloadTiming,
    policy: PlaceholderPolicy,
    runtime: Option<Handle>,
}

impl PagerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn settings(mut self, settings: PagerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Apply raw options on top of the settings so far. Problems are logged
    /// and the affected option keeps its previous value.
    pub fn options(mut self, options: &PagerOptions) -> Self {
        let (settings, _warnings) = options.apply_to(self.settings);
        self.settings = settings;
        self
    }

    pub fn pages(mut self, pages: Vec<PageRef>) -> Self {
        self.pages = pages;
        self
    }

    pub fn preload_timing(mut self, timing: PreloadTiming) -> Self {
        self.timing = timing;
        self
    }

    pub fn placeholder_policy(mut self, policy: PlaceholderPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Runtime for preload and release timers. Defaults to the ambient one.
    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn build(self) -> VerticalPager {
        let owner = OwnerId::next();
        let store = PageStore::new(owner);
        let adapter = Arc::new(ViewBindingAdapter::new(owner, self.policy));
        let runtime = self.runtime.or_else(|| Handle::try_current().ok());

        let mut scheduler = PreloadScheduler::new(adapter.clone(), self.timing);
        if let Some(handle) = &runtime {
            scheduler = scheduler.with_runtime(handle.clone());
        }

        let pager = VerticalPager {
            owner,
            store,
            adapter,
            tracker: Mutex::new(ScrollTracker::new(self.settings.cache_size)),
            scheduler,
            settings: RwLock::new(self.settings),
            host: RwLock::new(None),
            pending_scroll: Mutex::new(None),
            listeners: RwLock::new(Vec::new()),
            release: Mutex::new(None),
            runtime,
            torn_down: AtomicBool::new(false),
        };
        if !self.pages.is_empty() {
            pager.set_views(self.pages);
        }
        pager
    }
}

/// Delayed restore of the host's offscreen limit.
#[derive(Debug)]
struct ReleaseTask {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl ReleaseTask {
    fn stop(self) {
        self.token.cancel();
        self.handle.abort();
    }
}

pub struct VerticalPager {
    owner: OwnerId,
    store: PageStore,
    adapter: Arc<ViewBindingAdapter>,
    tracker: Mutex<ScrollTracker>,
    scheduler: PreloadScheduler,
    settings: RwLock<PagerSettings>,
    host: RwLock<Option<Arc<dyn HostContainer>>>,
    /// Programmatic scroll requested before a host attached.
    pending_scroll: Mutex<Option<(usize, bool)>>,
    listeners: RwLock<Vec<Arc<dyn EventSink>>>,
    release: Mutex<Option<ReleaseTask>>,
    runtime: Option<Handle>,
    torn_down: AtomicBool,
}

impl std::fmt::Debug for VerticalPager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerticalPager")
            .field("owner", &self.owner)
            .field("pages", &self.store.len())
            .field("state", &self.state())
            .field("has_host", &self.host.read().is_some())
            .field("torn_down", &self.torn_down.load(Ordering::Relaxed))
            .finish()
    }
}

impl VerticalPager {
    pub fn builder() -> PagerBuilder {
        PagerBuilder::new()
    }

    pub fn new(settings: PagerSettings) -> Self {
        PagerBuilder::new().settings(settings).build()
    }

    pub fn with_pages(pages: Vec<PageRef>, settings: PagerSettings) -> Self {
        PagerBuilder::new().settings(settings).pages(pages).build()
    }

    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    pub fn adapter(&self) -> Arc<ViewBindingAdapter> {
        Arc::clone(&self.adapter)
    }

    pub fn pages(&self) -> Vec<PageRef> {
        self.store.snapshot()
    }

    pub fn page_count(&self) -> usize {
        self.store.len()
    }

    pub fn current_page(&self) -> usize {
        self.tracker.lock().current_page()
    }

    pub fn state(&self) -> PagerState {
        self.tracker.lock().state()
    }

    pub fn settings(&self) -> PagerSettings {
        *self.settings.read()
    }

    pub fn cache_size(&self) -> usize {
        self.settings.read().cache_size
    }

    pub fn is_preloading(&self) -> bool {
        self.scheduler.is_active()
    }

    pub fn has_host(&self) -> bool {
        self.host.read().is_some()
    }

    fn host(&self) -> Option<Arc<dyn HostContainer>> {
        self.host.read().clone()
    }

    fn live(&self, op: &str) -> bool {
        let live = !self.torn_down.load(Ordering::Acquire);
        if !live {
            log::warn!("{op} ignored: pager has been torn down");
        }
        live
    }

    // Host lifecycle

    /// Connect to a host container and replay everything configured so far.
    pub fn attach_host(&self, host: Arc<dyn HostContainer>) {
        if !self.live("attach_host") {
            return;
        }
        self.adapter.set_host(Some(&host));
        *self.host.write() = Some(Arc::clone(&host));
        host.register_adapter(Arc::clone(&self.adapter));
        self.reload();

        let pending = self.pending_scroll.lock().take();
        if let Some((index, animated)) = pending {
            if index < self.store.len() {
                host.set_current_item(index, animated);
            } else {
                log::debug!("dropping stale pending scroll to page {index}");
            }
        }
        log::debug!("pager {:?} attached to host", self.owner);
    }

    /// Disconnect from the host. Preloading keeps working against the
    /// adapter; host-bound requests are remembered again until reattached.
    pub fn detach_host(&self) {
        self.cancel_release();
        self.adapter.set_host(None);
        if self.host.write().take().is_some() {
            log::debug!("pager {:?} detached from host", self.owner);
        }
    }

    /// Push the current page list and cache window to the adapter and host.
    fn reload(&self) {
        let pages = self.store.snapshot();
        let count = pages.len();
        self.tracker.lock().clamp_to(count);
        self.adapter.update_data(pages);

        if let Some(host) = self.host() {
            host.set_offscreen_limit(Some(self.cache_size()));
            host.invalidate_indicator();
        }
    }

    // Page mutation

    pub fn set_views(&self, pages: Vec<PageRef>) {
        if !self.live("set_views") {
            return;
        }
        self.scheduler.cancel();
        self.store.replace(pages);
        self.reload();
    }

    pub fn add_view(&self, page: PageRef) {
        if !self.live("add_view") {
            return;
        }
        self.store.append(page);
        self.reload();
    }

    /// Remove the page at `index`. Out of range is a logged no-op.
    pub fn remove_view(&self, index: usize) -> Option<PageRef> {
        if !self.live("remove_view") {
            return None;
        }
        let removed = self.store.remove_at(index)?;
        self.reload();
        Some(removed)
    }

    // Navigation

    /// Jump to `index`. Emits no `change` event.
    pub fn scroll_to_page(&self, index: usize, animated: bool) {
        if !self.live("scroll_to_page") {
            return;
        }
        let len = self.store.len();
        if index >= len {
            log::warn!(
                "scroll ignored: {}",
                PagerError::InvalidIndex { index, len }
            );
            return;
        }

        self.tracker.lock().set_current_page(index);
        match self.host() {
            Some(host) => {
                host.set_current_item(index, animated);
                host.invalidate_indicator();
            }
            None => {
                log::debug!(
                    "{}; page {index} applied on attach",
                    PagerError::HostUnavailable("scroll_to_page")
                );
                *self.pending_scroll.lock() = Some((index, animated));
            }
        }
    }

    // Memory

    /// Have the host drop its offscreen cache for a moment, then restore the
    /// pager's cache window.
    pub fn release_from_memory(&self) {
        if !self.live("release_from_memory") {
            return;
        }
        self.scheduler.cancel();

        let Some(host) = self.host() else {
            log::warn!(
                "release skipped: {}",
                PagerError::HostUnavailable("release_from_memory")
            );
            return;
        };

        self.cancel_release();
        host.set_offscreen_limit(None);
        host.notify_data_changed();

        let limit = self.cache_size();
        let Some(runtime) =
            self.runtime.clone().or_else(|| Handle::try_current().ok())
        else {
            log::warn!(
                "{}; restoring offscreen limit immediately",
                PagerError::NoRuntime("release_from_memory")
            );
            host.set_offscreen_limit(Some(limit));
            return;
        };

        let token = CancellationToken::new();
        let child = token.clone();
        let delay = Duration::from_millis(release_consts::RESTORE_DELAY_MS);
        let handle = runtime.spawn(async move {
            tokio::select! {
                biased;
                _ = child.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }
            if !child.is_cancelled() {
                host.set_offscreen_limit(Some(limit));
                log::trace!("offscreen limit restored to {limit}");
            }
        });
        *self.release.lock() = Some(ReleaseTask { token, handle });
    }

    fn cancel_release(&self) {
        if let Some(task) = self.release.lock().take() {
            task.stop();
        }
    }

    pub fn set_cache_size(&self, requested: i64) {
        let size = clamp_cache_size(requested);
        self.settings.write().cache_size = size;
        self.tracker.lock().set_cache_window(size);
        // A pending restore would overwrite the new limit with the old one.
        self.cancel_release();
        if let Some(host) = self.host() {
            host.set_offscreen_limit(Some(size));
        }
    }

    // Configuration

    /// Apply raw options on top of the current settings. Returns what was
    /// ignored; the rest takes effect.
    pub fn apply_options(&self, options: &PagerOptions) -> Vec<ConfigWarning> {
        let (next, warnings) = options.apply_to(self.settings());
        self.apply_settings(next);
        warnings
    }

    fn apply_settings(&self, next: PagerSettings) {
        let previous = std::mem::replace(&mut *self.settings.write(), next);
        if previous.cache_size != next.cache_size {
            self.set_cache_size(next.cache_size as i64);
        }
        if previous != next
            && let Some(host) = self.host()
        {
            host.invalidate_indicator();
        }
    }

    /// Configure the indicator from a typed config. On error the previous
    /// indicator stays.
    pub fn set_indicator(&self, config: &IndicatorConfig) -> Vec<ConfigWarning> {
        let mut next = self.settings();
        match config.resolve(&next.style) {
            Ok((style, mount)) => {
                next.style = style;
                next.indicator = Some(mount);
                self.apply_settings(next);
                Vec::new()
            }
            Err(err) => {
                let warning = ConfigWarning {
                    option: "pageIndicator",
                    message: err.to_string(),
                };
                log::warn!("{warning}");
                vec![warning]
            }
        }
    }

    /// Configure the indicator from an untyped `pageIndicator` value.
    pub fn apply_indicator_value(
        &self,
        value: serde_json::Value,
    ) -> Vec<ConfigWarning> {
        self.apply_options(&PagerOptions {
            page_indicator: Some(value),
            ..Default::default()
        })
    }

    pub fn remove_indicator(&self) {
        let mut next = self.settings();
        next.indicator = None;
        self.apply_settings(next);
    }

    pub fn set_page_indicator_color(&self, color: &str) -> Vec<ConfigWarning> {
        self.apply_options(&PagerOptions {
            page_indicator_color: Some(color.to_string()),
            ..Default::default()
        })
    }

    pub fn set_current_page_indicator_color(
        &self,
        color: &str,
    ) -> Vec<ConfigWarning> {
        self.apply_options(&PagerOptions {
            current_page_indicator_color: Some(color.to_string()),
            ..Default::default()
        })
    }

    /// Lay out the indicator inside a pager of `bounds`. `None` when no
    /// indicator is configured.
    pub fn indicator_frame(&self, bounds: Size) -> Option<IndicatorFrame> {
        let settings = self.settings();
        let mount = settings.indicator?;
        let (position, fraction) = self.tracker.lock().indicator_position();
        Some(IndicatorFrame::layout(
            self.store.len(),
            position,
            fraction,
            &settings.style,
            mount,
            bounds,
        ))
    }

    pub fn indicator_preferred_size(&self) -> Option<Size> {
        let settings = self.settings();
        let mount = settings.indicator?;
        Some(indicator::preferred_size(
            self.store.len(),
            &settings.style,
            mount.kind,
        ))
    }

    // Host signals

    pub fn on_drag_begin(&self) {
        let started = self.tracker.lock().drag_begin();
        if let Some((current_page, direction)) = started {
            self.emit(|| PagerEvent::ScrollStart {
                current_page,
                direction,
            });
        }
    }

    /// `pixels` is the raw offset the host reports alongside `fraction`.
    pub fn on_position_changed(&self, position: usize, fraction: f32, pixels: f32) {
        let sample = self
            .tracker
            .lock()
            .position_changed(position, fraction, pixels);

        let has_indicator = self.settings.read().indicator.is_some();
        if has_indicator && let Some(host) = self.host() {
            host.invalidate_indicator();
        }

        if let Some(sample) = sample {
            self.emit(|| PagerEvent::Scroll {
                current_page: sample.position,
                offset: sample.offset,
                direction: sample.direction,
            });
        }
    }

    /// The host's swipe came to rest on its current item.
    pub fn on_settle(&self) {
        let Some(host) = self.host() else {
            log::warn!(
                "settle ignored: {}",
                PagerError::HostUnavailable("on_settle")
            );
            return;
        };
        let reported = host.current_item();
        let count = self.store.len();
        let outcome = self.tracker.lock().settle(reported, count);

        let SettleOutcome::Settled {
            current_page,
            previous_page,
            changed,
            preload_direction,
        } = outcome
        else {
            log::trace!("settle produced {outcome:?}");
            return;
        };

        host.invalidate_indicator();

        if changed && let Some(current_view) = self.store.get(current_page) {
            let previous_view = self.store.get(previous_page);
            self.emit(|| PagerEvent::Change {
                current_page,
                previous_page,
                current_view,
                previous_view,
            });
        }
        self.emit(|| PagerEvent::ScrollEnd { current_page });

        self.scheduler.preload_around(
            current_page,
            count,
            self.cache_size(),
            preload_direction,
        );
    }

    // Events

    pub fn add_listener(&self, listener: Arc<dyn EventSink>) {
        self.listeners.write().push(listener);
    }

    pub fn clear_listeners(&self) {
        self.listeners.write().clear();
    }

    /// Build and deliver an event, but only if someone is listening. No lock
    /// is held while listeners run.
    fn emit(&self, build: impl FnOnce() -> PagerEvent) {
        let listeners = self.listeners.read().clone();
        if listeners.is_empty() {
            return;
        }
        let event = build();
        log::trace!("emitting {}", event.name());
        for listener in &listeners {
            listener.deliver(&event);
        }
    }

    // Teardown

    /// Stop all deferred work and let go of pages and host. Safe to call more
    /// than once; also runs on drop.
    pub fn teardown(&self) {
        if self.torn_down.swap(true, Ordering::AcqRel) {
            return;
        }
        self.scheduler.cancel();
        self.cancel_release();
        let released = self.store.release_all();
        self.adapter.clear();
        self.host.write().take();
        self.pending_scroll.lock().take();
        self.listeners.write().clear();
        log::debug!(
            "pager {:?} torn down, released {} pages",
            self.owner,
            released
        );
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down.load(Ordering::Acquire)
    }
}

impl Drop for VerticalPager {
    fn drop(&mut self) {
        self.teardown();
    }
}
