//! Predictive preloading.
//!
//! After a swipe settles, pages just outside the host's cache window are
//! warmed one at a time on a tokio task, biased towards the direction the user
//! was travelling. Only one job exists at a time: scheduling a new one, an
//! explicit [`PreloadScheduler::cancel`], or dropping the scheduler stops the
//! previous job before its next step runs.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::binding::WarmOutcome;
use crate::constants::preload as consts;
use crate::error::PagerError;
use crate::scroll::Direction;

/// Inclusive range of page indices. Never inverted: `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreloadRange {
    start: usize,
    end: usize,
}

impl PreloadRange {
    /// `None` when `start > end`; an inverted range has nothing to warm.
    pub fn new(start: usize, end: usize) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end.checked_sub(self.start).map_or(0, |span| span + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.start..=self.end).contains(&index)
    }

    pub fn iter(&self) -> std::ops::RangeInclusive<usize> {
        self.start..=self.end
    }
}

/// Pages to warm after settling on `current`.
///
/// `cache_window` is how many pages the host already keeps alive on each
/// side, so the range starts at its edge. Returns `None` when nothing is
/// left to warm.
pub fn plan_range(
    current: usize,
    total: usize,
    cache_window: usize,
    direction: Direction,
) -> Option<PreloadRange> {
    if total == 0 {
        return None;
    }
    let c = current as i64;
    let w = cache_window as i64;
    let last = total as i64 - 1;

    let (start, end) = match direction {
        Direction::Forward => {
            (c + w, last.min(c + w + consts::DIRECTIONAL_EXTRA as i64))
        }
        Direction::Backward => {
            ((c - w - consts::DIRECTIONAL_EXTRA as i64).max(0), c - w)
        }
        Direction::None => (
            (c - w - consts::SYMMETRIC_EXTRA as i64).max(0),
            last.min(c + w + consts::SYMMETRIC_EXTRA as i64),
        ),
    };

    if start < 0 || end < 0 {
        return None;
    }
    PreloadRange::new(start as usize, end as usize)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreloadTiming {
    /// Wait between scheduling and the first step.
    pub debounce: Duration,
    /// Wait between consecutive steps.
    pub step_interval: Duration,
}

impl Default for PreloadTiming {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(consts::DEBOUNCE_MS),
            step_interval: Duration::from_millis(consts::STEP_INTERVAL_MS),
        }
    }
}

/// Something that can materialize a page by index.
pub trait PreloadTarget: Send + Sync + 'static {
    fn warm(&self, index: usize) -> Result<WarmOutcome, PagerError>;
}

/// Cursor over one job's range.
#[derive(Debug)]
struct PreloadJob {
    id: u64,
    range: PreloadRange,
    cursor: usize,
    timing: PreloadTiming,
    started: bool,
}

impl PreloadJob {
    fn new(id: u64, range: PreloadRange, timing: PreloadTiming) -> Self {
        Self {
            id,
            range,
            cursor: range.start,
            timing,
            started: false,
        }
    }

    /// Next index to warm and how long to wait before warming it.
    fn next_step(&mut self) -> Option<(usize, Duration)> {
        if self.cursor > self.range.end {
            return None;
        }
        let delay = if self.started {
            self.timing.step_interval
        } else {
            self.timing.debounce
        };
        self.started = true;
        let index = self.cursor;
        self.cursor += 1;
        Some((index, delay))
    }

    async fn run(
        mut self,
        target: Arc<dyn PreloadTarget>,
        token: CancellationToken,
    ) {
        let mut warmed = 0usize;
        while let Some((index, delay)) = self.next_step() {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    log::trace!("preload job {} cancelled before page {}", self.id, index);
                    return;
                }
                _ = tokio::time::sleep(delay) => {}
            }
            if token.is_cancelled() {
                return;
            }

            match target.warm(index) {
                Ok(WarmOutcome::Warmed) => {
                    warmed += 1;
                    log::trace!("preload job {} warmed page {}", self.id, index);
                }
                Ok(WarmOutcome::AlreadyWarm) => {}
                Err(err) => {
                    log::warn!("preload job {} skipped page {}: {}", self.id, index, err);
                }
            }
        }
        log::debug!(
            "preload job {} finished {:?}: {} of {} pages warmed",
            self.id,
            self.range,
            warmed,
            self.range.len()
        );
    }
}

#[derive(Debug)]
struct ActiveJob {
    id: u64,
    range: PreloadRange,
    token: CancellationToken,
    handle: JoinHandle<()>,
}

pub struct PreloadScheduler {
    target: Arc<dyn PreloadTarget>,
    timing: PreloadTiming,
    runtime: Option<Handle>,
    active: Mutex<Option<ActiveJob>>,
    next_id: AtomicU64,
}

impl std::fmt::Debug for PreloadScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreloadScheduler")
            .field("timing", &self.timing)
            .field("has_runtime", &self.runtime.is_some())
            .field("active", &self.active_job())
            .finish()
    }
}

impl PreloadScheduler {
    /// Picks up the ambient tokio runtime, if any.
    pub fn new(target: Arc<dyn PreloadTarget>, timing: PreloadTiming) -> Self {
        Self {
            target,
            timing,
            runtime: Handle::try_current().ok(),
            active: Mutex::new(None),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn timing(&self) -> PreloadTiming {
        self.timing
    }

    /// Cancel whatever is running, then plan and start a job for a settle on
    /// `current`. Returns the new job id.
    pub fn preload_around(
        &self,
        current: usize,
        total: usize,
        cache_window: usize,
        direction: Direction,
    ) -> Option<u64> {
        self.cancel();
        match plan_range(current, total, cache_window, direction) {
            Some(range) => self.schedule(range),
            None => {
                log::trace!(
                    "nothing to preload around page {current} of {total} ({direction})"
                );
                None
            }
        }
    }

    /// Start warming `range`, superseding any job in flight.
    pub fn schedule(&self, range: PreloadRange) -> Option<u64> {
        let mut active = self.active.lock();
        if let Some(previous) = active.take() {
            stop(previous);
        }

        let Some(runtime) = self
            .runtime
            .clone()
            .or_else(|| Handle::try_current().ok())
        else {
            log::warn!("preload of {:?} skipped: {}", range, PagerError::NoRuntime("preload"));
            return None;
        };

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();
        let job = PreloadJob::new(id, range, self.timing);
        let handle = runtime.spawn(job.run(Arc::clone(&self.target), token.clone()));

        log::debug!("preload job {id} scheduled for {range:?}");
        *active = Some(ActiveJob {
            id,
            range,
            token,
            handle,
        });
        Some(id)
    }

    /// Stop the current job, if any. Safe to call repeatedly.
    pub fn cancel(&self) {
        if let Some(job) = self.active.lock().take() {
            log::trace!("preload job {} cancelled", job.id);
            stop(job);
        }
    }

    /// Id and range of the job still running, if any.
    pub fn active_job(&self) -> Option<(u64, PreloadRange)> {
        self.active
            .lock()
            .as_ref()
            .filter(|job| !job.handle.is_finished() && !job.token.is_cancelled())
            .map(|job| (job.id, job.range))
    }

    pub fn is_active(&self) -> bool {
        self.active_job().is_some()
    }
}

impl Drop for PreloadScheduler {
    fn drop(&mut self) {
        if let Some(job) = self.active.get_mut().take() {
            stop(job);
        }
    }
}

fn stop(job: ActiveJob) {
    job.token.cancel();
    job.handle.abort();
}
