//! Core of the vertical pager.
//!
//! A stack of caller-supplied pages is shown one at a time inside a host
//! view-recycling container. This crate owns everything that is not
//! toolkit-specific:
//!
//! - [`store::PageStore`]: the ordered page collection and owner bookkeeping
//! - [`binding::ViewBindingAdapter`]: binds pages into host slots, turning
//!   content failures into placeholders
//! - [`scroll::ScrollTracker`]: drag/settle state machine and direction
//! - [`preload::PreloadScheduler`]: direction-biased warming of off-screen
//!   pages after a swipe settles
//! - [`indicator`]: dot layout for the page indicator
//! - [`pager::VerticalPager`]: the facade the host and embedder talk to
//!
//! The host toolkit plugs in through [`host::HostContainer`] and
//! [`host::Slot`]; pages through [`page::Page`] and [`page::Visual`].

pub mod binding;
pub mod constants;
pub mod error;
pub mod events;
pub mod host;
pub mod indicator;
pub mod page;
pub mod pager;
pub mod preload;
pub mod scroll;
pub mod store;
pub mod testing;

pub use binding::{
    BindOutcome, Placeholder, PlaceholderPolicy, ViewBindingAdapter,
    WarmOutcome,
};
pub use error::PagerError;
pub use events::{EventSink, PagerEvent};
pub use host::{HostContainer, Slot};
pub use indicator::{Dot, IndicatorFrame, Size, Viewport};
pub use page::{
    LazyPage, NativeHandle, OwnerId, Page, PageRef, SlotId, Visual, VisualRef,
};
pub use pager::{PagerBuilder, VerticalPager};
pub use preload::{
    PreloadRange, PreloadScheduler, PreloadTarget, PreloadTiming, plan_range,
};
pub use scroll::{Direction, PagerState, ScrollPhase, ScrollTracker};
pub use store::PageStore;

pub use vpager_config as config;
