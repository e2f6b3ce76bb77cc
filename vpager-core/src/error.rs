//! Pager error types
//!
//! None of these are fatal. The facade logs them and degrades to a no-op, a
//! placeholder, or the previous configuration.

use thiserror::Error;

use vpager_config::ConfigError;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum PagerError {
    /// Index outside `[0, len)` passed to bind, scroll, remove or warm.
    #[error("index {index} out of range for {len} pages")]
    InvalidIndex { index: usize, len: usize },

    /// A page's visual factory returned an error.
    #[error("page {index} failed to create its visual: {source}")]
    ContentCreation {
        index: usize,
        #[source]
        source: BoxError,
    },

    /// A page's visual factory panicked.
    #[error("page {index} panicked while creating its visual: {message}")]
    ContentPanicked { index: usize, message: String },

    /// The operation needs a live host container and none is attached.
    #[error("{0} requires an attached host container")]
    HostUnavailable(&'static str),

    /// Deferred work was requested outside a tokio runtime.
    #[error("{0} requires a tokio runtime")]
    NoRuntime(&'static str),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl PagerError {
    pub(crate) fn content(index: usize, err: anyhow::Error) -> Self {
        Self::ContentCreation {
            index,
            source: err.into(),
        }
    }
}
