//! Error types for the Shelfdesk client core.
//!
//! This module defines the centralized error type [`ShelfdeskError`], the
//! [`LoadError`] delivered to asynchronous load failure callbacks, and a
//! [`Result`] alias used throughout the crate. All errors are implemented with
//! the `thiserror` crate.
//!
//! Failure handling is concentrated at two boundaries:
//!
//! - the view-resolution boundary ([`crate::navigation`]), which reports
//!   [`ShelfdeskError::ViewNotFound`], [`ShelfdeskError::ViewLoad`] and the
//!   wiring defects [`ShelfdeskError::ContentAreaNotRegistered`] and
//!   [`ShelfdeskError::NoHostScene`];
//! - the data-fetch boundary ([`crate::worker`]), which reports [`LoadError`].
//!
//! The list model and the search matcher never fail.

use thiserror::Error;

/// Boxed error used as the cause of wrapped failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The main error type for Shelfdesk operations.
///
/// # Examples
///
/// ```
/// use shelfdesk::ShelfdeskError;
///
/// let err = ShelfdeskError::ViewNotFound { view_id: "reports".to_string() };
/// assert_eq!(err.to_string(), "view not found: reports");
/// ```
#[derive(Debug, Error)]
pub enum ShelfdeskError {
    /// The requested symbolic view identifier has no registered definition.
    ///
    /// Not retryable without a code change. The currently displayed scene is
    /// never touched when this is returned.
    #[error("view not found: {view_id}")]
    ViewNotFound {
        /// Identifier that failed to resolve.
        view_id: String,
    },

    /// The view resolved, but instantiating or initializing it failed.
    ///
    /// Wraps the underlying cause. Navigation is all-or-nothing, so the
    /// previous view remains displayed.
    #[error("failed to load view {view_id}: {source}")]
    ViewLoad {
        /// Identifier of the view whose construction failed.
        view_id: String,
        /// Underlying cause.
        #[source]
        source: BoxError,
    },

    /// An embedding operation targeted a content area that was never registered.
    ///
    /// This is a wiring defect in the calling code, not a runtime condition.
    #[error("content area not registered: {area}")]
    ContentAreaNotRegistered {
        /// Name of the missing area (`"main"` for the main content area).
        area: String,
    },

    /// An embedding operation ran while no scene was showing to host the area.
    #[error("no scene is showing to host content area {area}")]
    NoHostScene {
        /// Name of the target area.
        area: String,
    },

    /// An asynchronous producer failed.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The catalog collaborator service reported a failure.
    #[error("catalog error: {0}")]
    Catalog(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or missing.
    #[error("configuration error: {0}")]
    Config(String),

    /// Theme or stylesheet parsing failed.
    #[error("theme error: {0}")]
    Theme(String),
}

impl ShelfdeskError {
    /// Wraps an arbitrary cause into a [`ShelfdeskError::ViewLoad`].
    pub fn view_load(view_id: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::ViewLoad {
            view_id: view_id.into(),
            source: source.into(),
        }
    }
}

/// Failure delivered to an [`AsyncLoader`](crate::worker::AsyncLoader) failure callback.
///
/// Reported exactly once per failed submission. The loader never retries.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The producer returned an error.
    #[error("{message}")]
    Failed {
        /// Display form of the producer's error.
        message: String,
        /// The producer's error itself.
        #[source]
        source: BoxError,
    },

    /// The producer panicked on its worker thread.
    #[error("load panicked: {0}")]
    Panicked(String),

    /// The worker pool was shut down before the producer could complete.
    #[error("worker pool unavailable")]
    PoolUnavailable,
}

impl LoadError {
    /// Builds a [`LoadError::Failed`] from a producer error.
    pub fn failed(source: impl Into<BoxError>) -> Self {
        let source = source.into();
        Self::Failed {
            message: source.to_string(),
            source,
        }
    }
}

/// A specialized `Result` type for Shelfdesk operations.
pub type Result<T> = std::result::Result<T, ShelfdeskError>;
