//! Background loading for list screens.
//!
//! The UI thread owns every piece of view and list state. Anything slow, such
//! as fetching records from the catalog service, runs as a producer on a
//! process-wide worker pool, and its result is marshalled back to the UI
//! thread before any callback sees it.
//!
//! # Architecture
//!
//! - [`pool`]: The shared [`WorkerPool`] of named threads
//! - [`loader`]: [`AsyncLoader`], which submits producers and delivers
//!   completions on the UI thread
//! - [`sequence`]: [`RequestSequencer`] for discarding superseded results
//! - [`trace`]: [`TraceContext`] propagation so worker spans join the
//!   submitting trace

pub mod loader;
pub mod pool;
pub mod sequence;
pub mod trace;

pub use loader::{AsyncLoader, LoadHandle};
pub use pool::{WorkerPool, DEFAULT_WORKER_THREADS};
pub use sequence::{RequestSequencer, RequestTag};
pub use trace::TraceContext;
