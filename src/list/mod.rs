//! Searchable, paginated record lists.
//!
//! Every list screen follows the same pattern: hold the records last loaded
//! from a service, narrow them with a field selector and a free-text query,
//! and show one fixed-size page at a time. This module is that pattern as a
//! single generic component.
//!
//! # Organization
//!
//! - [`criteria`]: [`SearchCriteria`], [`FieldSelector`] and [`FieldAccessors`]
//! - [`matcher`]: the pure case-insensitive substring matcher
//! - [`paged`]: [`PagedListModel`], the master/filtered/paged state
//! - [`columns`]: typed [`ColumnDescriptor`]s for table rendering
//!
//! Nothing in this module performs I/O, spawns threads, or returns errors.

pub mod columns;
pub mod criteria;
pub mod matcher;
pub mod paged;

pub use columns::ColumnDescriptor;
pub use criteria::{FieldAccessors, FieldSelector, SearchCriteria};
pub use matcher::{highlight_ranges, matches, CriteriaMatcher};
pub use paged::PagedListModel;
