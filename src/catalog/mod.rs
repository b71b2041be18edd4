//! Library catalog records and the service that serves them.
//!
//! This is the collaborator side of the client: the list and navigation core
//! never depends on it. The demo client wires one generic list screen per
//! [`CatalogRecord`] type.

pub mod records;
pub mod service;

pub use records::{Book, CatalogRecord, Exemplar, Group, Loan, RecordKind, User};
pub use service::{CatalogData, CatalogService, JsonCatalog};
