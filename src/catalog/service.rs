//! The catalog data service the list screens read from.
//!
//! [`CatalogService`] is the seam to the remote library service. Calls may
//! block and may fail; screens only ever invoke them from a worker thread
//! through [`AsyncLoader`](crate::worker::AsyncLoader).
//!
//! [`JsonCatalog`] is the in-process implementation: a JSON document (from a
//! file or the bundled sample) held in memory, with optional artificial
//! latency so the loading states are visible in the demo client.

use super::records::{Book, Exemplar, Group, Loan, RecordKind, User};
use crate::domain::error::{Result, ShelfdeskError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread;
use std::time::Duration;

const SAMPLE_CATALOG: &str = include_str!("../../fixtures/catalog.json");

/// Read and delete access to the library catalog.
pub trait CatalogService: Send + Sync {
    /// # Errors
    ///
    /// Returns [`ShelfdeskError::Catalog`] if the service cannot answer.
    fn books(&self) -> Result<Vec<Book>>;

    /// # Errors
    ///
    /// Returns [`ShelfdeskError::Catalog`] if the service cannot answer.
    fn exemplars(&self) -> Result<Vec<Exemplar>>;

    /// # Errors
    ///
    /// Returns [`ShelfdeskError::Catalog`] if the service cannot answer.
    fn loans(&self) -> Result<Vec<Loan>>;

    /// # Errors
    ///
    /// Returns [`ShelfdeskError::Catalog`] if the service cannot answer.
    fn users(&self) -> Result<Vec<User>>;

    /// # Errors
    ///
    /// Returns [`ShelfdeskError::Catalog`] if the service cannot answer.
    fn groups(&self) -> Result<Vec<Group>>;

    /// Deletes the record of `kind` identified by `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfdeskError::Catalog`] if no such record exists or the
    /// service refuses the deletion.
    fn delete(&self, kind: RecordKind, key: i64) -> Result<()>;
}

/// Serialized form of the whole catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogData {
    #[serde(default)]
    pub books: Vec<Book>,
    #[serde(default)]
    pub exemplars: Vec<Exemplar>,
    #[serde(default)]
    pub loans: Vec<Loan>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub groups: Vec<Group>,
}

/// In-memory catalog loaded from JSON.
///
/// Deletions only affect the in-memory copy; nothing is written back.
///
/// # Example
///
/// ```
/// use shelfdesk::catalog::{CatalogService, JsonCatalog, RecordKind};
///
/// let catalog = JsonCatalog::sample()?;
/// let before = catalog.groups()?.len();
/// let first = catalog.groups()?[0].id;
/// catalog.delete(RecordKind::Group, first)?;
/// assert_eq!(catalog.groups()?.len(), before - 1);
/// # Ok::<(), shelfdesk::ShelfdeskError>(())
/// ```
#[derive(Debug, Default)]
pub struct JsonCatalog {
    data: RwLock<CatalogData>,
    latency: Duration,
}

impl JsonCatalog {
    #[must_use]
    pub fn new(data: CatalogData) -> Self {
        Self {
            data: RwLock::new(data),
            latency: Duration::ZERO,
        }
    }

    /// The sample catalog bundled with the client.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfdeskError::Catalog`] if the bundled JSON is malformed.
    pub fn sample() -> Result<Self> {
        Self::from_json_str(SAMPLE_CATALOG)
    }

    /// # Errors
    ///
    /// Returns [`ShelfdeskError::Catalog`] if `json` is not a valid catalog.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let data: CatalogData = serde_json::from_str(json)
            .map_err(|e| ShelfdeskError::Catalog(format!("failed to parse catalog JSON: {e}")))?;
        tracing::debug!(
            books = data.books.len(),
            exemplars = data.exemplars.len(),
            loans = data.loans.len(),
            users = data.users.len(),
            groups = data.groups.len(),
            "catalog loaded"
        );
        Ok(Self::new(data))
    }

    /// # Errors
    ///
    /// Returns [`ShelfdeskError::Io`] if the file cannot be read, or
    /// [`ShelfdeskError::Catalog`] if it is not a valid catalog.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = ?path, "reading catalog file");
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Delays every call by `latency`, imitating a remote service.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, CatalogData>> {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }
        self.data
            .read()
            .map_err(|_| ShelfdeskError::Catalog("catalog lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, CatalogData>> {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }
        self.data
            .write()
            .map_err(|_| ShelfdeskError::Catalog("catalog lock poisoned".to_string()))
    }
}

fn remove_by_id<T>(records: &mut Vec<T>, id: impl Fn(&T) -> i64, key: i64) -> bool {
    let before = records.len();
    records.retain(|record| id(record) != key);
    records.len() != before
}

impl CatalogService for JsonCatalog {
    fn books(&self) -> Result<Vec<Book>> {
        Ok(self.read()?.books.clone())
    }

    fn exemplars(&self) -> Result<Vec<Exemplar>> {
        Ok(self.read()?.exemplars.clone())
    }

    fn loans(&self) -> Result<Vec<Loan>> {
        Ok(self.read()?.loans.clone())
    }

    fn users(&self) -> Result<Vec<User>> {
        Ok(self.read()?.users.clone())
    }

    fn groups(&self) -> Result<Vec<Group>> {
        Ok(self.read()?.groups.clone())
    }

    fn delete(&self, kind: RecordKind, key: i64) -> Result<()> {
        let mut data = self.write()?;
        let removed = match kind {
            RecordKind::Book => {
                if data.exemplars.iter().any(|e| e.book_id == key) {
                    return Err(ShelfdeskError::Catalog(format!(
                        "book {key} still has copies and cannot be deleted"
                    )));
                }
                remove_by_id(&mut data.books, |b| b.id, key)
            }
            RecordKind::Exemplar => remove_by_id(&mut data.exemplars, |e| e.id, key),
            RecordKind::Loan => remove_by_id(&mut data.loans, |l| l.id, key),
            RecordKind::User => remove_by_id(&mut data.users, |u| u.id, key),
            RecordKind::Group => remove_by_id(&mut data.groups, |g| g.id, key),
        };

        if removed {
            tracing::debug!(%kind, key, "record deleted");
            Ok(())
        } else {
            Err(ShelfdeskError::Catalog(format!("{kind} {key} not found")))
        }
    }
}
