//! Search criteria and record field accessors.
//!
//! A screen describes how to read the searchable fields of its record type
//! with a [`FieldAccessors`] table, and the user's current search is a
//! [`SearchCriteria`] value: a field selector plus a free-text query.

use std::fmt;

/// Identifies which field accessor a query is applied to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldSelector {
    /// Match if any known accessor matches (logical OR).
    #[default]
    All,
    /// Match only against the accessor registered under this key.
    Field(String),
}

impl FieldSelector {
    /// Shorthand for [`FieldSelector::Field`].
    pub fn field(key: impl Into<String>) -> Self {
        Self::Field(key.into())
    }
}

/// The user's current search: which field(s) to look at and what to look for.
///
/// The query is matched case-insensitively as a substring; an empty query
/// matches every record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchCriteria {
    pub field: FieldSelector,
    pub query: String,
}

impl SearchCriteria {
    #[must_use]
    pub fn new(field: FieldSelector, query: impl Into<String>) -> Self {
        Self {
            field,
            query: query.into(),
        }
    }

    /// Criteria that search every field for `query`.
    #[must_use]
    pub fn all(query: impl Into<String>) -> Self {
        Self::new(FieldSelector::All, query)
    }

    /// Whether the query is empty (and therefore matches everything).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
    }
}

type Accessor<T> = Box<dyn Fn(&T) -> Option<String>>;

struct FieldAccessor<T> {
    key: String,
    label: String,
    read: Accessor<T>,
}

/// Ordered table of named field readers for a record type.
///
/// Order matters twice: it is the evaluation order for [`FieldSelector::All`]
/// (evaluation short-circuits on the first hit) and the cycling order offered
/// to the user when switching the searched field.
///
/// # Example
///
/// ```
/// use shelfdesk::list::FieldAccessors;
///
/// struct Book { title: String, isbn: Option<String> }
///
/// let accessors = FieldAccessors::new()
///     .with("title", "Title", |b: &Book| Some(b.title.clone()))
///     .with("isbn", "ISBN", |b: &Book| b.isbn.clone());
/// assert_eq!(accessors.keys().collect::<Vec<_>>(), vec!["title", "isbn"]);
/// ```
pub struct FieldAccessors<T> {
    fields: Vec<FieldAccessor<T>>,
}

impl<T> FieldAccessors<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Adds an accessor. Registering an existing key replaces its reader.
    #[must_use]
    pub fn with<F>(mut self, key: impl Into<String>, label: impl Into<String>, read: F) -> Self
    where
        F: Fn(&T) -> Option<String> + 'static,
    {
        let key = key.into();
        let accessor = FieldAccessor {
            key: key.clone(),
            label: label.into(),
            read: Box::new(read),
        };
        if let Some(slot) = self.fields.iter_mut().find(|f| f.key == key) {
            *slot = accessor;
        } else {
            self.fields.push(accessor);
        }
        self
    }

    /// Reads the field registered under `key`, if the key is known.
    ///
    /// Returns `None` both for unknown keys and for null field values.
    pub fn read(&self, key: &str, record: &T) -> Option<String> {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .and_then(|f| (f.read)(record))
    }

    /// Whether an accessor is registered under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.fields.iter().any(|f| f.key == key)
    }

    /// Registered keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.key.as_str())
    }

    /// Human-readable label for a key.
    pub fn label(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.label.as_str())
    }

    /// Iterates every field value of `record`, in registration order.
    pub(crate) fn values<'a>(&'a self, record: &'a T) -> impl Iterator<Item = Option<String>> + 'a {
        self.fields.iter().map(move |f| (f.read)(record))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the selector following `current` in the cycle
    /// `All → first key → … → last key → All`.
    #[must_use]
    pub fn next_selector(&self, current: &FieldSelector) -> FieldSelector {
        let next_index = match current {
            FieldSelector::All => 0,
            FieldSelector::Field(key) => match self.fields.iter().position(|f| &f.key == key) {
                Some(i) => i + 1,
                None => 0,
            },
        };
        self.fields
            .get(next_index)
            .map_or(FieldSelector::All, |f| FieldSelector::Field(f.key.clone()))
    }

    /// Display label for a selector (`"All fields"` for [`FieldSelector::All`]).
    #[must_use]
    pub fn selector_label(&self, selector: &FieldSelector) -> String {
        match selector {
            FieldSelector::All => "All fields".to_string(),
            FieldSelector::Field(key) => self.label(key).unwrap_or(key.as_str()).to_string(),
        }
    }
}

impl<T> Default for FieldAccessors<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for FieldAccessors<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.keys()).finish()
    }
}
