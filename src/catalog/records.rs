//! Catalog record types shown by the list screens.
//!
//! Records are plain serde structs mirroring the remote service's JSON. Each
//! implements [`CatalogRecord`], which tells a generic list screen how to
//! fetch, search and tabulate it.

use super::service::CatalogService;
use crate::domain::error::Result;
use crate::domain::session::Role;
use crate::list::{ColumnDescriptor, FieldAccessors};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kinds of record the catalog serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Book,
    Exemplar,
    Loan,
    User,
    Group,
}

impl RecordKind {
    /// Every kind, in menu order.
    pub const ALL: [Self; 5] = [Self::Book, Self::Exemplar, Self::Loan, Self::User, Self::Group];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Book => "book",
            Self::Exemplar => "exemplar",
            Self::Loan => "loan",
            Self::User => "user",
            Self::Group => "group",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A record type that can back a generic list screen.
pub trait CatalogRecord: Clone + Send + 'static {
    /// Symbolic id of the view listing this record type.
    const VIEW_ID: &'static str;
    /// Screen title.
    const TITLE: &'static str;
    const KIND: RecordKind;

    /// Identity used for single-record removal.
    fn key(&self) -> i64;

    /// Searchable fields, in "All" evaluation order.
    fn accessors() -> FieldAccessors<Self>;

    /// Table columns, left to right.
    fn columns() -> Vec<ColumnDescriptor<Self>>;

    /// Fetches the full list from the catalog. Runs on a worker thread.
    ///
    /// # Errors
    ///
    /// Returns the service's error unchanged.
    fn fetch(service: &dyn CatalogService) -> Result<Vec<Self>>;
}

/// A title in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    #[serde(default)]
    pub isbn: Option<String>,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
}

impl CatalogRecord for Book {
    const VIEW_ID: &'static str = "books";
    const TITLE: &'static str = "Books";
    const KIND: RecordKind = RecordKind::Book;

    fn key(&self) -> i64 {
        self.id
    }

    fn accessors() -> FieldAccessors<Self> {
        FieldAccessors::new()
            .with("id", "ID", |b: &Self| Some(b.id.to_string()))
            .with("title", "Title", |b: &Self| Some(b.title.clone()))
            .with("author", "Author", |b: &Self| Some(b.author.clone()))
            .with("isbn", "ISBN", |b: &Self| b.isbn.clone())
            .with("publisher", "Publisher", |b: &Self| b.publisher.clone())
            .with("year", "Year", |b: &Self| b.year.map(|y| y.to_string()))
    }

    fn columns() -> Vec<ColumnDescriptor<Self>> {
        vec![
            ColumnDescriptor::new("ID", 5, |b: &Self| b.id.to_string()),
            ColumnDescriptor::new("TITLE", 34, |b: &Self| b.title.clone()),
            ColumnDescriptor::new("AUTHOR", 22, |b: &Self| b.author.clone()),
            ColumnDescriptor::optional("YEAR", 6, |b: &Self| b.year.map(|y| y.to_string())),
            ColumnDescriptor::optional("ISBN", 17, |b: &Self| b.isbn.clone()),
        ]
    }

    fn fetch(service: &dyn CatalogService) -> Result<Vec<Self>> {
        service.books()
    }
}

/// A physical copy of a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exemplar {
    pub id: i64,
    pub book_id: i64,
    #[serde(default)]
    pub shelf: Option<String>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default = "default_available")]
    pub available: bool,
}

const fn default_available() -> bool {
    true
}

impl Exemplar {
    #[must_use]
    pub const fn availability(&self) -> &'static str {
        if self.available {
            "available"
        } else {
            "on loan"
        }
    }
}

impl CatalogRecord for Exemplar {
    const VIEW_ID: &'static str = "exemplars";
    const TITLE: &'static str = "Copies";
    const KIND: RecordKind = RecordKind::Exemplar;

    fn key(&self) -> i64 {
        self.id
    }

    fn accessors() -> FieldAccessors<Self> {
        FieldAccessors::new()
            .with("id", "ID", |e: &Self| Some(e.id.to_string()))
            .with("book", "Book ID", |e: &Self| Some(e.book_id.to_string()))
            .with("shelf", "Shelf", |e: &Self| e.shelf.clone())
            .with("condition", "Condition", |e: &Self| e.condition.clone())
            .with("status", "Status", |e: &Self| Some(e.availability().to_string()))
    }

    fn columns() -> Vec<ColumnDescriptor<Self>> {
        vec![
            ColumnDescriptor::new("ID", 5, |e: &Self| e.id.to_string()),
            ColumnDescriptor::new("BOOK", 6, |e: &Self| e.book_id.to_string()),
            ColumnDescriptor::optional("SHELF", 10, |e: &Self| e.shelf.clone()),
            ColumnDescriptor::optional("CONDITION", 12, |e: &Self| e.condition.clone()),
            ColumnDescriptor::new("STATUS", 10, |e: &Self| e.availability().to_string()),
        ]
    }

    fn fetch(service: &dyn CatalogService) -> Result<Vec<Self>> {
        service.exemplars()
    }
}

/// A copy lent to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub id: i64,
    pub exemplar_id: i64,
    pub user_id: i64,
    pub borrowed_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    #[serde(default)]
    pub returned_at: Option<DateTime<Utc>>,
}

impl Loan {
    #[must_use]
    pub const fn is_returned(&self) -> bool {
        self.returned_at.is_some()
    }

    /// Whether the loan is still open past its due date at `now`.
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.is_returned() && self.due_at < now
    }

    #[must_use]
    pub fn status(&self, now: DateTime<Utc>) -> &'static str {
        if self.is_returned() {
            "returned"
        } else if self.is_overdue(now) {
            "overdue"
        } else {
            "open"
        }
    }
}

fn short_date(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

impl CatalogRecord for Loan {
    const VIEW_ID: &'static str = "loans";
    const TITLE: &'static str = "Loans";
    const KIND: RecordKind = RecordKind::Loan;

    fn key(&self) -> i64 {
        self.id
    }

    fn accessors() -> FieldAccessors<Self> {
        FieldAccessors::new()
            .with("id", "ID", |l: &Self| Some(l.id.to_string()))
            .with("exemplar", "Copy ID", |l: &Self| Some(l.exemplar_id.to_string()))
            .with("user", "User ID", |l: &Self| Some(l.user_id.to_string()))
            .with("due", "Due", |l: &Self| Some(short_date(&l.due_at)))
            .with("status", "Status", |l: &Self| Some(l.status(Utc::now()).to_string()))
    }

    fn columns() -> Vec<ColumnDescriptor<Self>> {
        vec![
            ColumnDescriptor::new("ID", 5, |l: &Self| l.id.to_string()),
            ColumnDescriptor::new("COPY", 6, |l: &Self| l.exemplar_id.to_string()),
            ColumnDescriptor::new("USER", 6, |l: &Self| l.user_id.to_string()),
            ColumnDescriptor::new("BORROWED", 12, |l: &Self| short_date(&l.borrowed_at)),
            ColumnDescriptor::new("DUE", 12, |l: &Self| short_date(&l.due_at)),
            ColumnDescriptor::optional("RETURNED", 12, |l: &Self| l.returned_at.as_ref().map(short_date)),
            ColumnDescriptor::new("STATUS", 9, |l: &Self| l.status(Utc::now()).to_string()),
        ]
    }

    fn fetch(service: &dyn CatalogService) -> Result<Vec<Self>> {
        service.loans()
    }
}

/// A library account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Role,
}

const fn role_name(role: Role) -> &'static str {
    match role {
        Role::Librarian => "librarian",
        Role::Member => "member",
    }
}

impl CatalogRecord for User {
    const VIEW_ID: &'static str = "users";
    const TITLE: &'static str = "Users";
    const KIND: RecordKind = RecordKind::User;

    fn key(&self) -> i64 {
        self.id
    }

    fn accessors() -> FieldAccessors<Self> {
        FieldAccessors::new()
            .with("id", "ID", |u: &Self| Some(u.id.to_string()))
            .with("name", "Name", |u: &Self| Some(u.name.clone()))
            .with("email", "Email", |u: &Self| u.email.clone())
            .with("role", "Role", |u: &Self| Some(role_name(u.role).to_string()))
    }

    fn columns() -> Vec<ColumnDescriptor<Self>> {
        vec![
            ColumnDescriptor::new("ID", 5, |u: &Self| u.id.to_string()),
            ColumnDescriptor::new("NAME", 24, |u: &Self| u.name.clone()),
            ColumnDescriptor::optional("EMAIL", 30, |u: &Self| u.email.clone()),
            ColumnDescriptor::new("ROLE", 10, |u: &Self| role_name(u.role).to_string()),
        ]
    }

    fn fetch(service: &dyn CatalogService) -> Result<Vec<Self>> {
        service.users()
    }
}

/// A reading group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub member_ids: Vec<i64>,
}

impl CatalogRecord for Group {
    const VIEW_ID: &'static str = "groups";
    const TITLE: &'static str = "Reading groups";
    const KIND: RecordKind = RecordKind::Group;

    fn key(&self) -> i64 {
        self.id
    }

    fn accessors() -> FieldAccessors<Self> {
        FieldAccessors::new()
            .with("id", "ID", |g: &Self| Some(g.id.to_string()))
            .with("name", "Name", |g: &Self| Some(g.name.clone()))
            .with("topic", "Topic", |g: &Self| g.topic.clone())
    }

    fn columns() -> Vec<ColumnDescriptor<Self>> {
        vec![
            ColumnDescriptor::new("ID", 5, |g: &Self| g.id.to_string()),
            ColumnDescriptor::new("NAME", 26, |g: &Self| g.name.clone()),
            ColumnDescriptor::optional("TOPIC", 26, |g: &Self| g.topic.clone()),
            ColumnDescriptor::new("MEMBERS", 8, |g: &Self| g.member_ids.len().to_string()),
        ]
    }

    fn fetch(service: &dyn CatalogService) -> Result<Vec<Self>> {
        service.groups()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::{matches, SearchCriteria, FieldSelector};
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()
    }

    fn loan(returned: Option<DateTime<Utc>>) -> Loan {
        Loan {
            id: 1,
            exemplar_id: 2,
            user_id: 3,
            borrowed_at: at(1),
            due_at: at(15),
            returned_at: returned,
        }
    }

    #[test]
    fn loan_status_follows_due_and_return_dates() {
        assert_eq!(loan(None).status(at(10)), "open");
        assert!(loan(None).is_overdue(at(20)));
        assert_eq!(loan(None).status(at(20)), "overdue");
        assert!(!loan(Some(at(14))).is_overdue(at(20)));
        assert_eq!(loan(Some(at(14))).status(at(20)), "returned");
    }

    #[test]
    fn book_search_treats_missing_fields_as_non_matching() {
        let book = Book {
            id: 123,
            isbn: None,
            title: "Dune".into(),
            author: "Frank Herbert".into(),
            publisher: None,
            year: Some(1965),
        };
        let accessors = Book::accessors();

        assert!(matches(&book, &SearchCriteria::new(FieldSelector::field("isbn"), ""), &accessors));
        assert!(!matches(&book, &SearchCriteria::new(FieldSelector::field("isbn"), "9"), &accessors));
        assert!(matches(&book, &SearchCriteria::new(FieldSelector::field("id"), "12"), &accessors));
        assert!(matches(&book, &SearchCriteria::all("HERBERT"), &accessors));
    }

    #[test]
    fn records_deserialize_with_optional_fields_omitted() {
        let exemplar: Exemplar = serde_json::from_str(r#"{"id": 4, "book_id": 9}"#).unwrap();
        assert!(exemplar.available);
        assert_eq!(exemplar.availability(), "available");

        let user: User = serde_json::from_str(r#"{"id": 1, "name": "Ada", "role": "librarian"}"#).unwrap();
        assert_eq!(user.role, Role::Librarian);

        let group: Group = serde_json::from_str(r#"{"id": 1, "name": "Sci-fi"}"#).unwrap();
        assert!(group.member_ids.is_empty());
    }

    #[test]
    fn columns_render_missing_values_as_placeholder() {
        let book = Book {
            id: 7,
            isbn: None,
            title: "Emma".into(),
            author: "Jane Austen".into(),
            publisher: None,
            year: None,
        };
        let cells: Vec<String> = Book::columns().iter().map(|c| c.cell(&book)).collect();
        assert_eq!(cells, ["7", "Emma", "Jane Austen", "-", "-"]);
    }
}
