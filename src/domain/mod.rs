//! Domain layer for the Shelfdesk client core.
//!
//! Holds the types shared by every other layer and independent of any
//! rendering or threading concern.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`session`]: The logged-in session context injected into screens
//!
//! # Examples
//!
//! ```
//! use shelfdesk::domain::{Role, SessionContext};
//!
//! let session = SessionContext::new(1, "ada", Role::Librarian);
//! assert!(session.role.can_manage());
//! ```

pub mod error;
pub mod session;

pub use error::{BoxError, LoadError, Result, ShelfdeskError};
pub use session::{Role, SessionContext};
