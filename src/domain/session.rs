//! Logged-in session context.
//!
//! The session is an explicit value handed to screen constructors through the
//! controller bindings, so each screen (and each test) gets the context it was
//! built with instead of consulting process-wide state.

use serde::{Deserialize, Serialize};

/// Role of the logged-in account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Staff account: may browse every screen and delete records.
    Librarian,
    /// Patron account: read-only access to the catalog screens.
    #[default]
    Member,
}

impl Role {
    /// Parses a role name case-insensitively. Unknown names yield `None`.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "librarian" | "admin" | "staff" => Some(Self::Librarian),
            "member" | "reader" | "patron" => Some(Self::Member),
            _ => None,
        }
    }

    /// Whether this role may create or delete records.
    #[must_use]
    pub const fn can_manage(self) -> bool {
        matches!(self, Self::Librarian)
    }
}

/// Identity of the user the client is acting for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub user_id: i64,
    pub user_name: String,
    pub role: Role,
}

impl SessionContext {
    #[must_use]
    pub fn new(user_id: i64, user_name: impl Into<String>, role: Role) -> Self {
        Self {
            user_id,
            user_name: user_name.into(),
            role,
        }
    }

    /// Short "name (role)" label for headers.
    #[must_use]
    pub fn label(&self) -> String {
        let role = match self.role {
            Role::Librarian => "librarian",
            Role::Member => "member",
        };
        format!("{} ({role})", self.user_name)
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new(0, "guest", Role::Member)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parsing_accepts_aliases() {
        assert_eq!(Role::parse("Librarian"), Some(Role::Librarian));
        assert_eq!(Role::parse(" staff "), Some(Role::Librarian));
        assert_eq!(Role::parse("reader"), Some(Role::Member));
        assert_eq!(Role::parse("janitor"), None);
    }

    #[test]
    fn only_librarians_manage() {
        assert!(Role::Librarian.can_manage());
        assert!(!Role::Member.can_manage());
    }

    #[test]
    fn label_includes_role() {
        let session = SessionContext::new(7, "ada", Role::Librarian);
        assert_eq!(session.label(), "ada (librarian)");
    }
}
