//! Actions representing side effects requested by the event handler.
//!
//! Screens never hold the navigator, the loader or the catalog service. They
//! describe what should happen next as an [`Action`], and
//! [`App::execute`](crate::app::App::execute) carries it out.
//!
//! # Example
//!
//! ```rust
//! use shelfdesk::app::Action;
//!
//! let actions = vec![Action::ShowView("loans".to_string()), Action::Reload];
//! assert_eq!(actions.len(), 2);
//! ```

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Embeds the view with this id in the main content area and loads it.
    ShowView(String),

    /// Re-fetches the active screen's records from the catalog.
    Reload,

    /// Deletes a record of the active screen's type from the catalog.
    Delete {
        key: i64,
    },

    /// Leaves the client.
    Quit,
}
