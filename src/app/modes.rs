//! Input and load state types for list screens.
//!
//! # State Machine
//!
//! A list screen is in one of two input modes:
//! - **Normal**: navigation and commands
//! - **Search**: the query is being edited (`Typing`) or the user is moving
//!   through the filtered results with the query still applied (`Navigating`)
//!
//! Independently, [`ScreenStatus`] tracks the last data operation.

/// Where keystrokes go while searching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFocus {
    Typing,
    Navigating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Search(SearchFocus),
}

impl InputMode {
    #[must_use]
    pub const fn is_typing(self) -> bool {
        matches!(self, Self::Search(SearchFocus::Typing))
    }
}

/// Outcome of the most recent load or delete on a screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScreenStatus {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A load is in flight.
    Loading,
    /// The last load succeeded with this many records.
    Loaded { count: usize },
    /// A delete (or other catalog call) is in flight.
    Working(String),
    /// Informational message, e.g. after a delete.
    Notice(String),
    /// The last operation failed. Previously shown data stays visible.
    Failed(String),
}

impl ScreenStatus {
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        matches!(self, Self::Loading | Self::Working(_))
    }
}
