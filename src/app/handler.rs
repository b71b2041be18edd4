//! Event handling and state transition logic.
//!
//! [`handle_event`] is the single entry point for user input. Application
//! events (switching views, quitting) become [`Action`]s directly; everything
//! else is forwarded to the screen embedded in the main content area.
//!
//! # Architecture
//!
//! ```text
//! Input → Event → handle_event → Screen state changes → Actions → App::execute
//!                                                                     ↓
//!                                              AsyncLoader (worker pool)
//!                                                                     ↓
//!                                               App::pump → screen callbacks
//! ```
//!
//! # Example
//!
//! ```rust
//! use shelfdesk::app::{handle_event, Action, App, Event};
//! use shelfdesk::catalog::JsonCatalog;
//! use shelfdesk::navigation::BuiltinStylesheets;
//! use shelfdesk::worker::{AsyncLoader, WorkerPool};
//! use shelfdesk::Config;
//! use std::sync::Arc;
//!
//! let loader = AsyncLoader::new(WorkerPool::new(1)?);
//! let mut app = App::new(&Config::default(), Arc::new(JsonCatalog::sample()?), BuiltinStylesheets::bundled(), loader);
//! let (_, actions) = handle_event(&mut app, &Event::Quit)?;
//! assert_eq!(actions, vec![Action::Quit]);
//! # Ok::<(), shelfdesk::ShelfdeskError>(())
//! ```

use super::actions::Action;
use super::state::App;
use crate::domain::error::Result;

/// Events triggered by user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Moves the selection down one row (wraps to the top of the page).
    SelectNext,
    /// Moves the selection up one row (wraps to the bottom of the page).
    SelectPrevious,
    /// Shows the next page; ignored on the last page.
    NextPage,
    /// Shows the previous page; ignored on the first page.
    PreviousPage,

    /// Starts editing the search query.
    SearchMode,
    /// Appends a character to the query while editing it.
    Char(char),
    /// Removes the last character of the query while editing it.
    Backspace,
    /// Replaces the whole query. An empty query leaves search mode.
    SetQuery(String),
    /// Stops editing but keeps the query applied.
    FocusResults,
    /// Clears the query and leaves search mode.
    ExitSearch,
    /// Searches the next field (All → each field in turn → All).
    CycleField,

    /// Re-fetches the screen's records.
    Refresh,
    /// Deletes the selected record. Requires a librarian session.
    DeleteSelected,

    /// Switches the main area to another view.
    ShowView(String),
    Quit,
}

/// Processes an event and returns whether to redraw plus the actions to run.
///
/// # Parameters
///
/// * `app` - Application whose active screen receives screen events
/// * `event` - Event to process
///
/// # Returns
///
/// `(should_render, actions)`. Screen events arriving while no screen is
/// shown are ignored.
///
/// # Errors
///
/// Returns errors raised by the active screen's event handling.
pub fn handle_event(app: &mut App, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    match event {
        Event::Quit => Ok((false, vec![Action::Quit])),
        Event::ShowView(view_id) => {
            tracing::debug!(view_id = %view_id, "view requested");
            Ok((false, vec![Action::ShowView(view_id.clone())]))
        }
        _ => app
            .with_active_screen(|screen, _| screen.handle_event(event))
            .unwrap_or_else(|| {
                tracing::debug!("no active screen, ignoring event");
                Ok((false, vec![]))
            }),
    }
}
