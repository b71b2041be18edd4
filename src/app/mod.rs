//! Application layer: the screens of the demo client and their wiring.
//!
//! This layer sits between the binary (input loop, terminal output) and the
//! reusable core (list model, loader, navigator).
//!
//! ```text
//! User Input → Events → Event Handler → Screen Mutations → Actions → App
//!                                                                    ↓
//!                              Screen callbacks ← App::pump ← Worker pool
//! ```
//!
//! # Modules
//!
//! - [`actions`]: side effects requested by screens
//! - [`handler`]: event types and dispatch to the active screen
//! - [`modes`]: input mode and load status of a screen
//! - [`screen`]: the generic [`ListScreen`] controller and the [`Screen`] trait
//! - [`shell`]: the window's root view hosting the main content area
//! - [`state`]: [`App`], the composition root

pub mod actions;
pub mod handler;
pub mod modes;
pub mod screen;
pub mod shell;
pub mod state;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use modes::{InputMode, ScreenStatus, SearchFocus};
pub use screen::{ListScreen, Screen, ScreenContext};
pub use shell::MainShell;
pub use state::{App, MenuEntry, SHELL_VIEW};
