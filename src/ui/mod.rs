//! Terminal user interface rendering.
//!
//! # Organization
//!
//! - [`viewmodel`]: data snapshots the renderer reads
//! - [`renderer`]: frame entry points
//! - [`theme`]: colors, stylesheet overlays and ANSI sequences
//! - [`helpers`]: cursor, fitting and highlight utilities
//! - `components`: one renderer per screen section

mod components;
pub mod helpers;
pub mod renderer;
pub mod theme;
pub mod viewmodel;

pub use renderer::{render, render_viewmodel};
pub use theme::{Theme, ThemeOverlay};
pub use viewmodel::ViewModel;
