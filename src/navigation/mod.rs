//! View navigation: the composition root that hosts screens.
//!
//! Screens are registered as views under symbolic ids. The [`Navigator`]
//! resolves an id, asks a [`ControllerFactory`] for the view's controller
//! (so controllers can take injected collaborators), composes global and
//! view-specific stylesheets, and swaps either the whole window scene or the
//! content of a registered [`ContentArea`].
//!
//! # Organization
//!
//! - [`controller`]: [`Controller`] trait, downcasting, factories and bindings
//! - [`view`]: [`ViewDescriptor`] and [`ViewRegistry`]
//! - [`stylesheet`]: [`StylesheetResolver`] and its file, built-in and
//!   layered implementations
//! - [`content`]: [`ContentArea`] embedding points
//! - [`navigator`]: [`Navigator`] itself and its window/scene state
//!
//! # Failure modes
//!
//! - [`ViewNotFound`](crate::ShelfdeskError::ViewNotFound): unknown id
//! - [`ViewLoad`](crate::ShelfdeskError::ViewLoad): the view resolved but
//!   its controller could not be built, initialized or configured
//! - [`ContentAreaNotRegistered`](crate::ShelfdeskError::ContentAreaNotRegistered):
//!   embedding into an area nobody registered for the current scene (a
//!   wiring defect)
//! - [`NoHostScene`](crate::ShelfdeskError::NoHostScene): embedding before
//!   any scene is showing

pub mod content;
pub mod controller;
pub mod navigator;
pub mod stylesheet;
pub mod view;

pub use content::{ContentArea, MountedView};
pub use controller::{AsAny, Controller, ControllerBindings, ControllerFactory, ControllerResult};
pub use navigator::{NavState, Navigator, Scene, Window, WindowOptions, MAIN_AREA};
pub use stylesheet::{BuiltinStylesheets, DirStylesheets, LayeredStylesheets, StylesheetResolver};
pub use view::{ViewDescriptor, ViewEntry, ViewRegistry};
