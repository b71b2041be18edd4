//! Embedding points for views inside a hosting scene.

use super::controller::Controller;
use std::cell::{RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

/// A view that has been constructed and placed somewhere: either as a
/// window's scene root or inside a [`ContentArea`].
pub struct MountedView {
    view_id: String,
    controller: Box<dyn Controller>,
}

impl MountedView {
    pub(crate) fn new(view_id: impl Into<String>, controller: Box<dyn Controller>) -> Self {
        Self {
            view_id: view_id.into(),
            controller,
        }
    }

    pub fn view_id(&self) -> &str {
        &self.view_id
    }

    pub fn controller(&self) -> &dyn Controller {
        self.controller.as_ref()
    }

    pub fn controller_mut(&mut self) -> &mut dyn Controller {
        self.controller.as_mut()
    }
}

impl fmt::Debug for MountedView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MountedView")
            .field("view_id", &self.view_id)
            .finish_non_exhaustive()
    }
}

/// A container a host view exposes for embedded views.
///
/// The handle is cheap to clone; clones refer to the same slot. The host
/// controller keeps one handle and registers a clone with the navigator,
/// which replaces the slot's content on `show_main_view`/`show_named_view`.
/// Handles are UI-thread only.
///
/// Borrowing is dynamic: do not navigate into an area while holding a
/// borrow obtained from [`controller_mut`](Self::controller_mut) on it.
#[derive(Clone, Default)]
pub struct ContentArea {
    slot: Rc<RefCell<Option<MountedView>>>,
}

impl ContentArea {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.borrow().is_none()
    }

    /// Id of the view currently shown in this area.
    pub fn view_id(&self) -> Option<String> {
        self.slot.borrow().as_ref().map(|view| view.view_id.clone())
    }

    /// Mutable access to the embedded controller if it is a `C`.
    pub fn controller_mut<C: Controller>(&self) -> Option<RefMut<'_, C>> {
        RefMut::filter_map(self.slot.borrow_mut(), |slot| {
            slot.as_mut()
                .and_then(|view| view.controller.as_mut().downcast_mut::<C>())
        })
        .ok()
    }

    /// Runs `f` with the embedded view's id and controller, whatever its type.
    pub fn with_view<R>(&self, f: impl FnOnce(&str, &mut dyn Controller) -> R) -> Option<R> {
        let mut slot = self.slot.borrow_mut();
        let view = slot.as_mut()?;
        Some(f(&view.view_id, view.controller.as_mut()))
    }

    /// Whether two handles refer to the same area.
    pub fn same_area(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.slot, &other.slot)
    }

    /// Replaces the area's content, returning the view it displaced.
    pub(crate) fn mount(&self, view: MountedView) -> Option<MountedView> {
        self.slot.borrow_mut().replace(view)
    }
}

impl fmt::Debug for ContentArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentArea")
            .field("view_id", &self.view_id())
            .finish()
    }
}
