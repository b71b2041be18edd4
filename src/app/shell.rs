//! The window's root view.

use crate::navigation::{ContentArea, Controller};

/// Root controller of the main window. It shows no records itself; it owns
/// the content area the list screens are embedded into.
#[derive(Debug, Default)]
pub struct MainShell {
    area: ContentArea,
}

impl MainShell {
    /// The area list screens are shown in. Register a clone of it with the
    /// navigator as the main content area.
    pub const fn area(&self) -> &ContentArea {
        &self.area
    }
}

impl Controller for MainShell {}
