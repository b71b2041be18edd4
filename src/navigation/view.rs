//! View descriptors and the registry that resolves them.

use super::controller::Controller;
use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::fmt;

/// Identity of a navigable view: its symbolic id and the stylesheets it needs.
///
/// Stylesheet references form an ordered set; adding a reference twice keeps
/// the first position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewDescriptor {
    id: String,
    stylesheet_refs: Vec<String>,
}

impl ViewDescriptor {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            stylesheet_refs: Vec::new(),
        }
    }

    /// Appends a stylesheet reference unless it is already listed.
    #[must_use]
    pub fn with_stylesheet(mut self, reference: impl Into<String>) -> Self {
        let reference = reference.into();
        if !self.stylesheet_refs.contains(&reference) {
            self.stylesheet_refs.push(reference);
        }
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn stylesheet_refs(&self) -> &[String] {
        &self.stylesheet_refs
    }
}

pub(crate) type DefaultConstructor = fn() -> Box<dyn Controller>;

fn construct_default<C: Controller + Default>() -> Box<dyn Controller> {
    Box::new(C::default())
}

/// A registered view: its descriptor plus the controller type that backs it.
pub struct ViewEntry {
    descriptor: ViewDescriptor,
    controller_type: TypeId,
    controller_name: &'static str,
    default_constructor: Option<DefaultConstructor>,
}

impl ViewEntry {
    pub const fn descriptor(&self) -> &ViewDescriptor {
        &self.descriptor
    }

    pub const fn controller_type(&self) -> TypeId {
        self.controller_type
    }

    /// Type name of the controller, for diagnostics.
    pub const fn controller_name(&self) -> &'static str {
        self.controller_name
    }

    /// Whether the view can be built without a controller factory.
    pub const fn has_default_constructor(&self) -> bool {
        self.default_constructor.is_some()
    }

    pub(crate) const fn default_constructor(&self) -> Option<DefaultConstructor> {
        self.default_constructor
    }
}

impl fmt::Debug for ViewEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewEntry")
            .field("descriptor", &self.descriptor)
            .field("controller", &self.controller_name)
            .field("default_constructor", &self.default_constructor.is_some())
            .finish()
    }
}

/// Maps symbolic view ids to view definitions.
///
/// # Example
///
/// ```
/// use shelfdesk::navigation::{Controller, ViewDescriptor, ViewRegistry};
///
/// #[derive(Default)]
/// struct Dashboard;
/// impl Controller for Dashboard {}
///
/// let mut registry = ViewRegistry::new();
/// registry.register::<Dashboard>(ViewDescriptor::new("dashboard").with_stylesheet("base.toml"));
///
/// let entry = registry.resolve("dashboard").unwrap();
/// assert_eq!(entry.descriptor().stylesheet_refs(), ["base.toml"]);
/// assert!(registry.resolve("missing").is_none());
/// ```
#[derive(Debug, Default)]
pub struct ViewRegistry {
    views: HashMap<String, ViewEntry>,
}

impl ViewRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a view whose controller can fall back to `C::default()`.
    ///
    /// Descriptors are immutable once registered: returns `false`, leaving the
    /// existing entry in place, if the id is already taken.
    pub fn register<C: Controller + Default>(&mut self, descriptor: ViewDescriptor) -> bool {
        self.insert::<C>(descriptor, Some(construct_default::<C>))
    }

    /// Registers a view whose controller must come from a controller factory.
    ///
    /// Returns `false` if the id is already taken.
    pub fn register_injected<C: Controller>(&mut self, descriptor: ViewDescriptor) -> bool {
        self.insert::<C>(descriptor, None)
    }

    fn insert<C: Controller>(
        &mut self,
        descriptor: ViewDescriptor,
        default_constructor: Option<DefaultConstructor>,
    ) -> bool {
        if self.views.contains_key(descriptor.id()) {
            tracing::warn!(view_id = descriptor.id(), "view already registered, keeping the first");
            return false;
        }
        tracing::debug!(
            view_id = descriptor.id(),
            controller = type_name::<C>(),
            "view registered"
        );
        self.views.insert(
            descriptor.id().to_string(),
            ViewEntry {
                descriptor,
                controller_type: TypeId::of::<C>(),
                controller_name: type_name::<C>(),
                default_constructor,
            },
        );
        true
    }

    pub fn resolve(&self, view_id: &str) -> Option<&ViewEntry> {
        self.views.get(view_id)
    }

    pub fn contains(&self, view_id: &str) -> bool {
        self.views.contains_key(view_id)
    }

    /// Registered view ids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.views.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Plain;
    impl Controller for Plain {}

    struct Injected;
    impl Controller for Injected {}

    #[test]
    fn descriptor_stylesheets_are_an_ordered_set() {
        let descriptor = ViewDescriptor::new("books")
            .with_stylesheet("a.toml")
            .with_stylesheet("b.toml")
            .with_stylesheet("a.toml");
        assert_eq!(descriptor.stylesheet_refs(), ["a.toml", "b.toml"]);
    }

    #[test]
    fn first_registration_wins() {
        let mut registry = ViewRegistry::new();
        assert!(registry.register::<Plain>(ViewDescriptor::new("home").with_stylesheet("x.toml")));
        assert!(!registry.register_injected::<Injected>(ViewDescriptor::new("home")));

        let entry = registry.resolve("home").unwrap();
        assert_eq!(entry.controller_type(), TypeId::of::<Plain>());
        assert_eq!(entry.descriptor().stylesheet_refs(), ["x.toml"]);
    }

    #[test]
    fn injected_views_have_no_default_constructor() {
        let mut registry = ViewRegistry::new();
        registry.register::<Plain>(ViewDescriptor::new("plain"));
        registry.register_injected::<Injected>(ViewDescriptor::new("injected"));

        assert!(registry.resolve("plain").unwrap().has_default_constructor());
        assert!(!registry.resolve("injected").unwrap().has_default_constructor());
        assert_eq!(registry.ids(), vec!["injected", "plain"]);
    }
}
