//! Screen controllers and the factories that build them.
//!
//! Every navigable view has one controller type. The navigator never calls a
//! constructor directly: it asks a [`ControllerFactory`] for an instance of
//! the view's controller type, so screens can take their collaborators
//! (services, session context) as constructor arguments. When no factory
//! knows the type, the view's registered default constructor is used.

use crate::domain::BoxError;
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;

/// Upcast to [`Any`] for controller downcasting.
///
/// Implemented for every `'static` type; never implement it by hand.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// The controller behind a navigable view.
///
/// # Example
///
/// ```
/// use shelfdesk::navigation::Controller;
///
/// #[derive(Default)]
/// struct About {
///     ready: bool,
/// }
///
/// impl Controller for About {
///     fn initialize(&mut self) -> Result<(), shelfdesk::BoxError> {
///         self.ready = true;
///         Ok(())
///     }
/// }
/// ```
pub trait Controller: AsAny + 'static {
    /// Runs once after construction, before the view is configured or shown.
    ///
    /// An error aborts the navigation and is reported as a view load error;
    /// the previously displayed view stays in place.
    ///
    /// # Errors
    ///
    /// Implementations return any error that makes the view unusable.
    fn initialize(&mut self) -> Result<(), BoxError> {
        Ok(())
    }
}

impl dyn Controller {
    /// Whether the concrete controller type is `C`.
    pub fn is<C: Controller>(&self) -> bool {
        self.as_any().is::<C>()
    }

    pub fn downcast_ref<C: Controller>(&self) -> Option<&C> {
        self.as_any().downcast_ref::<C>()
    }

    pub fn downcast_mut<C: Controller>(&mut self) -> Option<&mut C> {
        self.as_any_mut().downcast_mut::<C>()
    }

    /// [`TypeId`] of the concrete controller type.
    pub fn controller_type(&self) -> TypeId {
        self.as_any().type_id()
    }
}

/// Result of constructing a controller.
pub type ControllerResult = Result<Box<dyn Controller>, BoxError>;

/// Produces controller instances on behalf of the navigator.
pub trait ControllerFactory {
    /// Builds a controller of type `controller`.
    ///
    /// Returns `None` when this factory has no binding for the type, in which
    /// case the navigator falls back to the view's default constructor.
    /// `Some(Err(_))` means the binding exists but construction failed.
    fn create(&self, controller: TypeId) -> Option<ControllerResult>;
}

impl<F> ControllerFactory for F
where
    F: Fn(TypeId) -> Option<ControllerResult>,
{
    fn create(&self, controller: TypeId) -> Option<ControllerResult> {
        self(controller)
    }
}

type Binding = Box<dyn Fn() -> ControllerResult>;

/// A [`ControllerFactory`] built from per-type constructor closures.
///
/// # Example
///
/// ```
/// use shelfdesk::navigation::{Controller, ControllerBindings, ControllerFactory};
/// use std::any::TypeId;
///
/// struct Greeting {
///     name: String,
/// }
///
/// impl Controller for Greeting {}
///
/// let user = String::from("ada");
/// let bindings = ControllerBindings::new()
///     .bind(move || Ok(Greeting { name: user.clone() }));
///
/// let controller = bindings.create(TypeId::of::<Greeting>()).unwrap().unwrap();
/// assert_eq!(controller.downcast_ref::<Greeting>().unwrap().name, "ada");
/// ```
#[derive(Default)]
pub struct ControllerBindings {
    bindings: HashMap<TypeId, (&'static str, Binding)>,
}

impl ControllerBindings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a constructor for controller type `C`, replacing any previous
    /// binding for that type.
    #[must_use]
    pub fn bind<C, F>(mut self, construct: F) -> Self
    where
        C: Controller,
        F: Fn() -> Result<C, BoxError> + 'static,
    {
        self.insert(construct);
        self
    }

    /// In-place form of [`bind`](Self::bind).
    pub fn insert<C, F>(&mut self, construct: F)
    where
        C: Controller,
        F: Fn() -> Result<C, BoxError> + 'static,
    {
        let binding: Binding =
            Box::new(move || construct().map(|controller| Box::new(controller) as Box<dyn Controller>));
        self.bindings
            .insert(TypeId::of::<C>(), (type_name::<C>(), binding));
    }

    pub fn contains<C: Controller>(&self) -> bool {
        self.bindings.contains_key(&TypeId::of::<C>())
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl ControllerFactory for ControllerBindings {
    fn create(&self, controller: TypeId) -> Option<ControllerResult> {
        let (name, binding) = self.bindings.get(&controller)?;
        tracing::debug!(controller = name, "constructing controller from binding");
        Some(binding())
    }
}

impl fmt::Debug for ControllerBindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.bindings.values().map(|(name, _)| name))
            .finish()
    }
}
