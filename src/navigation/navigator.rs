//! The navigator: resolves views, builds their controllers, composes
//! stylesheets, and swaps what the window shows.
//!
//! # States
//!
//! ```text
//!             go_to                         show_main_view / show_named_view
//! Unloaded ─────────▶ Standalone ──────────────────────────────▶ Embedded
//!     ▲                   ▲ │                                      │
//!     │                   │ └───────────── go_to ◀─────────────────┘
//!   (new)                 └────────────── go_to
//! ```
//!
//! Every navigation is all-or-nothing. The view is resolved, its controller
//! constructed, initialized and configured, and its stylesheets composed
//! before anything visible changes; any failure along the way leaves the
//! current scene and content areas exactly as they were.

use super::content::{ContentArea, MountedView};
use super::controller::{Controller, ControllerFactory};
use super::stylesheet::StylesheetResolver;
use super::view::ViewRegistry;
use crate::domain::{Result, ShelfdeskError};
use std::any::type_name;
use std::cell::RefMut;
use std::collections::HashMap;
use std::fmt;

/// Name reported for the main content area in usage errors.
pub const MAIN_AREA: &str = "main";

/// Window parameters applied by [`Navigator::go_to`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowOptions {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub maximized: bool,
}

impl WindowOptions {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[must_use]
    pub const fn maximized(mut self, maximized: bool) -> Self {
        self.maximized = maximized;
        self
    }
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            width: 1024,
            height: 768,
            maximized: false,
        }
    }
}

/// A window's content: the root view plus its composed stylesheet URLs.
#[derive(Debug)]
pub struct Scene {
    root: MountedView,
    stylesheets: Vec<String>,
}

impl Scene {
    pub const fn root(&self) -> &MountedView {
        &self.root
    }

    /// Composed stylesheet URLs, in application order, without duplicates.
    pub fn stylesheets(&self) -> &[String] {
        &self.stylesheets
    }
}

/// The single application window.
#[derive(Debug, Default)]
pub struct Window {
    options: WindowOptions,
    visible: bool,
    scene: Option<Scene>,
}

impl Window {
    pub fn title(&self) -> &str {
        &self.options.title
    }

    pub const fn options(&self) -> &WindowOptions {
        &self.options
    }

    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    pub const fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }
}

/// Which kind of content is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    /// No scene has been shown yet.
    Unloaded,
    /// The window shows a single view as its scene.
    Standalone,
    /// A content area inside the standalone scene shows an embedded view.
    Embedded,
}

/// Composition root for screens.
///
/// # Example
///
/// ```
/// use shelfdesk::navigation::{
///     Controller, NavState, Navigator, ViewDescriptor, ViewRegistry, WindowOptions,
/// };
///
/// #[derive(Default)]
/// struct Home;
/// impl Controller for Home {}
///
/// let mut registry = ViewRegistry::new();
/// registry.register::<Home>(ViewDescriptor::new("home"));
///
/// let mut navigator = Navigator::new(registry, |_: &str| None::<String>);
/// navigator.go_to("home", WindowOptions::new("Library")).unwrap();
///
/// assert_eq!(navigator.state(), NavState::Standalone);
/// assert_eq!(navigator.window().title(), "Library");
/// assert!(navigator.go_to("unknown-view", WindowOptions::default()).is_err());
/// ```
pub struct Navigator {
    registry: ViewRegistry,
    factory: Option<Box<dyn ControllerFactory>>,
    resolver: Box<dyn StylesheetResolver>,
    global_styles: Vec<String>,
    view_styles: HashMap<String, Vec<String>>,
    window: Window,
    main_area: Option<ContentArea>,
    areas: HashMap<String, ContentArea>,
    embedded: bool,
}

impl Navigator {
    /// Creates a navigator with no controller factory.
    ///
    /// Until [`set_factory`](Self::set_factory) is called every view is built
    /// with its registered default constructor.
    pub fn new(registry: ViewRegistry, resolver: impl StylesheetResolver + 'static) -> Self {
        Self {
            registry,
            factory: None,
            resolver: Box::new(resolver),
            global_styles: Vec::new(),
            view_styles: HashMap::new(),
            window: Window::default(),
            main_area: None,
            areas: HashMap::new(),
            embedded: false,
        }
    }

    #[must_use]
    pub fn with_factory(mut self, factory: impl ControllerFactory + 'static) -> Self {
        self.set_factory(factory);
        self
    }

    pub fn set_factory(&mut self, factory: impl ControllerFactory + 'static) {
        self.factory = Some(Box::new(factory));
    }

    /// Adds a stylesheet applied to every standalone scene. Duplicate
    /// references are ignored.
    pub fn register_global_style(&mut self, reference: impl Into<String>) {
        push_unique(&mut self.global_styles, reference.into());
    }

    /// Adds a stylesheet for one view on top of its descriptor's references.
    /// Duplicate references are ignored.
    pub fn register_view_style(&mut self, view_id: impl Into<String>, reference: impl Into<String>) {
        push_unique(
            self.view_styles.entry(view_id.into()).or_default(),
            reference.into(),
        );
    }

    /// Binds the main embedding point. Re-registering replaces the binding.
    ///
    /// Content areas belong to the scene that hosts them, so every
    /// [`go_to`](Self::go_to) drops the registrations.
    pub fn register_main_content_area(&mut self, area: ContentArea) {
        tracing::debug!("main content area registered");
        self.main_area = Some(area);
    }

    /// Binds a named embedding point. Re-registering a name replaces it.
    pub fn register_content_area(&mut self, name: impl Into<String>, area: ContentArea) {
        let name = name.into();
        tracing::debug!(area = %name, "content area registered");
        self.areas.insert(name, area);
    }

    /// Shows `view_id` as the window's scene.
    ///
    /// # Errors
    ///
    /// - [`ShelfdeskError::ViewNotFound`] if the id is not registered
    /// - [`ShelfdeskError::ViewLoad`] if the controller cannot be built or
    ///   fails to initialize
    ///
    /// On error the current scene is left untouched.
    pub fn go_to(&mut self, view_id: &str, options: WindowOptions) -> Result<()> {
        self.navigate(view_id, options, |_| Ok(()))
    }

    /// Like [`go_to`](Self::go_to), additionally running `configure` on the
    /// new controller after construction and before the view becomes visible.
    ///
    /// Returns whatever `configure` returns.
    ///
    /// # Errors
    ///
    /// As for [`go_to`](Self::go_to). A view whose controller is not a `C` is
    /// reported as [`ShelfdeskError::ViewLoad`] before anything is built.
    pub fn go_to_with<C, R>(
        &mut self,
        view_id: &str,
        options: WindowOptions,
        configure: impl FnOnce(&mut C) -> R,
    ) -> Result<R>
    where
        C: Controller,
    {
        self.check_controller_type::<C>(view_id)?;
        self.navigate(view_id, options, |controller| configure_as(view_id, controller, configure))
    }

    /// Shows `view_id` inside the main content area.
    ///
    /// # Errors
    ///
    /// - [`ShelfdeskError::ContentAreaNotRegistered`] if no main area was
    ///   registered since the last [`go_to`](Self::go_to); this is checked
    ///   before anything else
    /// - [`ShelfdeskError::NoHostScene`] if no scene is showing
    /// - [`ShelfdeskError::ViewNotFound`] / [`ShelfdeskError::ViewLoad`] as
    ///   for [`go_to`](Self::go_to)
    pub fn show_main_view(&mut self, view_id: &str) -> Result<()> {
        let area = self.main_area_or_err()?;
        self.embed(&area, MAIN_AREA, view_id, |_| Ok(()))
    }

    /// [`show_main_view`](Self::show_main_view) with typed configuration.
    ///
    /// # Errors
    ///
    /// As for [`show_main_view`](Self::show_main_view), plus a
    /// [`ShelfdeskError::ViewLoad`] controller type mismatch.
    pub fn show_main_view_with<C, R>(
        &mut self,
        view_id: &str,
        configure: impl FnOnce(&mut C) -> R,
    ) -> Result<R>
    where
        C: Controller,
    {
        let area = self.main_area_or_err()?;
        self.check_controller_type::<C>(view_id)?;
        self.embed(&area, MAIN_AREA, view_id, |controller| {
            configure_as(view_id, controller, configure)
        })
    }

    /// Shows `view_id` inside the content area registered as `area_name`.
    ///
    /// # Errors
    ///
    /// As for [`show_main_view`](Self::show_main_view), for the named area.
    pub fn show_named_view(&mut self, area_name: &str, view_id: &str) -> Result<()> {
        let area = self.named_area_or_err(area_name)?;
        self.embed(&area, area_name, view_id, |_| Ok(()))
    }

    /// [`show_named_view`](Self::show_named_view) with typed configuration.
    ///
    /// # Errors
    ///
    /// As for [`show_named_view`](Self::show_named_view), plus a
    /// [`ShelfdeskError::ViewLoad`] controller type mismatch.
    pub fn show_named_view_with<C, R>(
        &mut self,
        area_name: &str,
        view_id: &str,
        configure: impl FnOnce(&mut C) -> R,
    ) -> Result<R>
    where
        C: Controller,
    {
        let area = self.named_area_or_err(area_name)?;
        self.check_controller_type::<C>(view_id)?;
        self.embed(&area, area_name, view_id, |controller| {
            configure_as(view_id, controller, configure)
        })
    }

    pub fn state(&self) -> NavState {
        match (&self.window.scene, self.embedded) {
            (None, _) => NavState::Unloaded,
            (Some(_), false) => NavState::Standalone,
            (Some(_), true) => NavState::Embedded,
        }
    }

    pub const fn window(&self) -> &Window {
        &self.window
    }

    pub const fn scene(&self) -> Option<&Scene> {
        self.window.scene.as_ref()
    }

    /// Id of the scene's root view.
    pub fn active_view_id(&self) -> Option<&str> {
        self.scene().map(|scene| scene.root.view_id())
    }

    pub const fn registry(&self) -> &ViewRegistry {
        &self.registry
    }

    pub fn resolver(&self) -> &dyn StylesheetResolver {
        self.resolver.as_ref()
    }

    pub fn global_styles(&self) -> &[String] {
        &self.global_styles
    }

    /// The scene root's controller if it is a `C`.
    pub fn active_controller<C: Controller>(&self) -> Option<&C> {
        self.window
            .scene
            .as_ref()
            .and_then(|scene| scene.root.controller().downcast_ref::<C>())
    }

    pub fn active_controller_mut<C: Controller>(&mut self) -> Option<&mut C> {
        self.window
            .scene
            .as_mut()
            .and_then(|scene| scene.root.controller_mut().downcast_mut::<C>())
    }

    pub const fn main_area(&self) -> Option<&ContentArea> {
        self.main_area.as_ref()
    }

    pub fn content_area(&self, name: &str) -> Option<&ContentArea> {
        self.areas.get(name)
    }

    /// The main area's embedded controller if it is a `C`.
    pub fn main_controller<C: Controller>(&self) -> Option<RefMut<'_, C>> {
        self.main_area.as_ref()?.controller_mut::<C>()
    }

    /// A named area's embedded controller if it is a `C`.
    pub fn area_controller<C: Controller>(&self, name: &str) -> Option<RefMut<'_, C>> {
        self.areas.get(name)?.controller_mut::<C>()
    }

    fn main_area_or_err(&self) -> Result<ContentArea> {
        self.main_area
            .clone()
            .ok_or_else(|| ShelfdeskError::ContentAreaNotRegistered {
                area: MAIN_AREA.to_string(),
            })
    }

    fn named_area_or_err(&self, name: &str) -> Result<ContentArea> {
        self.areas
            .get(name)
            .cloned()
            .ok_or_else(|| ShelfdeskError::ContentAreaNotRegistered {
                area: name.to_string(),
            })
    }

    fn check_controller_type<C: Controller>(&self, view_id: &str) -> Result<()> {
        let entry = self.registry.resolve(view_id).ok_or_else(|| not_found(view_id))?;
        if entry.controller_type() == std::any::TypeId::of::<C>() {
            Ok(())
        } else {
            Err(ShelfdeskError::view_load(
                view_id,
                format!(
                    "view is backed by {}, not {}",
                    entry.controller_name(),
                    type_name::<C>()
                ),
            ))
        }
    }

    /// Resolves, constructs and initializes a view without showing it.
    fn instantiate(&self, view_id: &str) -> Result<MountedView> {
        let entry = self.registry.resolve(view_id).ok_or_else(|| not_found(view_id))?;

        let from_factory = self
            .factory
            .as_ref()
            .and_then(|factory| factory.create(entry.controller_type()));

        let mut controller = match from_factory {
            Some(built) => built.map_err(|source| ShelfdeskError::view_load(view_id, source))?,
            None => match entry.default_constructor() {
                Some(construct) => {
                    tracing::debug!(view_id, "no controller binding, using default constructor");
                    construct()
                }
                None => {
                    return Err(ShelfdeskError::view_load(
                        view_id,
                        format!(
                            "no controller binding for {} and no default constructor",
                            entry.controller_name()
                        ),
                    ))
                }
            },
        };

        if controller.controller_type() != entry.controller_type() {
            return Err(ShelfdeskError::view_load(
                view_id,
                format!("controller factory did not produce a {}", entry.controller_name()),
            ));
        }

        controller
            .initialize()
            .map_err(|source| ShelfdeskError::view_load(view_id, source))?;

        Ok(MountedView::new(view_id, controller))
    }

    /// Resolved URLs a scene showing `view_id` would carry: global
    /// stylesheets first, then the view's own, without duplicates.
    ///
    /// References that do not resolve are skipped.
    pub fn composed_stylesheets(&self, view_id: &str) -> Vec<String> {
        let mut stylesheets = self.resolve_all(self.global_styles.iter());
        for url in self.view_stylesheet_urls(view_id) {
            push_unique(&mut stylesheets, url);
        }
        stylesheets
    }

    /// Resolved URLs of a view's own stylesheets, descriptor refs first.
    fn view_stylesheet_urls(&self, view_id: &str) -> Vec<String> {
        let descriptor_refs = self
            .registry
            .resolve(view_id)
            .map(|entry| entry.descriptor().stylesheet_refs())
            .unwrap_or_default();
        let extra_refs = self.view_styles.get(view_id).map(Vec::as_slice).unwrap_or_default();
        self.resolve_all(descriptor_refs.iter().chain(extra_refs))
    }

    fn resolve_all<'a>(&self, references: impl Iterator<Item = &'a String>) -> Vec<String> {
        let mut urls = Vec::new();
        for reference in references {
            match self.resolver.resolve(reference) {
                Some(url) => push_unique(&mut urls, url),
                None => tracing::debug!(reference = %reference, "stylesheet not found, skipping"),
            }
        }
        urls
    }

    fn navigate<R>(
        &mut self,
        view_id: &str,
        options: WindowOptions,
        configure: impl FnOnce(&mut dyn Controller) -> Result<R>,
    ) -> Result<R> {
        let span = tracing::debug_span!("go_to", view_id);
        let _guard = span.entered();

        let mut view = self.instantiate(view_id).inspect_err(log_failure)?;
        let output = configure(view.controller_mut()).inspect_err(log_failure)?;

        let stylesheets = self.composed_stylesheets(view_id);
        let previous = self.window.scene.replace(Scene {
            root: view,
            stylesheets,
        });
        self.window.options = options;
        self.window.visible = true;
        self.embedded = false;
        let dropped_areas = self.areas.len() + usize::from(self.main_area.is_some());
        self.main_area = None;
        self.areas.clear();

        tracing::debug!(
            previous = previous.as_ref().map(|scene| scene.root.view_id()),
            dropped_areas,
            title = %self.window.options.title,
            "scene replaced"
        );
        Ok(output)
    }

    fn embed<R>(
        &mut self,
        area: &ContentArea,
        area_name: &str,
        view_id: &str,
        configure: impl FnOnce(&mut dyn Controller) -> Result<R>,
    ) -> Result<R> {
        let span = tracing::debug_span!("show_view", area = area_name, view_id);
        let _guard = span.entered();

        if self.window.scene.is_none() {
            let err = ShelfdeskError::NoHostScene {
                area: area_name.to_string(),
            };
            log_failure(&err);
            return Err(err);
        }

        let mut view = self.instantiate(view_id).inspect_err(log_failure)?;
        let output = configure(view.controller_mut()).inspect_err(log_failure)?;

        let urls = self.view_stylesheet_urls(view_id);
        if let Some(scene) = self.window.scene.as_mut() {
            for url in urls {
                push_unique(&mut scene.stylesheets, url);
            }
        }

        let previous = area.mount(view);
        self.embedded = true;

        tracing::debug!(
            previous = previous.as_ref().map(MountedView::view_id),
            "content area updated"
        );
        Ok(output)
    }
}

impl fmt::Debug for Navigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("registry", &self.registry)
            .field("global_styles", &self.global_styles)
            .field("view_styles", &self.view_styles)
            .field("window", &self.window)
            .field("main_area", &self.main_area)
            .field("areas", &self.areas)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

fn configure_as<C: Controller, R>(
    view_id: &str,
    controller: &mut dyn Controller,
    configure: impl FnOnce(&mut C) -> R,
) -> Result<R> {
    controller
        .downcast_mut::<C>()
        .map(configure)
        .ok_or_else(|| {
            ShelfdeskError::view_load(view_id, format!("controller is not a {}", type_name::<C>()))
        })
}

fn not_found(view_id: &str) -> ShelfdeskError {
    ShelfdeskError::ViewNotFound {
        view_id: view_id.to_string(),
    }
}

fn log_failure(err: &ShelfdeskError) {
    tracing::warn!(error = %err, "navigation failed, keeping current view");
}

fn push_unique(list: &mut Vec<String>, value: String) {
    if !list.contains(&value) {
        list.push(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BoxError;
    use crate::navigation::{ControllerBindings, ViewDescriptor};

    #[derive(Default)]
    struct Shell {
        area: ContentArea,
    }
    impl Controller for Shell {}

    #[derive(Default)]
    struct Page {
        initialized: bool,
        label: String,
    }
    impl Controller for Page {
        fn initialize(&mut self) -> std::result::Result<(), BoxError> {
            self.initialized = true;
            Ok(())
        }
    }

    #[derive(Default)]
    struct Broken;
    impl Controller for Broken {
        fn initialize(&mut self) -> std::result::Result<(), BoxError> {
            Err("template missing".into())
        }
    }

    struct NeedsService {
        service: String,
    }
    impl Controller for NeedsService {}

    fn resolver(reference: &str) -> Option<String> {
        (!reference.starts_with("missing")).then(|| format!("mem:{reference}"))
    }

    fn registry() -> ViewRegistry {
        let mut registry = ViewRegistry::new();
        registry.register::<Shell>(ViewDescriptor::new("shell").with_stylesheet("shell.toml"));
        registry.register::<Page>(
            ViewDescriptor::new("page")
                .with_stylesheet("page.toml")
                .with_stylesheet("missing.toml"),
        );
        registry.register::<Broken>(ViewDescriptor::new("broken"));
        registry.register_injected::<NeedsService>(ViewDescriptor::new("service"));
        registry
    }

    fn navigator() -> Navigator {
        Navigator::new(registry(), resolver)
    }

    fn shell_navigator() -> Navigator {
        let mut navigator = navigator();
        let area = navigator
            .go_to_with("shell", WindowOptions::new("Shell"), |shell: &mut Shell| shell.area.clone())
            .unwrap();
        navigator.register_main_content_area(area);
        navigator
    }

    #[test]
    fn starts_unloaded() {
        let navigator = navigator();
        assert_eq!(navigator.state(), NavState::Unloaded);
        assert!(!navigator.window().is_visible());
        assert!(navigator.scene().is_none());
    }

    #[test]
    fn go_to_shows_a_standalone_scene() {
        let mut navigator = navigator();
        navigator
            .go_to("page", WindowOptions::new("Books").size(800, 600).maximized(true))
            .unwrap();

        assert_eq!(navigator.state(), NavState::Standalone);
        assert_eq!(navigator.active_view_id(), Some("page"));
        assert!(navigator.active_controller::<Page>().unwrap().initialized);

        let window = navigator.window();
        assert!(window.is_visible());
        assert_eq!(window.title(), "Books");
        assert_eq!((window.options().width, window.options().height), (800, 600));
        assert!(window.options().maximized);
    }

    #[test]
    fn unknown_view_leaves_scene_untouched() {
        let mut navigator = navigator();
        navigator.go_to("page", WindowOptions::new("Books")).unwrap();

        let err = navigator
            .go_to("unknown-view", WindowOptions::new("Nope"))
            .unwrap_err();
        assert!(matches!(err, ShelfdeskError::ViewNotFound { ref view_id } if view_id == "unknown-view"));
        assert_eq!(navigator.active_view_id(), Some("page"));
        assert_eq!(navigator.window().title(), "Books");
    }

    #[test]
    fn failed_initialization_is_a_view_load_error() {
        let mut navigator = navigator();
        navigator.go_to("page", WindowOptions::new("Books")).unwrap();

        let err = navigator.go_to("broken", WindowOptions::default()).unwrap_err();
        assert!(matches!(err, ShelfdeskError::ViewLoad { .. }));
        assert!(err.to_string().contains("template missing"));
        assert_eq!(navigator.active_view_id(), Some("page"));
    }

    #[test]
    fn configure_runs_after_initialize() {
        let mut navigator = navigator();
        navigator
            .go_to_with("page", WindowOptions::default(), |page: &mut Page| {
                assert!(page.initialized);
                page.label = "configured".to_string();
            })
            .unwrap();
        assert_eq!(navigator.active_controller::<Page>().unwrap().label, "configured");
    }

    #[test]
    fn wrong_configure_type_is_rejected_before_construction() {
        let mut navigator = navigator();
        let err = navigator
            .go_to_with("page", WindowOptions::default(), |_: &mut Shell| ())
            .unwrap_err();
        assert!(matches!(err, ShelfdeskError::ViewLoad { .. }));
        assert_eq!(navigator.state(), NavState::Unloaded);
    }

    #[test]
    fn injected_view_without_binding_fails_to_load() {
        let mut navigator = navigator();
        let err = navigator.go_to("service", WindowOptions::default()).unwrap_err();
        assert!(matches!(err, ShelfdeskError::ViewLoad { .. }));
    }

    #[test]
    fn factory_bindings_supply_dependencies() {
        let mut navigator = navigator().with_factory(
            ControllerBindings::new().bind(|| {
                Ok(NeedsService {
                    service: "catalog".to_string(),
                })
            }),
        );
        navigator.go_to("service", WindowOptions::default()).unwrap();
        assert_eq!(
            navigator.active_controller::<NeedsService>().unwrap().service,
            "catalog"
        );
        // Types without a binding still fall back to Default.
        navigator.go_to("page", WindowOptions::default()).unwrap();
        assert_eq!(navigator.active_view_id(), Some("page"));
    }

    #[test]
    fn failing_factory_is_a_view_load_error() {
        let mut navigator = navigator().with_factory(
            ControllerBindings::new().bind(|| Err::<NeedsService, BoxError>("offline".into())),
        );
        let err = navigator.go_to("service", WindowOptions::default()).unwrap_err();
        assert!(err.to_string().contains("offline"));
        assert_eq!(navigator.state(), NavState::Unloaded);
    }

    #[test]
    fn stylesheets_compose_globals_first_without_duplicates() {
        let mut navigator = navigator();
        navigator.register_global_style("base.toml");
        navigator.register_global_style("base.toml");
        navigator.register_global_style("missing-global.toml");
        navigator.register_view_style("page", "page.toml");
        navigator.register_view_style("page", "extra.toml");

        navigator.go_to("page", WindowOptions::default()).unwrap();
        assert_eq!(navigator.global_styles(), ["base.toml", "missing-global.toml"]);
        assert_eq!(
            navigator.scene().unwrap().stylesheets(),
            ["mem:base.toml", "mem:page.toml", "mem:extra.toml"]
        );
    }

    #[test]
    fn embedding_before_registration_is_a_usage_error() {
        let mut navigator = navigator();
        navigator.go_to("page", WindowOptions::default()).unwrap();

        let err = navigator.show_main_view("page").unwrap_err();
        assert!(matches!(err, ShelfdeskError::ContentAreaNotRegistered { ref area } if area == MAIN_AREA));

        let err = navigator.show_named_view("sidebar", "unknown-view").unwrap_err();
        assert!(matches!(err, ShelfdeskError::ContentAreaNotRegistered { ref area } if area == "sidebar"));
    }

    #[test]
    fn show_main_view_embeds_and_appends_stylesheets() {
        let mut navigator = shell_navigator();
        navigator.register_global_style("base.toml");
        assert_eq!(navigator.scene().unwrap().stylesheets(), ["mem:shell.toml"]);

        let label = navigator
            .show_main_view_with("page", |page: &mut Page| {
                page.label = "embedded".to_string();
                page.label.len()
            })
            .unwrap();
        assert_eq!(label, 8);

        assert_eq!(navigator.state(), NavState::Embedded);
        assert_eq!(navigator.active_view_id(), Some("shell"));
        assert_eq!(navigator.main_controller::<Page>().unwrap().label, "embedded");
        assert_eq!(
            navigator.scene().unwrap().stylesheets(),
            ["mem:shell.toml", "mem:page.toml"]
        );

        navigator.show_main_view("page").unwrap();
        assert_eq!(navigator.scene().unwrap().stylesheets().len(), 2);
    }

    #[test]
    fn failed_embedding_keeps_the_current_content() {
        let mut navigator = shell_navigator();
        navigator.show_main_view("page").unwrap();

        assert!(navigator.show_main_view("broken").is_err());
        assert!(navigator.show_main_view("unknown-view").is_err());
        assert_eq!(navigator.main_area().unwrap().view_id().as_deref(), Some("page"));
    }

    #[test]
    fn named_areas_serve_the_scene_they_were_registered_under() {
        let mut navigator = shell_navigator();
        let sidebar = ContentArea::new();
        navigator.register_content_area("sidebar", sidebar.clone());

        navigator.show_named_view("sidebar", "page").unwrap();
        assert_eq!(navigator.state(), NavState::Embedded);
        assert_eq!(sidebar.view_id().as_deref(), Some("page"));
        assert!(navigator.area_controller::<Page>("sidebar").is_some());
        assert!(navigator.area_controller::<Shell>("sidebar").is_none());
    }

    #[test]
    fn embedding_without_a_scene_changes_nothing() {
        let mut navigator = navigator();
        let area = ContentArea::new();
        navigator.register_main_content_area(area.clone());

        let err = navigator.show_main_view("page").unwrap_err();
        assert!(matches!(err, ShelfdeskError::NoHostScene { ref area } if area == MAIN_AREA));
        assert_eq!(navigator.state(), NavState::Unloaded);
        assert!(area.view_id().is_none());
    }

    #[test]
    fn go_to_drops_the_replaced_scenes_areas() {
        let mut navigator = shell_navigator();
        let old_main = navigator.main_area().unwrap().clone();
        let sidebar = ContentArea::new();
        navigator.register_content_area("sidebar", sidebar.clone());
        navigator.show_main_view("page").unwrap();

        navigator.go_to("shell", WindowOptions::default()).unwrap();
        assert_eq!(navigator.state(), NavState::Standalone);
        assert!(navigator.main_area().is_none());
        assert!(navigator.content_area("sidebar").is_none());

        let err = navigator.show_main_view("page").unwrap_err();
        assert!(matches!(err, ShelfdeskError::ContentAreaNotRegistered { ref area } if area == MAIN_AREA));
        let err = navigator.show_named_view("sidebar", "page").unwrap_err();
        assert!(matches!(err, ShelfdeskError::ContentAreaNotRegistered { ref area } if area == "sidebar"));

        assert_eq!(navigator.state(), NavState::Standalone);
        assert_eq!(navigator.scene().unwrap().stylesheets(), ["mem:shell.toml"]);
        assert_eq!(old_main.view_id().as_deref(), Some("page"));
        assert!(sidebar.view_id().is_none());
    }
}
