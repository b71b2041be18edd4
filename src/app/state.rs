//! The application: composition root of the demo client.
//!
//! [`App`] owns the [`Navigator`] (and through it every mounted screen), the
//! [`AsyncLoader`] whose completions are delivered against that navigator,
//! and the catalog service screens load from. It wires one
//! [`ListScreen`] per record type into the navigator's registry, with the
//! signed-in [`SessionContext`] injected through controller bindings.
//!
//! # Threading
//!
//! `App` lives on the interactive thread. Catalog calls run on the worker
//! pool; their callbacks run inside [`App::pump`] on this thread.
//!
//! # Example
//!
//! ```rust
//! use shelfdesk::app::App;
//! use shelfdesk::catalog::JsonCatalog;
//! use shelfdesk::navigation::BuiltinStylesheets;
//! use shelfdesk::worker::{AsyncLoader, WorkerPool};
//! use shelfdesk::Config;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let config = Config::default();
//! let loader = AsyncLoader::new(WorkerPool::new(1)?);
//! let mut app = App::new(&config, Arc::new(JsonCatalog::sample()?), BuiltinStylesheets::bundled(), loader);
//! app.start("books")?;
//! assert!(app.wait_idle(Duration::from_secs(5)));
//! assert_eq!(app.active_view_id().as_deref(), Some("books"));
//! # Ok::<(), shelfdesk::ShelfdeskError>(())
//! ```

use super::actions::Action;
use super::handler::{handle_event, Event};
use super::screen::{list_screen_caster, ListScreen, Screen, ScreenCaster, ScreenContext};
use super::shell::MainShell;
use crate::catalog::{Book, CatalogRecord, CatalogService, Exemplar, Group, Loan, User};
use crate::domain::error::Result;
use crate::domain::session::SessionContext;
use crate::navigation::{
    ControllerBindings, Navigator, StylesheetResolver, ViewDescriptor, ViewRegistry, WindowOptions,
};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{
    EmptyState, FooterInfo, HeaderInfo, PagerInfo, StatusKind, StatusLine, TabInfo, ViewModel,
};
use crate::worker::AsyncLoader;
use crate::Config;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// View id of the window's root view.
pub const SHELL_VIEW: &str = "shell";

const WINDOW_TITLE: &str = "Shelfdesk";
const GLOBAL_STYLESHEET: &str = "base.toml";
const TABLE_STYLESHEET: &str = "tables.toml";

/// One entry of the view menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntry {
    pub key: char,
    pub view_id: &'static str,
    pub title: &'static str,
}

/// Collects registry entries, bindings and casters for the list screens.
struct Wiring {
    registry: ViewRegistry,
    bindings: ControllerBindings,
    casters: HashMap<TypeId, ScreenCaster>,
    menu: Vec<MenuEntry>,
    page_size: usize,
    session: SessionContext,
}

impl Wiring {
    fn new(page_size: usize, session: SessionContext) -> Self {
        let mut registry = ViewRegistry::new();
        registry.register::<MainShell>(ViewDescriptor::new(SHELL_VIEW));
        Self {
            registry,
            bindings: ControllerBindings::new(),
            casters: HashMap::new(),
            menu: Vec::new(),
            page_size,
            session,
        }
    }

    fn screen<R: CatalogRecord>(mut self, key: char, stylesheets: &[&str]) -> Self {
        let descriptor = stylesheets
            .iter()
            .fold(ViewDescriptor::new(R::VIEW_ID), |d, sheet| d.with_stylesheet(*sheet));
        self.registry.register_injected::<ListScreen<R>>(descriptor);

        let page_size = self.page_size;
        let session = self.session.clone();
        self.bindings
            .insert::<ListScreen<R>, _>(move || Ok(ListScreen::<R>::new(page_size, session.clone())));

        self.casters
            .insert(TypeId::of::<ListScreen<R>>(), list_screen_caster::<R>());
        self.menu.push(MenuEntry {
            key,
            view_id: R::VIEW_ID,
            title: R::TITLE,
        });
        self
    }
}

/// Central state of the client.
pub struct App {
    navigator: Navigator,
    loader: AsyncLoader<Navigator>,
    service: Arc<dyn CatalogService>,
    session: SessionContext,
    casters: HashMap<TypeId, ScreenCaster>,
    menu: Vec<MenuEntry>,
    theme: Theme,
    notice: Option<String>,
    should_quit: bool,
}

impl App {
    /// Wires the navigator and every list screen. Nothing is shown until
    /// [`start`](Self::start).
    pub fn new(
        config: &Config,
        service: Arc<dyn CatalogService>,
        resolver: impl StylesheetResolver + 'static,
        loader: AsyncLoader<Navigator>,
    ) -> Self {
        let session = config.session();
        let wiring = Wiring::new(config.page_size, session.clone())
            .screen::<Book>('1', &[TABLE_STYLESHEET, "books.toml"])
            .screen::<Exemplar>('2', &[TABLE_STYLESHEET])
            .screen::<Loan>('3', &[TABLE_STYLESHEET, "loans.toml"])
            .screen::<User>('4', &[TABLE_STYLESHEET])
            .screen::<Group>('5', &[TABLE_STYLESHEET]);

        let mut navigator = Navigator::new(wiring.registry, resolver).with_factory(wiring.bindings);
        navigator.register_global_style(GLOBAL_STYLESHEET);

        tracing::debug!(
            views = navigator.registry().len(),
            user = %session.label(),
            page_size = config.page_size,
            "application wired"
        );

        Self {
            navigator,
            loader,
            service,
            session,
            casters: wiring.casters,
            menu: wiring.menu,
            theme: Theme::default(),
            notice: None,
            should_quit: false,
        }
    }

    /// Opens the main window and shows `initial_view` inside it.
    ///
    /// # Errors
    ///
    /// Returns the navigation error if the shell or `initial_view` cannot be
    /// shown.
    pub fn start(&mut self, initial_view: &str) -> Result<()> {
        let area = self.navigator.go_to_with::<MainShell, _>(
            SHELL_VIEW,
            WindowOptions::new(WINDOW_TITLE).size(1280, 800),
            |shell| shell.area().clone(),
        )?;
        self.navigator.register_main_content_area(area);
        self.show_view(initial_view)
    }

    /// Embeds `view_id` in the main area, restyles, and starts its load.
    ///
    /// # Errors
    ///
    /// Returns the navigation error; the previous screen then stays shown.
    pub fn show_view(&mut self, view_id: &str) -> Result<()> {
        self.navigator.show_main_view(view_id)?;
        self.notice = None;
        self.refresh_theme(view_id);
        self.execute(Action::Reload)
    }

    fn refresh_theme(&mut self, view_id: &str) {
        let urls = self.navigator.composed_stylesheets(view_id);
        self.theme = Theme::from_stylesheets(self.navigator.resolver(), &urls);
        tracing::debug!(view_id, stylesheets = urls.len(), theme = %self.theme.name, "theme composed");
    }

    /// Handles one event and carries out the resulting actions.
    ///
    /// Returns whether a redraw is needed. A failed action is shown as a
    /// notice rather than returned, so one bad navigation does not end the
    /// session.
    ///
    /// # Errors
    ///
    /// Returns errors from the event handler itself.
    pub fn dispatch(&mut self, event: &Event) -> Result<bool> {
        let (mut should_render, actions) = handle_event(self, event)?;
        for action in actions {
            if let Err(err) = self.execute(action) {
                tracing::warn!(error = %err, "action failed");
                self.notice = Some(err.to_string());
            }
            should_render = true;
        }
        Ok(should_render)
    }

    /// Carries out one action.
    ///
    /// # Errors
    ///
    /// Returns navigation errors from [`Action::ShowView`].
    pub fn execute(&mut self, action: Action) -> Result<()> {
        tracing::debug!(?action, "executing action");
        match action {
            Action::ShowView(view_id) => self.show_view(&view_id)?,
            Action::Reload => {
                self.with_active_screen(|screen, ctx| screen.begin_load(ctx));
            }
            Action::Delete { key } => {
                self.with_active_screen(|screen, ctx| screen.begin_delete(key, ctx));
            }
            Action::Quit => self.should_quit = true,
        }
        Ok(())
    }

    /// Runs `f` on the screen embedded in the main area, if there is one.
    pub fn with_active_screen<T>(
        &mut self,
        f: impl FnOnce(&mut dyn Screen, &mut ScreenContext<'_>) -> T,
    ) -> Option<T> {
        let area = self.navigator.main_area()?.clone();
        let casters = &self.casters;
        let mut ctx = ScreenContext {
            loader: &mut self.loader,
            service: &self.service,
        };
        area.with_view(|_, controller| {
            let cast = casters.get(&controller.controller_type())?;
            cast(controller).map(|screen| f(screen, &mut ctx))
        })
        .flatten()
    }

    /// Delivers completed loads. Returns the number of callbacks run.
    pub fn pump(&mut self) -> usize {
        self.loader.pump(&mut self.navigator)
    }

    /// Waits up to `timeout` for a completion, then delivers what arrived.
    pub fn wait_and_pump(&mut self, timeout: Duration) -> usize {
        self.loader.wait_and_pump(&mut self.navigator, timeout)
    }

    /// Delivers completions until none are pending or `timeout` elapses.
    /// Returns whether the loader went idle.
    pub fn wait_idle(&mut self, timeout: Duration) -> bool {
        self.loader.wait_idle(&mut self.navigator, timeout)
    }

    pub const fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub const fn theme(&self) -> &Theme {
        &self.theme
    }

    pub const fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn menu(&self) -> &[MenuEntry] {
        &self.menu
    }

    /// View bound to a menu key such as `'1'`.
    pub fn view_for_key(&self, key: char) -> Option<&'static str> {
        self.menu.iter().find(|entry| entry.key == key).map(|entry| entry.view_id)
    }

    /// Id of the view embedded in the main area.
    pub fn active_view_id(&self) -> Option<String> {
        self.navigator.main_area().and_then(|area| area.view_id())
    }

    pub fn pending_loads(&self) -> usize {
        self.loader.pending()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub const fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Computes the UI view model for the current frame.
    #[must_use]
    pub fn compute_viewmodel(&self) -> ViewModel {
        let active = self.active_view_id();
        let header = HeaderInfo {
            title: self.navigator.window().title().to_string(),
            tabs: self
                .menu
                .iter()
                .map(|entry| TabInfo {
                    key: entry.key,
                    label: entry.title.to_string(),
                    is_active: active.as_deref() == Some(entry.view_id),
                })
                .collect(),
            session: self.session.label(),
        };

        let pending = self.loader.pending();
        let from_screen = self.navigator.main_area().and_then(|area| {
            area.with_view(|_, controller| {
                let cast = self.casters.get(&controller.controller_type())?;
                cast(controller).map(|screen| screen.viewmodel(header.clone(), pending))
            })
            .flatten()
        });

        let mut vm = from_screen.unwrap_or_else(|| ViewModel {
            header,
            search: None,
            columns: Vec::new(),
            rows: Vec::new(),
            empty_state: Some(EmptyState {
                message: "Nothing to show".to_string(),
                subtitle: "Pick a view with 1-5".to_string(),
            }),
            pager: PagerInfo {
                label: "Page 1 of 1".to_string(),
                can_go_previous: false,
                can_go_next: false,
                matched: 0,
                total: 0,
            },
            status: None,
            footer: FooterInfo {
                keybindings: "1-5 views · q quit".to_string(),
            },
        });

        if let Some(notice) = &self.notice {
            vm.status = Some(StatusLine {
                kind: StatusKind::Error,
                message: notice.clone(),
            });
        }
        vm
    }

    /// Typed access to the screen in the main area.
    pub fn screen<R: CatalogRecord>(&self) -> Option<std::cell::RefMut<'_, ListScreen<R>>> {
        self.navigator.main_controller::<ListScreen<R>>()
    }
}
