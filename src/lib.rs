//! Shelfdesk: client-side core of a library-management desktop client.
//!
//! The crate provides the building blocks a table-oriented client needs:
//! - Case-insensitive field search over typed records ([`list`])
//! - A filtered, paged list model with stable paging rules ([`list`])
//! - Background loading on a worker pool with completions delivered on the
//!   UI thread ([`worker`])
//! - View navigation with scene/window bookkeeping, embedded content areas
//!   and stylesheet composition ([`navigation`])
//!
//! A small terminal client ([`app`], [`ui`], [`catalog`]) hosts the core and
//! shows it working against a JSON catalog of books, copies, loans, users and
//! reading groups.

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Binary (main.rs): stdin commands, frame output     │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │
//! │  - Event handling → Actions                         │
//! │  - ListScreen<R> controllers, MainShell             │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI (ui/)      │   │ Navigation    │   │ Worker        │
//! │ - Renderer    │   │ - Registry    │   │ - Pool        │
//! │ - Theme       │   │ - Scene/area  │   │ - AsyncLoader │
//! │ - Components  │   │ - Stylesheets │   │ - Sequencing  │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  List (list/), Catalog (catalog/), Domain (domain/) │
//! │  - Matcher, paged model, columns                    │
//! │  - Records and the catalog service                  │
//! │  - Errors and session context                       │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! │  - OpenTelemetry spans exported to a local file     │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Threading
//!
//! Everything except producers runs on the thread that owns the [`App`].
//! Producers run on the [`worker::WorkerPool`]; their results wait in a queue
//! until the owner calls [`App::pump`], which runs the screen callbacks.
//!
//! # Configuration
//!
//! A flat TOML file, overridable key by key from the command line:
//!
//! ```toml
//! page_size = 15
//! worker_threads = 2
//! catalog_file = "~/library/catalog.json"
//! stylesheet_dir = "~/.config/shelfdesk/styles"
//! user_id = 1
//! user_name = "ada"
//! role = "librarian"
//! trace_level = "debug"
//! ```
//!
//! # Example
//!
//! ```rust
//! use shelfdesk::{handle_event, initialize, Config, Event};
//! use std::time::Duration;
//!
//! let mut app = initialize(&Config::default())?;
//! app.wait_idle(Duration::from_secs(5));
//!
//! for event in [Event::NextPage, Event::SelectNext] {
//!     let (_redraw, actions) = handle_event(&mut app, &event)?;
//!     for action in actions {
//!         app.execute(action)?;
//!     }
//! }
//! let frame = shelfdesk::ui::render(&app, 24, 100);
//! assert!(frame.contains("Shelfdesk"));
//! # Ok::<(), shelfdesk::ShelfdeskError>(())
//! ```

pub mod app;
pub mod catalog;
pub mod domain;
pub mod infrastructure;
pub mod list;
pub mod navigation;
pub mod worker;

pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, App, Event};
pub use domain::{BoxError, LoadError, Result, Role, SessionContext, ShelfdeskError};
pub use ui::Theme;

use catalog::{CatalogService, JsonCatalog};
use navigation::{BuiltinStylesheets, DirStylesheets, LayeredStylesheets};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use worker::{AsyncLoader, WorkerPool};

/// Client configuration.
///
/// Values arrive as strings (from a TOML file and `--key=value` arguments)
/// and are parsed by [`Config::from_map`], which falls back to the default
/// for every missing or malformed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Records per page. `0` is treated as `1`. Default: `10`
    pub page_size: usize,

    /// Threads in the shared worker pool. Default: `4`
    pub worker_threads: usize,

    /// Overrides the data directory holding the trace file.
    pub data_dir: Option<String>,

    /// JSON catalog to load instead of the bundled sample.
    pub catalog_file: Option<String>,

    /// Directory searched for stylesheets before the bundled ones.
    pub stylesheet_dir: Option<String>,

    /// Artificial delay added to every catalog call. Default: `0`
    pub latency_ms: u64,

    pub user_id: i64,
    pub user_name: String,
    pub role: Role,

    /// `EnvFilter` directive for traces, e.g. `debug` or
    /// `shelfdesk::worker=trace`. Default: `"info"`
    pub trace_level: Option<String>,

    /// View shown after startup. Default: `"books"`
    pub initial_view: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_size: 10,
            worker_threads: worker::DEFAULT_WORKER_THREADS,
            data_dir: None,
            catalog_file: None,
            stylesheet_dir: None,
            latency_ms: 0,
            user_id: 0,
            user_name: "guest".to_string(),
            role: Role::Member,
            trace_level: None,
            initial_view: "books".to_string(),
        }
    }
}

impl Config {
    /// Parses configuration from a string map.
    ///
    /// # Parsing Rules
    ///
    /// - `page_size`, `worker_threads`, `latency_ms`, `user_id`: numbers;
    ///   unparsable values fall back to the default
    /// - `role`: `librarian` or `member` (aliases accepted, see [`Role::parse`])
    /// - `data_dir`, `catalog_file`, `stylesheet_dir`, `trace_level`: taken
    ///   as is; empty strings count as unset
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use shelfdesk::{Config, Role};
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("page_size".to_string(), "25".to_string());
    /// map.insert("role".to_string(), "librarian".to_string());
    /// map.insert("worker_threads".to_string(), "many".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.page_size, 25);
    /// assert_eq!(config.role, Role::Librarian);
    /// assert_eq!(config.worker_threads, 4);
    /// ```
    #[must_use]
    pub fn from_map(config: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();
        let text = |key: &str| {
            config
                .get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let number = |key: &str| config.get(key).and_then(|v| v.trim().parse::<u64>().ok());
        // Out-of-range counts fall back instead of wrapping on narrow targets.
        let count = |key: &str| config.get(key).and_then(|v| v.trim().parse::<usize>().ok());

        let role = text("role").map_or(defaults.role, |name| {
            Role::parse(&name).unwrap_or_else(|| {
                tracing::warn!(role = %name, "unknown role, using member");
                Role::Member
            })
        });

        Self {
            page_size: count("page_size").unwrap_or(defaults.page_size),
            worker_threads: count("worker_threads").unwrap_or(defaults.worker_threads),
            data_dir: text("data_dir"),
            catalog_file: text("catalog_file"),
            stylesheet_dir: text("stylesheet_dir"),
            latency_ms: number("latency_ms").unwrap_or(defaults.latency_ms),
            user_id: config
                .get("user_id")
                .and_then(|v| v.trim().parse::<i64>().ok())
                .unwrap_or(defaults.user_id),
            user_name: text("user_name").unwrap_or(defaults.user_name),
            role,
            trace_level: text("trace_level"),
            initial_view: text("initial_view").unwrap_or(defaults.initial_view),
        }
    }

    /// Flattens a TOML document into the string map [`from_map`](Self::from_map)
    /// reads. Nested tables and arrays are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfdeskError::Config`] if `contents` is not valid TOML or
    /// holds a non-scalar value.
    pub fn toml_map(contents: &str) -> Result<BTreeMap<String, String>> {
        let table: toml::Table = contents
            .parse()
            .map_err(|e| ShelfdeskError::Config(format!("invalid TOML: {e}")))?;

        table
            .into_iter()
            .map(|(key, value)| {
                let text = match value {
                    toml::Value::String(s) => s,
                    toml::Value::Integer(i) => i.to_string(),
                    toml::Value::Float(f) => f.to_string(),
                    toml::Value::Boolean(b) => b.to_string(),
                    toml::Value::Datetime(d) => d.to_string(),
                    toml::Value::Array(_) | toml::Value::Table(_) => {
                        return Err(ShelfdeskError::Config(format!("{key}: expected a scalar value")));
                    }
                };
                Ok((key, text))
            })
            .collect()
    }

    /// # Errors
    ///
    /// See [`toml_map`](Self::toml_map).
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(Self::from_map(&Self::toml_map(contents)?))
    }

    /// # Errors
    ///
    /// Returns [`ShelfdeskError::Io`] if the file cannot be read, otherwise
    /// see [`toml_map`](Self::toml_map).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// The session this configuration logs in as.
    #[must_use]
    pub fn session(&self) -> SessionContext {
        SessionContext::new(self.user_id, self.user_name.clone(), self.role)
    }
}

/// Builds the client and shows the initial view.
///
/// - Loads the catalog from `catalog_file`, or the bundled sample
/// - Layers `stylesheet_dir` (when set) over the bundled stylesheets
/// - Creates the global worker pool with `worker_threads` threads
/// - Starts loading the initial view's records
///
/// Tracing is set up separately by
/// [`observability::init_tracing`](crate::observability::init_tracing).
///
/// # Errors
///
/// Returns catalog errors, worker pool spawn failures, and navigation errors
/// for an unknown `initial_view`.
pub fn initialize(config: &Config) -> Result<App> {
    let _span = tracing::debug_span!("initialize", initial_view = %config.initial_view).entered();

    let catalog = match &config.catalog_file {
        Some(file) => JsonCatalog::from_file(infrastructure::expand_tilde(file))?,
        None => JsonCatalog::sample()?,
    }
    .with_latency(Duration::from_millis(config.latency_ms));
    let service: Arc<dyn CatalogService> = Arc::new(catalog);

    let mut resolver = LayeredStylesheets::new();
    if let Some(dir) = &config.stylesheet_dir {
        resolver = resolver.with_layer(DirStylesheets::new(infrastructure::expand_tilde(dir)));
    }
    let resolver = resolver.with_layer(BuiltinStylesheets::bundled());

    let pool = WorkerPool::install_global(config.worker_threads)?;
    let mut app = App::new(config, service, resolver, AsyncLoader::new(pool.clone()));
    app.start(&config.initial_view)?;

    tracing::debug!(session = %config.session().label(), "client initialized");
    Ok(app)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_keys() {
        let config = Config::from_map(&BTreeMap::new());
        assert_eq!(config, Config::default());
        assert_eq!(config.session(), SessionContext::default());
    }

    #[test]
    fn out_of_range_counts_fall_back_to_defaults() {
        let too_big = (usize::MAX as u128 + 1).to_string();
        let map = BTreeMap::from([
            ("page_size".to_string(), too_big.clone()),
            ("worker_threads".to_string(), too_big),
            ("latency_ms".to_string(), "-5".to_string()),
        ]);

        let config = Config::from_map(&map);
        assert_eq!(config.page_size, Config::default().page_size);
        assert_eq!(config.worker_threads, Config::default().worker_threads);
        assert_eq!(config.latency_ms, 0);
    }

    #[test]
    fn toml_scalars_become_config() {
        let config = Config::from_toml_str(
            r#"
            page_size = 3
            user_id = 7
            user_name = "grace"
            role = "staff"
            catalog_file = ""
            "#,
        )
        .unwrap();

        assert_eq!(config.page_size, 3);
        assert_eq!(config.session(), SessionContext::new(7, "grace", Role::Librarian));
        assert_eq!(config.catalog_file, None);
    }

    #[test]
    fn nested_toml_is_rejected() {
        let err = Config::from_toml_str("[styles]\nbase = 1").unwrap_err();
        assert!(matches!(err, ShelfdeskError::Config(_)));
        assert!(matches!(Config::from_toml_str("page_size = "), Err(ShelfdeskError::Config(_))));
    }

    #[test]
    fn unknown_role_falls_back_to_member() {
        let mut map = BTreeMap::new();
        map.insert("role".to_string(), "wizard".to_string());
        assert_eq!(Config::from_map(&map).role, Role::Member);
    }

    #[test]
    fn from_file_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shelfdesk.toml");
        std::fs::write(&path, "initial_view = \"loans\"\nlatency_ms = 5\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.initial_view, "loans");
        assert_eq!(config.latency_ms, 5);
        assert!(matches!(Config::from_file(dir.path().join("missing.toml")), Err(ShelfdeskError::Io(_))));
    }

    #[test]
    fn initialize_starts_on_the_initial_view() {
        let config = Config {
            initial_view: "users".to_string(),
            ..Config::default()
        };
        let mut app = initialize(&config).unwrap();
        assert!(app.wait_idle(Duration::from_secs(5)));
        assert_eq!(app.active_view_id().as_deref(), Some("users"));
    }
}
