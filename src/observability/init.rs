//! Subscriber setup: `tracing` spans flow through OpenTelemetry into the
//! rotating trace file.

use super::file_writer::RotationPolicy;
use super::tracer::{self, TraceSink};
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::resource::Resource;
use std::path::PathBuf;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const SERVICE_NAME: &str = "shelfdesk";

/// File that receives the exported spans.
pub const TRACE_FILE: &str = "shelfdesk-otlp.json";

/// Installs the global subscriber and returns the trace file it writes to.
///
/// The filter comes from `config.trace_level` (default `"info"`); the file
/// lives in `config.data_dir` or [`crate::infrastructure::data_dir`].
///
/// Returns `None` when the data directory cannot be created or a global
/// subscriber is already installed. Tracing is optional, so neither case is an
/// error and repeated calls are harmless.
///
/// # Example
///
/// ```rust
/// use shelfdesk::observability::init_tracing;
/// use shelfdesk::Config;
///
/// let dir = std::env::temp_dir().join("shelfdesk-doc-traces");
/// let config = Config {
///     data_dir: Some(dir.to_string_lossy().into_owned()),
///     trace_level: Some("debug".to_string()),
///     ..Config::default()
/// };
/// let _ = init_tracing(&config);
/// tracing::debug!("tracing is active");
/// ```
pub fn init_tracing(config: &Config) -> Option<PathBuf> {
    let level = config.trace_level.clone().unwrap_or_else(|| "info".to_string());

    let data_dir = config.data_dir.as_deref().map_or_else(crate::infrastructure::data_dir, |dir| {
        PathBuf::from(crate::infrastructure::expand_tilde(dir))
    });
    std::fs::create_dir_all(&data_dir).ok()?;

    let resource = Resource::new(vec![
        KeyValue::new("service.name", SERVICE_NAME),
        KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
    ]);
    let sink = TraceSink {
        path: data_dir.join(TRACE_FILE),
        rotation: RotationPolicy::default(),
        scope: SERVICE_NAME,
    };
    let trace_file = sink.path.clone();

    let provider = tracer::create_tracer_provider(sink, resource);
    let otel_layer = OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME));

    tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(otel_layer)
        .try_init()
        .ok()?;

    tracing::debug!(trace_file = %trace_file.display(), "tracing initialized");
    Some(trace_file)
}
