//! OpenTelemetry tracing exported to a local file.
//!
//! ```text
//! tracing macros → tracing-opentelemetry → SDK provider → FileSpanExporter
//!                                                            ↓
//!                              <data_dir>/shelfdesk-otlp.json (rotated at 10 MiB, 3 backups)
//! ```
//!
//! The level comes from the `trace_level` config key and defaults to `info`.
//! Each line of the file is a self-contained OTLP/JSON `resourceSpans`
//! document.

mod file_writer;
mod init;
mod span_formatter;
mod tracer;

pub use init::{init_tracing, TRACE_FILE};
