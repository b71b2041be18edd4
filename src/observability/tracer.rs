//! Tracer provider that exports finished spans to a local OTLP/JSON file.

use super::file_writer::{RotatingFile, RotationPolicy};
use super::span_formatter::OtlpJsonEncoder;
use futures_util::future::BoxFuture;
use opentelemetry::trace::TraceError;
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use std::path::PathBuf;

/// Where and how spans are written.
#[derive(Debug, Clone)]
pub struct TraceSink {
    pub path: PathBuf,
    pub rotation: RotationPolicy,
    pub scope: &'static str,
}

/// Exports each batch as one line of OTLP/JSON.
struct FileSpanExporter {
    file: RotatingFile,
    encoder: OtlpJsonEncoder,
    closed: bool,
}

impl SpanExporter for FileSpanExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        let result = if self.closed {
            Err(TraceError::from("trace exporter already shut down"))
        } else {
            let line = self.encoder.encode(&batch).to_string();
            self.file
                .write_line(&line)
                .map_err(|e| TraceError::from(format!("writing {}: {e}", self.file.path().display())))
        };
        Box::pin(std::future::ready(result))
    }

    fn shutdown(&mut self) {
        self.closed = true;
    }
}

impl std::fmt::Debug for FileSpanExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSpanExporter")
            .field("file", &self.file)
            .field("encoder", &self.encoder)
            .field("closed", &self.closed)
            .finish()
    }
}

/// Builds a provider whose spans are exported synchronously as they end.
pub fn create_tracer_provider(sink: TraceSink, resource: Resource) -> TracerProvider {
    let exporter = FileSpanExporter {
        file: RotatingFile::new(sink.path, sink.rotation),
        encoder: OtlpJsonEncoder::new(resource.clone(), sink.scope),
        closed: false,
    };

    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(exporter)
        .build()
}
