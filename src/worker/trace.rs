//! Trace context carried from the UI thread into worker jobs.
//!
//! Spans opened by a producer on a worker thread would otherwise start new
//! traces. Capturing the submitting span's identifiers and re-attaching them
//! as a remote parent keeps the whole load under one trace in the exported
//! OTLP file.

/// Trace and span identifiers of the span that submitted a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a 32-digit hex string.
    pub trace_id: String,

    /// Span ID of the submitting span as a 16-digit hex string.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Captures the context of the current tracing span.
    ///
    /// Returns `None` when no OpenTelemetry layer is installed or the current
    /// span context is invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use shelfdesk::worker::TraceContext;
    ///
    /// // Without a subscriber there is no valid span context.
    /// assert!(TraceContext::from_current().is_none());
    /// ```
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let otel_context = tracing::Span::current().context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if !span_context.is_valid() {
            return None;
        }

        Some(Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
        })
    }

    /// Attaches this context as the remote parent on the current thread.
    ///
    /// The returned guard must be held for as long as spans should be linked;
    /// dropping it restores the previous context. Returns `None` if either
    /// identifier fails to parse.
    pub fn attach(&self) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{
            SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState,
        };

        let trace_id = TraceId::from_hex(&self.trace_id).ok()?;
        let span_id = SpanId::from_hex(&self.parent_span_id).ok()?;

        let span_context = SpanContext::new(
            trace_id,
            span_id,
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );

        Some(
            opentelemetry::Context::current()
                .with_remote_span_context(span_context)
                .attach(),
        )
    }
}
