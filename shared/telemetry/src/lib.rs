//! Tracing and logging plumbing shared by both services
//!
//! Components never reach for a process-wide span source. Each one is handed
//! a [`Tracer`] at construction and opens its spans through it.

#![deny(clippy::all, clippy::pedantic, clippy::nursery, dead_code)]

mod propagation;
mod shutdown;
mod subscriber;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

use std::fmt::Display;

use tracing::{field::Empty, Span};

pub use propagation::{record_response, server_span};
pub use shutdown::shutdown_signal;
pub use subscriber::{init, LogFormat, TelemetryGuard};

/// Span factory bound to the name of the component that owns it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tracer {
    source: &'static str,
}

impl Tracer {
    /// Creates a tracer for the given component
    #[must_use]
    pub const fn new(source: &'static str) -> Self {
        Self { source }
    }

    /// Opens a span for `operation` as a child of the current span.
    ///
    /// The attribute set is fixed up front so callers can fill it with
    /// [`Span::record`] as the values become known.
    #[must_use]
    pub fn span(&self, operation: &'static str) -> Span {
        tracing::info_span!(
            "operation",
            otel.name = operation,
            source = self.source,
            otel.status_code = Empty,
            otel.status_message = Empty,
            http.method = Empty,
            http.route = Empty,
            http.url = Empty,
            http.status_code = Empty,
            question.id = Empty,
            question.text = Empty,
            answer.id = Empty,
            answer.text = Empty,
        )
    }
}

/// Marks `span` as failed with `message` as its status description
pub fn record_failure(span: &Span, message: &dyn Display) {
    span.record("otel.status_code", "ERROR");
    span.record("otel.status_message", tracing::field::display(message));
}

/// Marks `span` as completed successfully
pub fn record_success(span: &Span) {
    span.record("otel.status_code", "OK");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordedSpans;

    #[test]
    fn test_span_is_attributed_to_source() {
        let recorder = RecordedSpans::default();
        let _guard = recorder.set_default();

        let tracer = Tracer::new("QuestionService");
        let span = tracer.span("CreateQuestion");
        span.record("question.text", "why?");
        drop(span);

        let spans = recorder.named("CreateQuestion");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].get("source").map(String::as_str), Some("QuestionService"));
        assert_eq!(spans[0].get("question.text").map(String::as_str), Some("why?"));
        assert!(!spans[0].contains_key("otel.status_code"));
    }

    #[test]
    fn test_record_failure_sets_error_status() {
        let recorder = RecordedSpans::default();
        let _guard = recorder.set_default();

        let span = Tracer::new("HttpClient").span("HTTP GET");
        record_failure(&span, &"connection refused");

        let spans = recorder.named("HTTP GET");
        assert_eq!(spans[0].get("otel.status_code").map(String::as_str), Some("ERROR"));
        assert_eq!(
            spans[0].get("otel.status_message").map(String::as_str),
            Some("connection refused")
        );
    }

    #[test]
    fn test_record_success_sets_ok_status() {
        let recorder = RecordedSpans::default();
        let _guard = recorder.set_default();

        let span = Tracer::new("AnswerService").span("GetAnswer");
        record_success(&span);

        let spans = recorder.named("GetAnswer");
        assert_eq!(spans[0].get("otel.status_code").map(String::as_str), Some("OK"));
    }
}
