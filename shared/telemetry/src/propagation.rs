//! W3C trace-context handling for inbound requests

use std::time::Duration;

use http::{HeaderMap, Request, Response};
use opentelemetry::{global, propagation::Extractor};
use tracing::{field::Empty, Span};
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// Adapter for extracting W3C Trace Context from HTTP headers
struct HeadersExtractor<'a>(&'a HeaderMap);

impl Extractor for HeadersExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|value| value.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(http::HeaderName::as_str).collect()
    }
}

/// Builds the server span for an inbound request.
///
/// If the caller sent a `traceparent` header the span joins that trace,
/// so both services' spans end up in one distributed trace.
pub fn server_span<B>(request: &Request<B>) -> Span {
    let span = tracing::info_span!(
        "http.request",
        otel.name = %format!("{} {}", request.method(), request.uri().path()),
        otel.kind = "server",
        http.method = %request.method(),
        http.url = %request.uri(),
        http.status_code = Empty,
    );

    let parent = global::get_text_map_propagator(|propagator| {
        propagator.extract(&HeadersExtractor(request.headers()))
    });
    span.set_parent(parent);

    span
}

/// Records the response status on the server span
pub fn record_response<B>(response: &Response<B>, latency: Duration, span: &Span) {
    span.record("http.status_code", response.status().as_u16());
    tracing::debug!(
        parent: span,
        status = response.status().as_u16(),
        latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
        "request completed"
    );
}
