//! Global subscriber and OpenTelemetry tracer provider setup

use opentelemetry::{global, trace::TracerProvider as _, KeyValue};
use opentelemetry_sdk::{
    propagation::TraceContextPropagator,
    trace::{self, TracerProvider},
    Resource,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line, for log shippers
    Json,
    /// Human-readable output for local development
    Pretty,
}

/// Keeps the tracer provider alive; shuts it down when dropped
#[must_use = "dropping the guard shuts the tracer provider down"]
pub struct TelemetryGuard {
    _provider: TracerProvider,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        global::shutdown_tracer_provider();
    }
}

/// Installs the global subscriber and the W3C trace-context propagator.
///
/// `RUST_LOG` controls filtering and falls back to `default_directive`.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed or the
/// filter directive is invalid.
pub fn init(
    service_name: &'static str,
    format: LogFormat,
    default_directive: &str,
) -> anyhow::Result<TelemetryGuard> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    let provider = TracerProvider::builder()
        .with_config(trace::config().with_resource(Resource::new(vec![KeyValue::new(
            "service.name",
            service_name,
        )])))
        .build();
    let tracer = provider.tracer(service_name);
    global::set_tracer_provider(provider.clone());

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directive)?,
    };

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_opentelemetry::layer().with_tracer(tracer));

    match format {
        LogFormat::Json => registry.with(fmt::layer().json()).try_init()?,
        LogFormat::Pretty => registry.with(fmt::layer()).try_init()?,
    }

    Ok(TelemetryGuard {
        _provider: provider,
    })
}
