use std::sync::Arc;
use std::time::Duration;

use aide::openapi::{Info, OpenApi};
use axum::{body::Body, error_handling::HandleErrorLayer, BoxError, Extension, Router};
use tokio::net::TcpListener;
use tower::{timeout::TimeoutLayer, ServiceBuilder};
use tower_http::trace::TraceLayer;

use crate::routes::{self, health::AnswerApiTarget, question::QuestionEndpoints};
use crate::types::Environment;

/// Builds the fully layered application router
#[must_use]
pub fn router(
    environment: Environment,
    question_endpoints: Arc<QuestionEndpoints>,
    answer_api: AnswerApiTarget,
    request_timeout: Duration,
) -> Router {
    let mut openapi = OpenApi {
        info: Info {
            title: "Question Service".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            ..Info::default()
        },
        ..OpenApi::default()
    };

    routes::handler(environment)
        .finish_api(&mut openapi)
        .layer(Extension(openapi))
        .layer(Extension(environment))
        .layer(Extension(question_endpoints))
        .layer(Extension(answer_api))
        // Server span per request, joined to the caller's trace if any
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(telemetry::server_span::<Body>)
                .on_response(telemetry::record_response::<Body>),
        )
        // Dropping the timed-out handler cancels its downstream calls
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(|err: BoxError| async move {
                    api_error::middleware_error(&err)
                }))
                .layer(TimeoutLayer::new(request_timeout)),
        )
}

/// Starts the server with the given environment and dependencies
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the server fails to
/// start or bind to the port
pub async fn start(
    environment: Environment,
    question_endpoints: Arc<QuestionEndpoints>,
) -> anyhow::Result<()> {
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], environment.port()?));
    let router = router(
        environment,
        question_endpoints,
        AnswerApiTarget(environment.answer_api_base_url()?),
        environment.request_timeout()?,
    );

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🔄 Question Service started on http://{addr}");

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await
        .map_err(anyhow::Error::from)
}
