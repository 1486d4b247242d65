use std::sync::Arc;

use http_client::{HttpClientConfig, TypedHttpClient};
use question_service::{
    answer_api::AnswerApiClient, routes::question::QuestionEndpoints, server,
    service::QuestionService, types::Environment,
};
use telemetry::Tracer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env()?;

    // The guard must outlive the server so buffered spans are flushed
    let _telemetry = telemetry::init(
        "question-service",
        environment.log_format(),
        environment.default_log_directive(),
    )?;

    tracing::info!("Starting Question Service in {environment} environment");

    let answer_api_config = HttpClientConfig::new(environment.answer_api_base_url()?)
        .with_timeout(environment.answer_api_timeout()?);
    let http_client = TypedHttpClient::new(&answer_api_config, Tracer::new("HttpClient"))?;
    tracing::info!("✅ Answer API client targets {}", http_client.base_url());

    let answer_api = Arc::new(AnswerApiClient::new(
        http_client,
        Tracer::new("AnswerApiClient"),
    ));
    let question_service = Arc::new(QuestionService::new(
        answer_api,
        Tracer::new("QuestionService"),
        environment.processing_delay()?,
    ));
    let question_endpoints = Arc::new(QuestionEndpoints::new(
        question_service,
        Tracer::new("QuestionController"),
    ));

    server::start(environment, question_endpoints).await
}
