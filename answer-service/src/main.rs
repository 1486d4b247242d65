use std::sync::Arc;

use answer_service::{
    routes::answer::AnswerEndpoints, server, service::AnswerService, types::Environment,
};
use anyhow::Result;
use telemetry::Tracer;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let env = Environment::from_env()?;

    // The _guard must be kept alive for the duration of the program
    let _guard = telemetry::init("answer-service", env.log_format(), env.default_log_directive())?;

    info!("Starting Answer Service in {env} environment");

    let answer_service = Arc::new(AnswerService::new(
        Tracer::new("AnswerService"),
        env.processing_delay()?,
    ));
    let answer_endpoints = Arc::new(AnswerEndpoints::new(
        answer_service,
        Tracer::new("AnswerController"),
    ));

    let result = server::start(env, answer_endpoints).await;

    info!("✅ Answer Service shutdown complete");

    result
}
