use axum::{Extension, Json};
use schemars::JsonSchema;
use serde::Serialize;
use url::Url;

use crate::types::Environment;

/// Base address of the answer service, reported by the health check
#[derive(Debug, Clone)]
pub struct AnswerApiTarget(pub Url);

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    status: &'static str,
    semver: &'static str,
    rev: Option<&'static str>,
    environment: String,
    /// Where answer requests are sent. The health check does not call it.
    answer_api: String,
}

/// Liveness, version and downstream target
pub async fn handler(
    Extension(environment): Extension<Environment>,
    Extension(AnswerApiTarget(answer_api)): Extension<AnswerApiTarget>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        semver: env!("CARGO_PKG_VERSION"),
        rev: option_env!("GIT_REV"),
        environment: environment.to_string(),
        answer_api: answer_api.to_string(),
    })
}
