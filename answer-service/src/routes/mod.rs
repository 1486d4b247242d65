mod docs;
mod health;
pub mod answer;

use aide::axum::{
    routing::{get, post},
    ApiRouter,
};

use crate::types::Environment;

/// Creates the router with all handler routes.
///
/// API docs are only mounted where the environment allows them.
pub fn handler(environment: Environment) -> ApiRouter {
    let router = if environment.show_api_docs() {
        ApiRouter::new().merge(docs::handler())
    } else {
        ApiRouter::new()
    };

    router
        .api_route("/health", get(health::handler))
        .api_route("/api/answer", post(answer::create_answer))
        .api_route("/api/answer/{id}", get(answer::get_answer))
        .api_route(
            "/api/answer/question/{questionId}",
            get(answer::get_answer_by_question_id),
        )
}
