mod docs;
pub mod health;
pub mod question;

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
        .api_route("/api/question", post(question::create_question))
        .api_route(
            "/api/question/process-with-answer",
            post(question::process_question_with_answer),
        )
        .api_route("/api/question/{id}", get(question::get_question))
}
