use std::sync::Arc;

use api_error::{AppError, AppJson, Boundary, Failure};
use axum::{extract::Path, Extension, Json};
use common_types::{ErrorCode, QuestionRequest, QuestionResponse};
use http_client::CancellationToken;
use telemetry::Tracer;
use tracing::Instrument;

use crate::service::QuestionService;

const CREATE_QUESTION: Boundary = Boundary {
    operation: "CreateQuestionEndpoint",
    method: "POST",
    route: "/api/question",
    message: "Failed to create question",
    error_code: ErrorCode::QuestionCreateError,
};

const GET_QUESTION: Boundary = Boundary {
    operation: "GetQuestionEndpoint",
    method: "GET",
    route: "/api/question/{id}",
    message: "Failed to get question",
    error_code: ErrorCode::QuestionGetError,
};

const PROCESS_QUESTION_WITH_ANSWER: Boundary = Boundary {
    operation: "ProcessQuestionWithAnswerEndpoint",
    method: "POST",
    route: "/api/question/process-with-answer",
    message: "Failed to process question with answer",
    error_code: ErrorCode::QuestionProcessError,
};

/// Dependencies of the question endpoints
pub struct QuestionEndpoints {
    service: Arc<QuestionService>,
    tracer: Tracer,
}

impl QuestionEndpoints {
    #[must_use]
    pub const fn new(service: Arc<QuestionService>, tracer: Tracer) -> Self {
        Self { service, tracer }
    }
}

/// Create a question
pub async fn create_question(
    Extension(endpoints): Extension<Arc<QuestionEndpoints>>,
    AppJson(request): AppJson<QuestionRequest>,
) -> Result<Json<QuestionResponse>, AppError> {
    let span = CREATE_QUESTION.span(&endpoints.tracer);
    // Cancelled when axum drops this handler (client gone or timeout)
    let cancel = CancellationToken::new();
    let _cancel_on_drop = cancel.clone().drop_guard();

    tracing::info!(parent: &span, "Received request to create question");
    let outcome = endpoints
        .service
        .create_question(&request, &cancel)
        .instrument(span.clone())
        .await;

    CREATE_QUESTION
        .resolve(&span, outcome.map_err(Failure::from))
        .map(Json)
}

/// Get a question by id
pub async fn get_question(
    Extension(endpoints): Extension<Arc<QuestionEndpoints>>,
    Path(id): Path<String>,
) -> Result<Json<QuestionResponse>, AppError> {
    let span = GET_QUESTION.span(&endpoints.tracer);
    span.record("question.id", id.as_str());
    let cancel = CancellationToken::new();
    let _cancel_on_drop = cancel.clone().drop_guard();

    tracing::info!(parent: &span, "Received request to get question {id}");
    let outcome = endpoints
        .service
        .get_question(&id, &cancel)
        .instrument(span.clone())
        .await;

    GET_QUESTION
        .resolve_lookup(&span, outcome.map_err(Failure::from), || {
            AppError::not_found(
                ErrorCode::QuestionNotFound,
                format!("Question with id {id} not found"),
            )
        })
        .map(Json)
}

/// Create a question and have the answer service answer it
pub async fn process_question_with_answer(
    Extension(endpoints): Extension<Arc<QuestionEndpoints>>,
    AppJson(request): AppJson<QuestionRequest>,
) -> Result<Json<QuestionResponse>, AppError> {
    let span = PROCESS_QUESTION_WITH_ANSWER.span(&endpoints.tracer);
    let cancel = CancellationToken::new();
    let _cancel_on_drop = cancel.clone().drop_guard();

    tracing::info!(parent: &span, "Received request to process question with answer");
    let outcome = endpoints
        .service
        .process_question_with_answer(&request, &cancel)
        .instrument(span.clone())
        .await;

    PROCESS_QUESTION_WITH_ANSWER
        .resolve(&span, outcome.map_err(Failure::from))
        .map(Json)
}
