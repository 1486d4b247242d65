use std::sync::Arc;

use api_error::{AppError, AppJson, Boundary, Failure};
use axum::{extract::Path, Extension, Json};
use common_types::{AnswerResponse, CreateAnswerRequest, ErrorCode};
use telemetry::Tracer;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::service::AnswerService;

const CREATE_ANSWER: Boundary = Boundary {
    operation: "CreateAnswerEndpoint",
    method: "POST",
    route: "/api/answer",
    message: "Failed to create answer",
    error_code: ErrorCode::AnswerCreateError,
};

const GET_ANSWER: Boundary = Boundary {
    operation: "GetAnswerEndpoint",
    method: "GET",
    route: "/api/answer/{id}",
    message: "Failed to get answer",
    error_code: ErrorCode::AnswerGetError,
};

const GET_ANSWER_BY_QUESTION_ID: Boundary = Boundary {
    operation: "GetAnswerByQuestionIdEndpoint",
    method: "GET",
    route: "/api/answer/question/{questionId}",
    message: "Failed to get answer for question",
    error_code: ErrorCode::AnswerGetError,
};

/// Dependencies of the answer endpoints
pub struct AnswerEndpoints {
    service: Arc<AnswerService>,
    tracer: Tracer,
}

impl AnswerEndpoints {
    #[must_use]
    pub const fn new(service: Arc<AnswerService>, tracer: Tracer) -> Self {
        Self { service, tracer }
    }
}

/// Create an answer
pub async fn create_answer(
    Extension(endpoints): Extension<Arc<AnswerEndpoints>>,
    AppJson(request): AppJson<CreateAnswerRequest>,
) -> Result<Json<AnswerResponse>, AppError> {
    let span = CREATE_ANSWER.span(&endpoints.tracer);
    span.record("question.id", request.question_id.as_str());
    let cancel = CancellationToken::new();
    let _cancel_on_drop = cancel.clone().drop_guard();

    tracing::info!(parent: &span, "Received request to create answer for question {}", request.question_id);
    let outcome = endpoints
        .service
        .create_answer(&request, &cancel)
        .instrument(span.clone())
        .await;

    CREATE_ANSWER
        .resolve(&span, outcome.map_err(Failure::from))
        .map(Json)
}

/// Get an answer by id
pub async fn get_answer(
    Extension(endpoints): Extension<Arc<AnswerEndpoints>>,
    Path(id): Path<String>,
) -> Result<Json<AnswerResponse>, AppError> {
    let span = GET_ANSWER.span(&endpoints.tracer);
    span.record("answer.id", id.as_str());
    let cancel = CancellationToken::new();
    let _cancel_on_drop = cancel.clone().drop_guard();

    tracing::info!(parent: &span, "Received request to get answer {id}");
    let outcome = endpoints
        .service
        .get_answer(&id, &cancel)
        .instrument(span.clone())
        .await;

    GET_ANSWER
        .resolve_lookup(&span, outcome.map_err(Failure::from), || {
            AppError::not_found(
                ErrorCode::AnswerNotFound,
                format!("Answer with id {id} not found"),
            )
        })
        .map(Json)
}

/// Get the answer to a question
pub async fn get_answer_by_question_id(
    Extension(endpoints): Extension<Arc<AnswerEndpoints>>,
    Path(question_id): Path<String>,
) -> Result<Json<AnswerResponse>, AppError> {
    let span = GET_ANSWER_BY_QUESTION_ID.span(&endpoints.tracer);
    span.record("question.id", question_id.as_str());
    let cancel = CancellationToken::new();
    let _cancel_on_drop = cancel.clone().drop_guard();

    tracing::info!(parent: &span, "Received request to get answer for question {question_id}");
    let outcome = endpoints
        .service
        .get_answer_by_question_id(&question_id, &cancel)
        .instrument(span.clone())
        .await;

    GET_ANSWER_BY_QUESTION_ID
        .resolve_lookup(&span, outcome.map_err(Failure::from), || {
            AppError::not_found(
                ErrorCode::AnswerNotFound,
                format!("Answer for question {question_id} not found"),
            )
        })
        .map(Json)
}
