//! Question operations, including the call out to the answer service

use std::sync::Arc;
use std::time::Duration;

use api_error::{Failure, Lookup};
use chrono::Utc;
use common_types::{CreateAnswerRequest, QuestionRequest, QuestionResponse};
use http_client::{CancellationToken, HttpClientError};
use telemetry::Tracer;
use thiserror::Error;
use tracing::Instrument;
use uuid::Uuid;

use crate::answer_api::AnswerApi;

/// Text of the answer attached by [`QuestionService::process_question_with_answer`]
pub const AUTOMATED_ANSWER_TEXT: &str = "This is an automated answer";

const CREATE_QUESTION_LATENCY: Duration = Duration::from_millis(100);
const GET_QUESTION_LATENCY: Duration = Duration::from_millis(50);

#[derive(Debug, Error)]
pub enum QuestionServiceError {
    #[error("answer service call for question {question_id} failed: {source}")]
    AnswerApi {
        question_id: String,
        #[source]
        source: HttpClientError,
    },

    #[error("operation cancelled")]
    Cancelled,
}

impl QuestionServiceError {
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<QuestionServiceError> for Failure {
    fn from(err: QuestionServiceError) -> Self {
        Self::unexpected(err)
    }
}

pub struct QuestionService {
    answer_api: Arc<dyn AnswerApi>,
    tracer: Tracer,
    processing_delay: Option<Duration>,
}

impl QuestionService {
    /// `processing_delay` replaces the simulated latency of every operation;
    /// `None` keeps each operation's own
    #[must_use]
    pub fn new(
        answer_api: Arc<dyn AnswerApi>,
        tracer: Tracer,
        processing_delay: Option<Duration>,
    ) -> Self {
        Self {
            answer_api,
            tracer,
            processing_delay,
        }
    }

    /// Creates a question with a fresh id and the current time
    ///
    /// # Errors
    ///
    /// Returns [`QuestionServiceError::Cancelled`] if `cancel` fires first
    pub async fn create_question(
        &self,
        request: &QuestionRequest,
        cancel: &CancellationToken,
    ) -> Result<QuestionResponse, QuestionServiceError> {
        let span = self.tracer.span("CreateQuestion");
        span.record("question.text", request.text.as_str());

        let outcome = async {
            tracing::info!("Creating question: {}", request.text);
            self.simulate_processing(CREATE_QUESTION_LATENCY, cancel).await?;

            let question = QuestionResponse {
                id: Uuid::new_v4().to_string(),
                text: request.text.clone(),
                created_at: Utc::now(),
            };
            tracing::info!("Question created with ID: {}", question.id);
            Ok(question)
        }
        .instrument(span.clone())
        .await;

        if let Err(err) = &outcome {
            tracing::error!(parent: &span, error = %err, "Failed to create question");
        }
        finish(&span, outcome)
    }

    /// Looks up a question by id.
    ///
    /// There is no storage behind this service, so every id resolves to a
    /// sample question created an hour ago.
    ///
    /// # Errors
    ///
    /// Returns [`QuestionServiceError::Cancelled`] if `cancel` fires first
    pub async fn get_question(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<Lookup<QuestionResponse>, QuestionServiceError> {
        let span = self.tracer.span("GetQuestion");
        span.record("question.id", id);

        let outcome = async {
            tracing::info!("Retrieving question with ID: {id}");
            self.simulate_processing(GET_QUESTION_LATENCY, cancel).await?;

            let question = QuestionResponse {
                id: id.to_string(),
                text: "Sample question".to_string(),
                created_at: Utc::now() - chrono::Duration::hours(1),
            };
            tracing::info!("Question retrieved: {id}");
            Ok(Lookup::Found(question))
        }
        .instrument(span.clone())
        .await;

        if let Err(err) = &outcome {
            tracing::error!(parent: &span, error = %err, "Failed to get question {id}");
        }
        finish(&span, outcome)
    }

    /// Creates a question, then asks the answer service to answer it.
    ///
    /// The two steps run strictly in order. The answer only shows up in the
    /// span and logs; the question is what gets returned.
    ///
    /// # Errors
    ///
    /// Fails if the question cannot be created or the answer service call
    /// fails. Nothing is retried or rolled back.
    pub async fn process_question_with_answer(
        &self,
        request: &QuestionRequest,
        cancel: &CancellationToken,
    ) -> Result<QuestionResponse, QuestionServiceError> {
        let span = self.tracer.span("ProcessQuestionWithAnswer");
        span.record("question.text", request.text.as_str());

        let outcome = async {
            tracing::info!("Processing question with answer: {}", request.text);

            let question = self.create_question(request, cancel).await?;
            tracing::Span::current().record("question.id", question.id.as_str());

            let answer_request = CreateAnswerRequest {
                question_id: question.id.clone(),
                answer_text: AUTOMATED_ANSWER_TEXT.to_string(),
            };
            let answer = self
                .answer_api
                .create_answer(&answer_request, cancel)
                .await
                .map_err(|source| {
                    if source.is_cancelled() {
                        QuestionServiceError::Cancelled
                    } else {
                        QuestionServiceError::AnswerApi {
                            question_id: question.id.clone(),
                            source,
                        }
                    }
                })?;

            if let Some(answer) = answer {
                tracing::Span::current().record("answer.id", answer.id.as_str());
                tracing::info!(
                    "Question processed with answer. Question: {}, Answer: {}",
                    question.id,
                    answer.id
                );
            }

            Ok(question)
        }
        .instrument(span.clone())
        .await;

        if let Err(err) = &outcome {
            tracing::error!(parent: &span, error = %err, "Failed to process question with answer");
        }
        finish(&span, outcome)
    }

    async fn simulate_processing(
        &self,
        latency: Duration,
        cancel: &CancellationToken,
    ) -> Result<(), QuestionServiceError> {
        let delay = self.processing_delay.unwrap_or(latency);
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(QuestionServiceError::Cancelled),
            () = tokio::time::sleep(delay) => Ok(()),
        }
    }
}

fn finish<T>(
    span: &tracing::Span,
    outcome: Result<T, QuestionServiceError>,
) -> Result<T, QuestionServiceError> {
    match &outcome {
        Ok(_) => telemetry::record_success(span),
        Err(err) => telemetry::record_failure(span, err),
    }
    outcome
}
