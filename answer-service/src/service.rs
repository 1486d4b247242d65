use std::time::Duration;

use api_error::{Failure, Lookup};
use chrono::Utc;
use common_types::{AnswerResponse, CreateAnswerRequest};
use telemetry::Tracer;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, Span};
use uuid::Uuid;

const CREATE_ANSWER_LATENCY: Duration = Duration::from_millis(150);
const GET_ANSWER_LATENCY: Duration = Duration::from_millis(50);
const GET_ANSWER_BY_QUESTION_LATENCY: Duration = Duration::from_millis(75);

#[derive(Debug, Error)]
pub enum AnswerServiceError {
    #[error("operation cancelled")]
    Cancelled,
}

impl From<AnswerServiceError> for Failure {
    fn from(err: AnswerServiceError) -> Self {
        Self::unexpected(err)
    }
}

/// Answer operations. Nothing is stored; responses are built per call.
pub struct AnswerService {
    tracer: Tracer,
    /// Overrides the simulated latency of every operation when set
    processing_delay: Option<Duration>,
}

impl AnswerService {
    #[must_use]
    pub const fn new(tracer: Tracer, processing_delay: Option<Duration>) -> Self {
        Self {
            tracer,
            processing_delay,
        }
    }

    /// Creates an answer with a fresh id, echoing the request
    ///
    /// # Errors
    ///
    /// Returns [`AnswerServiceError::Cancelled`] if `cancel` fires first
    pub async fn create_answer(
        &self,
        request: &CreateAnswerRequest,
        cancel: &CancellationToken,
    ) -> Result<AnswerResponse, AnswerServiceError> {
        let span = self.tracer.span("CreateAnswer");
        span.record("question.id", request.question_id.as_str());
        span.record("answer.text", request.answer_text.as_str());

        let outcome = async {
            tracing::info!("Creating answer for question {}", request.question_id);
            self.simulate_processing(CREATE_ANSWER_LATENCY, cancel).await?;

            let answer = AnswerResponse {
                id: Uuid::new_v4().to_string(),
                question_id: request.question_id.clone(),
                answer_text: request.answer_text.clone(),
                created_at: Utc::now(),
            };
            Span::current().record("answer.id", answer.id.as_str());
            tracing::info!("Answer created with ID: {}", answer.id);
            Ok(answer)
        }
        .instrument(span.clone())
        .await;

        finish(&span, outcome, "Failed to create answer")
    }

    /// Looks up an answer by id; every id resolves to a sample answer
    ///
    /// # Errors
    ///
    /// Returns [`AnswerServiceError::Cancelled`] if `cancel` fires first
    pub async fn get_answer(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<Lookup<AnswerResponse>, AnswerServiceError> {
        let span = self.tracer.span("GetAnswer");
        span.record("answer.id", id);

        let outcome = async {
            tracing::info!("Retrieving answer with ID: {id}");
            self.simulate_processing(GET_ANSWER_LATENCY, cancel).await?;

            Ok(Lookup::Found(AnswerResponse {
                id: id.to_string(),
                question_id: "sample-question-id".to_string(),
                answer_text: "Sample answer".to_string(),
                created_at: Utc::now() - chrono::Duration::minutes(30),
            }))
        }
        .instrument(span.clone())
        .await;

        finish(&span, outcome, "Failed to get answer")
    }

    /// Looks up the answer to a question; every question has one
    ///
    /// # Errors
    ///
    /// Returns [`AnswerServiceError::Cancelled`] if `cancel` fires first
    pub async fn get_answer_by_question_id(
        &self,
        question_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Lookup<AnswerResponse>, AnswerServiceError> {
        let span = self.tracer.span("GetAnswerByQuestionId");
        span.record("question.id", question_id);

        let outcome = async {
            tracing::info!("Retrieving answer for question {question_id}");
            self.simulate_processing(GET_ANSWER_BY_QUESTION_LATENCY, cancel).await?;

            let answer = AnswerResponse {
                id: Uuid::new_v4().to_string(),
                question_id: question_id.to_string(),
                answer_text: "Answer for the question".to_string(),
                created_at: Utc::now() - chrono::Duration::minutes(15),
            };
            Span::current().record("answer.id", answer.id.as_str());
            Ok(Lookup::Found(answer))
        }
        .instrument(span.clone())
        .await;

        finish(&span, outcome, "Failed to get answer for question")
    }

    async fn simulate_processing(
        &self,
        latency: Duration,
        cancel: &CancellationToken,
    ) -> Result<(), AnswerServiceError> {
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(AnswerServiceError::Cancelled),
            () = tokio::time::sleep(self.processing_delay.unwrap_or(latency)) => Ok(()),
        }
    }
}

fn finish<T>(
    span: &Span,
    outcome: Result<T, AnswerServiceError>,
    failure_message: &str,
) -> Result<T, AnswerServiceError> {
    match &outcome {
        Ok(_) => telemetry::record_success(span),
        Err(err) => {
            telemetry::record_failure(span, err);
            tracing::error!(parent: span, error = %err, "{failure_message}");
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use telemetry::testing::RecordedSpans;

    use super::*;

    fn service() -> AnswerService {
        AnswerService::new(Tracer::new("AnswerService"), Some(Duration::ZERO))
    }

    #[tokio::test]
    async fn test_create_answer_echoes_request() {
        let request = CreateAnswerRequest {
            question_id: "q-1".to_string(),
            answer_text: "forty-two".to_string(),
        };

        let first = service()
            .create_answer(&request, &CancellationToken::new())
            .await
            .unwrap();
        let second = service()
            .create_answer(&request, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(first.question_id, "q-1");
        assert_eq!(first.answer_text, "forty-two");
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_get_answer_uses_requested_id() {
        let lookup = service()
            .get_answer("abc", &CancellationToken::new())
            .await
            .unwrap();

        let Lookup::Found(answer) = lookup else {
            panic!("expected an answer");
        };
        assert_eq!(answer.id, "abc");
        assert_eq!(answer.question_id, "sample-question-id");
        assert_eq!(answer.answer_text, "Sample answer");
    }

    #[tokio::test]
    async fn test_get_answer_by_question_id_links_question() {
        let lookup = service()
            .get_answer_by_question_id("q-9", &CancellationToken::new())
            .await
            .unwrap();

        let Lookup::Found(answer) = lookup else {
            panic!("expected an answer");
        };
        assert_eq!(answer.question_id, "q-9");
        assert_eq!(answer.answer_text, "Answer for the question");
        assert!(answer.created_at < Utc::now() - chrono::Duration::minutes(14));
    }

    #[tokio::test]
    async fn test_cancellation_interrupts_processing_delay() {
        let recorder = RecordedSpans::default();
        let _guard = recorder.set_default();
        let service = AnswerService::new(Tracer::new("AnswerService"), Some(Duration::from_secs(30)));
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let result = service.get_answer("abc", &cancel).await;

        assert!(matches!(result, Err(AnswerServiceError::Cancelled)));
        let spans = recorder.named("GetAnswer");
        assert_eq!(spans[0].get("otel.status_code").map(String::as_str), Some("ERROR"));
    }
}
