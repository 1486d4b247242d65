use common_types::{AnswerResponse, CreateAnswerRequest};
use http_client::{CancellationToken, HttpClientError, TypedHttpClient};
use telemetry::Tracer;
use tracing::Instrument;

/// Trait for the Answer API
#[async_trait::async_trait]
pub trait AnswerApi: Send + Sync {
    /// Creates an answer for a question.
    ///
    /// `Ok(None)` means the answer service replied with a JSON `null`.
    async fn create_answer(
        &self,
        request: &CreateAnswerRequest,
        cancel: &CancellationToken,
    ) -> Result<Option<AnswerResponse>, HttpClientError>;

    /// Fetches an answer by its id
    async fn get_answer(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<AnswerResponse>, HttpClientError>;
}

/// Implements an HTTP client to the Answer API
///
/// For more details see the `answer-service` crate in this repository.
pub struct AnswerApiClient {
    http_client: TypedHttpClient,
    tracer: Tracer,
}

impl AnswerApiClient {
    #[must_use]
    pub const fn new(http_client: TypedHttpClient, tracer: Tracer) -> Self {
        Self {
            http_client,
            tracer,
        }
    }
}

#[async_trait::async_trait]
impl AnswerApi for AnswerApiClient {
    async fn create_answer(
        &self,
        request: &CreateAnswerRequest,
        cancel: &CancellationToken,
    ) -> Result<Option<AnswerResponse>, HttpClientError> {
        let span = self.tracer.span("CreateAnswer");
        span.record("question.id", request.question_id.as_str());

        tracing::info!(parent: &span, "Creating answer for question {}", request.question_id);
        let outcome = self
            .http_client
            .post::<_, Option<AnswerResponse>>("/api/answer", request, cancel)
            .instrument(span.clone())
            .await;

        match &outcome {
            Ok(_) => {
                telemetry::record_success(&span);
                tracing::info!(parent: &span, "Answer created for question {}", request.question_id);
            }
            Err(err) => {
                telemetry::record_failure(&span, err);
                tracing::error!(
                    parent: &span,
                    error = %err,
                    "Failed to create answer for question {}",
                    request.question_id
                );
            }
        }

        outcome
    }

    async fn get_answer(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<AnswerResponse>, HttpClientError> {
        let span = self.tracer.span("GetAnswer");
        span.record("answer.id", id);

        tracing::info!(parent: &span, "Requesting answer {id}");
        let outcome = match self.http_client.segment_path(&["api", "answer", id]) {
            Ok(path) => {
                self.http_client
                    .get::<Option<AnswerResponse>>(&path, cancel)
                    .instrument(span.clone())
                    .await
            }
            Err(err) => Err(err),
        };

        match &outcome {
            Ok(_) => {
                telemetry::record_success(&span);
                tracing::info!(parent: &span, "Answer {id} retrieved");
            }
            Err(err) => {
                telemetry::record_failure(&span, err);
                tracing::error!(parent: &span, error = %err, "Failed to get answer {id}");
            }
        }

        outcome
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use std::sync::{Mutex, PoisonError};

    use chrono::{Duration, Utc};
    use common_types::{AnswerResponse, CreateAnswerRequest};
    use http_client::{CancellationToken, HttpClientError, Method, StatusCode};

    use super::AnswerApi;

    enum Behaviour {
        Succeed,
        Fail(StatusCode),
        WaitForCancel,
    }

    /// In-memory [`AnswerApi`] that records every request it receives
    pub struct MockAnswerApiClient {
        behaviour: Behaviour,
        create_requests: Mutex<Vec<CreateAnswerRequest>>,
        cancel_tokens: Mutex<Vec<CancellationToken>>,
    }

    impl MockAnswerApiClient {
        /// Answers every call successfully
        #[must_use]
        pub fn new() -> Self {
            Self::with_behaviour(Behaviour::Succeed)
        }

        /// Fails every call as if the answer service replied with `status`
        #[must_use]
        pub fn failing(status: StatusCode) -> Self {
            Self::with_behaviour(Behaviour::Fail(status))
        }

        /// Never answers; every call ends only when its token is cancelled
        #[must_use]
        pub fn hanging() -> Self {
            Self::with_behaviour(Behaviour::WaitForCancel)
        }

        fn with_behaviour(behaviour: Behaviour) -> Self {
            Self {
                behaviour,
                create_requests: Mutex::new(Vec::new()),
                cancel_tokens: Mutex::new(Vec::new()),
            }
        }

        /// Every `create_answer` request received so far, in order
        #[must_use]
        pub fn create_requests(&self) -> Vec<CreateAnswerRequest> {
            self.create_requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Cancellation tokens handed to every call so far, in order
        #[must_use]
        pub fn cancel_tokens(&self) -> Vec<CancellationToken> {
            self.cancel_tokens
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        async fn outcome(
            &self,
            method: Method,
            path: String,
            cancel: &CancellationToken,
        ) -> Result<(), HttpClientError> {
            self.cancel_tokens
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(cancel.clone());

            match self.behaviour {
                Behaviour::Succeed => Ok(()),
                Behaviour::Fail(status) => Err(HttpClientError::Status {
                    method,
                    url: format!("http://answer-api.mock{path}"),
                    status,
                }),
                Behaviour::WaitForCancel => {
                    cancel.cancelled().await;
                    Err(HttpClientError::Cancelled)
                }
            }
        }
    }

    impl Default for MockAnswerApiClient {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait::async_trait]
    impl AnswerApi for MockAnswerApiClient {
        async fn create_answer(
            &self,
            request: &CreateAnswerRequest,
            cancel: &CancellationToken,
        ) -> Result<Option<AnswerResponse>, HttpClientError> {
            self.create_requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(request.clone());

            self.outcome(Method::POST, "/api/answer".to_string(), cancel)
                .await?;

            Ok(Some(AnswerResponse {
                id: format!("answer-for-{}", request.question_id),
                question_id: request.question_id.clone(),
                answer_text: request.answer_text.clone(),
                created_at: Utc::now(),
            }))
        }

        async fn get_answer(
            &self,
            id: &str,
            cancel: &CancellationToken,
        ) -> Result<Option<AnswerResponse>, HttpClientError> {
            self.outcome(Method::GET, format!("/api/answer/{id}"), cancel)
                .await?;

            Ok(Some(AnswerResponse {
                id: id.to_string(),
                question_id: "sample-question-id".to_string(),
                answer_text: "Sample answer".to_string(),
                created_at: Utc::now() - Duration::minutes(30),
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use http_client::{HttpClientConfig, Url};
    use httpmock::prelude::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use telemetry::testing::RecordedSpans;

    use super::*;

    fn client_for(base_url: &str) -> AnswerApiClient {
        let config = HttpClientConfig::new(Url::parse(base_url).unwrap())
            .with_timeout(Duration::from_secs(5));
        let http_client = TypedHttpClient::new(&config, Tracer::new("HttpClient")).unwrap();
        AnswerApiClient::new(http_client, Tracer::new("AnswerApiClient"))
    }

    #[tokio::test]
    async fn test_create_answer_posts_request() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/answer")
                .json_body(json!({"questionId": "q-1", "answerText": "42"}));
            then.status(200).json_body(json!({
                "id": "a-1",
                "questionId": "q-1",
                "answerText": "42",
                "createdAt": "2024-01-01T00:00:00Z"
            }));
        });

        let answer = client_for(&server.base_url())
            .create_answer(
                &CreateAnswerRequest {
                    question_id: "q-1".to_string(),
                    answer_text: "42".to_string(),
                },
                &CancellationToken::new(),
            )
            .await
            .unwrap()
            .unwrap();

        mock.assert();
        assert_eq!(answer.id, "a-1");
        assert_eq!(answer.question_id, "q-1");
    }

    #[tokio::test]
    async fn test_null_body_is_none() {
        let server = MockServer::start();
        let _mock = server.mock(|when, then| {
            when.method(GET).path("/api/answer/missing");
            then.status(200).header("content-type", "application/json").body("null");
        });

        let answer = client_for(&server.base_url())
            .get_answer("missing", &CancellationToken::new())
            .await
            .unwrap();

        assert!(answer.is_none());
    }

    #[tokio::test]
    async fn test_get_answer_keeps_reserved_characters_in_id() {
        let server = MockServer::start();
        let other_answer = server.mock(|when, then| {
            when.method(GET).path("/api/answer/a");
            then.status(200).json_body(json!({
                "id": "a",
                "questionId": "q-1",
                "answerText": "wrong answer",
                "createdAt": "2024-01-01T00:00:00Z"
            }));
        });

        let result = client_for(&server.base_url())
            .get_answer("a?b=c", &CancellationToken::new())
            .await;

        assert_eq!(other_answer.calls(), 0);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_get_answer_rejects_dot_segment_id() {
        let server = MockServer::start();
        let any_call = server.mock(|when, then| {
            when.method(GET);
            then.status(200).json_body(json!(null));
        });

        let err = client_for(&server.base_url())
            .get_answer("..", &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, HttpClientError::InvalidSegment(_)));
        assert_eq!(any_call.calls(), 0);
    }

    #[tokio::test]
    async fn test_failure_marks_span_and_propagates_error() {
        let recorder = RecordedSpans::default();
        let _guard = recorder.set_default();

        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/answer/abc");
            then.status(502);
        });

        let err = client_for(&server.base_url())
            .get_answer("abc", &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(http_client::StatusCode::BAD_GATEWAY));
        assert_eq!(mock.calls(), 1);

        let spans = recorder.named("GetAnswer");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].get("source").map(String::as_str), Some("AnswerApiClient"));
        assert_eq!(spans[0].get("answer.id").map(String::as_str), Some("abc"));
        assert_eq!(spans[0].get("otel.status_code").map(String::as_str), Some("ERROR"));
    }
}
