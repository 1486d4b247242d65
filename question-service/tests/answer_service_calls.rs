mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::StatusCode;
use common::{answer_api_client, parse_response_body, spawn_answer_service, TestSetup};
use common_types::CreateAnswerRequest;
use http_client::CancellationToken;
use httpmock::prelude::*;
use pretty_assertions::assert_eq;
use question_service::answer_api::AnswerApi;
use serde_json::json;

#[tokio::test]
async fn test_get_answer_from_live_answer_service() {
    let base_url = spawn_answer_service().await;
    let client = answer_api_client(&base_url);

    let answer = client
        .get_answer("abc", &CancellationToken::new())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(answer.id, "abc");
    assert_eq!(answer.answer_text, "Sample answer");
}

#[tokio::test]
async fn test_create_answer_on_live_answer_service() {
    let base_url = spawn_answer_service().await;
    let client = answer_api_client(&base_url);

    let answer = client
        .create_answer(
            &CreateAnswerRequest {
                question_id: "q-1".to_string(),
                answer_text: "Because.".to_string(),
            },
            &CancellationToken::new(),
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(answer.question_id, "q-1");
    assert_eq!(answer.answer_text, "Because.");
}

#[tokio::test]
async fn test_process_with_answer_end_to_end() {
    let base_url = spawn_answer_service().await;
    let setup = TestSetup::new(Arc::new(answer_api_client(&base_url)));

    let response = setup
        .send_post_request("/api/question/process-with-answer", json!({"text": "X"}))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["text"], "X");
}

#[tokio::test]
async fn test_downstream_error_fails_fast_with_boundary_code() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/api/answer");
        then.status(503);
    });
    let setup = TestSetup::new(Arc::new(answer_api_client(&server.base_url())));

    let response = setup
        .send_post_request("/api/question/process-with-answer", json!({"text": "X"}))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = parse_response_body(response).await;
    assert_eq!(body["errorCode"], "QUESTION_PROCESS_ERROR");
    assert_eq!(body["error"], "Failed to process question with answer");
    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn test_downstream_sends_trace_context() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/api/answer").header_exists("traceparent");
        then.status(200).json_body(json!({
            "id": "a-1",
            "questionId": "q-1",
            "answerText": "42",
            "createdAt": "2024-01-01T00:00:00Z"
        }));
    });
    // Spans need an OpenTelemetry layer and propagator to carry a trace id
    let _telemetry =
        telemetry::init("question-service-test", telemetry::LogFormat::Pretty, "info").unwrap();
    let setup = TestSetup::new(Arc::new(answer_api_client(&server.base_url())));

    let response = setup
        .send_post_request("/api/question/process-with-answer", json!({"text": "X"}))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn test_cancelling_aborts_slow_downstream_call() {
    let server = MockServer::start();
    let _mock = server.mock(|when, then| {
        when.method(GET).path("/api/answer/slow");
        then.status(200)
            .delay(Duration::from_secs(10))
            .json_body(json!(null));
    });
    let client = answer_api_client(&server.base_url());
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let err = client.get_answer("slow", &cancel).await.unwrap_err();

    assert!(err.is_cancelled());
    assert!(started.elapsed() < Duration::from_secs(3));
}
