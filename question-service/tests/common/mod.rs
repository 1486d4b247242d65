// Not every helper is used in every test, so we allow dead code
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{body::Body, http::Request, response::Response, Router};
use http_body_util::BodyExt;
use http_client::{HttpClientConfig, TypedHttpClient, Url};
use question_service::{
    answer_api::{AnswerApi, AnswerApiClient},
    routes::{health::AnswerApiTarget, question::QuestionEndpoints},
    server,
    service::QuestionService,
    types::Environment,
};
use telemetry::Tracer;
use tokio::net::TcpListener;
use tower::ServiceExt;

pub const ANSWER_API_URL: &str = "http://answer-api.test:5001/";

pub struct TestSetup {
    pub router: Router,
}

impl TestSetup {
    pub fn new(answer_api: Arc<dyn AnswerApi>) -> Self {
        Self::with_timeout(answer_api, Duration::from_secs(5))
    }

    pub fn with_timeout(answer_api: Arc<dyn AnswerApi>, request_timeout: Duration) -> Self {
        let service = Arc::new(QuestionService::new(
            answer_api,
            Tracer::new("QuestionService"),
            Some(Duration::ZERO),
        ));
        let endpoints = Arc::new(QuestionEndpoints::new(
            service,
            Tracer::new("QuestionController"),
        ));

        Self {
            router: server::router(
                Environment::Development,
                endpoints,
                AnswerApiTarget(Url::parse(ANSWER_API_URL).unwrap()),
                request_timeout,
            ),
        }
    }

    pub async fn send_post_request(
        &self,
        route: &str,
        payload: serde_json::Value,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let request = Request::builder()
            .uri(route)
            .method("POST")
            .header("Content-Type", "application/json")
            .body(Body::from(payload.to_string()))?;

        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }

    pub async fn send_get_request(
        &self,
        route: &str,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let request = Request::builder()
            .uri(route)
            .method("GET")
            .body(Body::empty())?;
        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }
}

/// Parse response body to JSON
pub async fn parse_response_body(response: Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Real answer API client pointed at `base_url`
pub fn answer_api_client(base_url: &str) -> AnswerApiClient {
    let config = HttpClientConfig::new(Url::parse(base_url).unwrap())
        .with_timeout(Duration::from_secs(5));
    let http_client = TypedHttpClient::new(&config, Tracer::new("HttpClient")).unwrap();
    AnswerApiClient::new(http_client, Tracer::new("AnswerApiClient"))
}

/// Serves the real answer service on an ephemeral local port and returns
/// its base URL
pub async fn spawn_answer_service() -> String {
    let service = Arc::new(answer_service::service::AnswerService::new(
        Tracer::new("AnswerService"),
        Some(Duration::ZERO),
    ));
    let endpoints = Arc::new(answer_service::routes::answer::AnswerEndpoints::new(
        service,
        Tracer::new("AnswerController"),
    ));
    let router = answer_service::server::router(
        answer_service::types::Environment::Development,
        endpoints,
        Duration::from_secs(5),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router.into_make_service())
            .await
            .unwrap();
    });

    format!("http://{addr}")
}
