// Not every helper is used in every test, so we allow dead code
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use answer_service::{
    routes::answer::AnswerEndpoints, server, service::AnswerService, types::Environment,
};
use axum::{body::Body, http::Request, response::Response, Router};
use http_body_util::BodyExt;
use telemetry::Tracer;
use tower::ServiceExt;

pub struct TestSetup {
    pub router: Router,
}

impl TestSetup {
    pub fn new() -> Self {
        Self::with_options(Environment::Development, Some(Duration::ZERO), Duration::from_secs(5))
    }

    pub fn with_options(
        environment: Environment,
        processing_delay: Option<Duration>,
        request_timeout: Duration,
    ) -> Self {
        let service = Arc::new(AnswerService::new(
            Tracer::new("AnswerService"),
            processing_delay,
        ));
        let endpoints = Arc::new(AnswerEndpoints::new(service, Tracer::new("AnswerController")));

        Self {
            router: server::router(environment, endpoints, request_timeout),
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

    pub async fn send_raw_post_request(
        &self,
        route: &str,
        body: &'static str,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let request = Request::builder()
            .uri(route)
            .method("POST")
            .header("Content-Type", "application/json")
            .body(Body::from(body))?;

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
