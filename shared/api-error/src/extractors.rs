//! Request body extractor that reports rejections in the error envelope

use aide::operation::OperationInput;
use aide::OperationOutput;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use common_types::ErrorCode;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;

use crate::AppError;

/// JSON body extractor whose rejection is a 400 [`AppError`]
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                tracing::warn!("Rejected request body: {rejection}");
                let message = match rejection {
                    JsonRejection::MissingJsonContentType(_) => {
                        "Missing Content-Type: application/json header"
                    }
                    _ => "Invalid JSON payload",
                };
                AppError::bad_request(ErrorCode::InvalidRequestBody, message)
            })?;

        Ok(Self(payload))
    }
}

impl<T> OperationInput for AppJson<T>
where
    T: JsonSchema,
{
    fn operation_input(ctx: &mut aide::generate::GenContext, operation: &mut aide::openapi::Operation) {
        Json::<T>::operation_input(ctx, operation);
    }

    fn inferred_early_responses(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Vec<(Option<u16>, aide::openapi::Response)> {
        AppError::inferred_responses(ctx, operation)
    }
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::StatusCode, routing::post, Router};
    use axum::http::Request as HttpRequest;
    use http_body_util::BodyExt;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;
    use tower::ServiceExt;

    use super::*;

    #[derive(Deserialize)]
    struct Payload {
        text: String,
    }

    async fn echo(AppJson(payload): AppJson<Payload>) -> String {
        payload.text
    }

    fn request(content_type: Option<&str>, body: &'static str) -> Request {
        let mut builder = HttpRequest::builder().method("POST").uri("/");
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        builder.body(Body::from(body)).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_valid_body_is_extracted() {
        let app = Router::new().route("/", post(echo));

        let response = app
            .oneshot(request(Some("application/json"), r#"{"text":"hi"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"hi");
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected_with_envelope() {
        let app = Router::new().route("/", post(echo));

        let response = app
            .oneshot(request(Some("application/json"), r#"{"text":"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["errorCode"], "INVALID_REQUEST_BODY");
        assert_eq!(body["statusCode"], 400);
        assert_eq!(body["error"], "Invalid JSON payload");
    }

    #[tokio::test]
    async fn test_missing_content_type_is_rejected() {
        let app = Router::new().route("/", post(echo));

        let response = app.oneshot(request(None, r#"{"text":"hi"}"#)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Missing Content-Type: application/json header");
    }
}
