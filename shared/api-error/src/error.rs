//! Application errors and the failure type handed to the HTTP boundary

use std::error::Error as StdError;

use aide::OperationOutput;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common_types::{ErrorCode, ErrorResponse};
use thiserror::Error;

/// An error that already knows how it should look to an HTTP client
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AppError {
    status: StatusCode,
    error_code: Option<ErrorCode>,
    message: String,
}

impl AppError {
    /// Creates an error with status 500 and no error code
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error_code: None,
            message: message.into(),
        }
    }

    /// 404 with the given code
    #[must_use]
    pub fn not_found(error_code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(message)
            .with_status(StatusCode::NOT_FOUND)
            .with_code(error_code)
    }

    /// 400 with the given code
    #[must_use]
    pub fn bad_request(error_code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(message)
            .with_status(StatusCode::BAD_REQUEST)
            .with_code(error_code)
    }

    #[must_use]
    pub const fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub const fn with_code(mut self, error_code: ErrorCode) -> Self {
        self.error_code = Some(error_code);
        self
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub const fn error_code(&self) -> Option<ErrorCode> {
        self.error_code
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    fn body(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.message.clone(),
            error_code: self.error_code,
            status_code: self.status.as_u16(),
        }
    }
}

/// Rendering does not log; whoever builds the error logs it with its cause
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body())).into_response()
    }
}

impl OperationOutput for AppError {
    type Inner = ErrorResponse;

    fn operation_response(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Option<aide::openapi::Response> {
        Json::<ErrorResponse>::operation_response(ctx, operation)
    }
}

/// Outcome of a failed service operation, as seen by the boundary.
///
/// `Application` errors were produced deliberately and reach the client as
/// they are. `Unexpected` covers everything else and is replaced by the
/// boundary's own 500 error.
#[derive(Debug, Error)]
pub enum Failure {
    #[error(transparent)]
    Application(#[from] AppError),

    #[error(transparent)]
    Unexpected(Box<dyn StdError + Send + Sync>),
}

impl Failure {
    /// Wraps any error as an unexpected failure
    pub fn unexpected<E>(err: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        Self::Unexpected(err.into())
    }
}
