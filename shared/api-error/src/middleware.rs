//! Failures raised by tower middleware rather than by a handler

use axum::{http::StatusCode, BoxError};
use common_types::ErrorCode;
use tower::timeout::error::Elapsed;

use crate::AppError;

/// Renders a middleware error in the error envelope.
///
/// Meant for a `HandleErrorLayer` wrapping `tower::timeout::TimeoutLayer`.
/// By the time this runs the handler future has been dropped, which cancels
/// any downstream call it had in flight.
#[must_use]
pub fn middleware_error(err: &BoxError) -> AppError {
    if err.is::<Elapsed>() {
        tracing::warn!("Request exceeded its deadline");
        return AppError::new("Request timed out")
            .with_status(StatusCode::REQUEST_TIMEOUT)
            .with_code(ErrorCode::RequestTimeout);
    }

    tracing::error!(error = %err, "Unhandled middleware error");
    AppError::new("Internal server error").with_code(ErrorCode::InternalError)
}
