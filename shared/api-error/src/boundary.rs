use common_types::ErrorCode;
use telemetry::Tracer;
use tracing::Span;

use crate::{AppError, Failure, Lookup};

/// Error policy of one HTTP endpoint.
///
/// Handlers declare a `const` boundary and pass every service outcome
/// through it exactly once. Deliberate application errors reach the client
/// unchanged; anything else is reported as a 500 carrying the endpoint's
/// own message and code, so internal details never leave the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boundary {
    /// Span name for the endpoint
    pub operation: &'static str,
    pub method: &'static str,
    pub route: &'static str,
    /// Message returned for unexpected failures
    pub message: &'static str,
    /// Code returned for unexpected failures
    pub error_code: ErrorCode,
}

impl Boundary {
    /// Opens the endpoint span
    #[must_use]
    pub fn span(&self, tracer: &Tracer) -> Span {
        let span = tracer.span(self.operation);
        span.record("http.method", self.method);
        span.record("http.route", self.route);
        span
    }

    /// Maps a failure to the error the client will see
    #[must_use]
    pub fn classify(&self, failure: Failure) -> AppError {
        match failure {
            Failure::Application(err) => err,
            Failure::Unexpected(_) => AppError::new(self.message).with_code(self.error_code),
        }
    }

    /// Classifies a failed outcome and marks the endpoint span
    ///
    /// # Errors
    ///
    /// Returns the classified [`AppError`] if `outcome` is a failure
    pub fn resolve<T>(&self, span: &Span, outcome: Result<T, Failure>) -> Result<T, AppError> {
        match outcome {
            Ok(value) => {
                telemetry::record_success(span);
                Ok(value)
            }
            Err(failure) => Err(self.fail(span, failure)),
        }
    }

    /// Like [`Self::resolve`], turning [`Lookup::NotFound`] into `not_found()`
    ///
    /// # Errors
    ///
    /// Returns the classified [`AppError`] on failure, or `not_found()` when
    /// the record does not exist
    pub fn resolve_lookup<T>(
        &self,
        span: &Span,
        outcome: Result<Lookup<T>, Failure>,
        not_found: impl FnOnce() -> AppError,
    ) -> Result<T, AppError> {
        match outcome {
            Ok(Lookup::Found(value)) => {
                telemetry::record_success(span);
                Ok(value)
            }
            Ok(Lookup::NotFound) => {
                let err = not_found();
                telemetry::record_failure(span, &err);
                tracing::warn!(parent: span, "{} {}: {err}", self.method, self.route);
                Err(err)
            }
            Err(failure) => Err(self.fail(span, failure)),
        }
    }

    fn fail(&self, span: &Span, failure: Failure) -> AppError {
        telemetry::record_failure(span, &failure);
        tracing::error!(
            parent: span,
            error = %failure,
            "{} {} failed: {}",
            self.method,
            self.route,
            self.message
        );
        self.classify(failure)
    }
}
