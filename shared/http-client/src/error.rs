use reqwest::{Method, StatusCode};
use thiserror::Error;

/// Failure of a single outbound call.
///
/// Every variant is terminal for the call that produced it: nothing is
/// retried and no partial value is returned.
#[derive(Debug, Error)]
pub enum HttpClientError {
    /// The underlying reqwest client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// The request path could not be joined onto the base URL
    #[error("invalid request path `{path}`: {source}")]
    InvalidUrl {
        path: String,
        #[source]
        source: url::ParseError,
    },

    /// A path segment cannot be placed in a URL without changing its meaning
    #[error("path segment `{0}` cannot be encoded")]
    InvalidSegment(String),

    /// The request body could not be serialized to JSON
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// Connection, timeout or other transport-level failure
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest_middleware::Error),

    /// The downstream service answered with a non-2xx status
    #[error("{method} {url} failed with status {status}")]
    Status {
        method: Method,
        url: String,
        status: StatusCode,
    },

    /// The response body could not be read off the wire
    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),

    /// The response body was not valid JSON for the expected type
    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The caller cancelled the call before it completed
    #[error("request cancelled")]
    Cancelled,
}

impl HttpClientError {
    /// Whether the call ended because the caller cancelled it
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Status returned by the downstream service, if it answered at all
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
