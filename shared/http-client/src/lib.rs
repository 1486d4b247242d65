//! Typed JSON-over-HTTP client used for service-to-service calls

#![deny(clippy::all, clippy::pedantic, clippy::nursery, dead_code)]

mod client;
mod error;

pub use client::{
    HttpClientConfig, TypedHttpClient, DEFAULT_REQUEST_TIMEOUT_SECS,
    MAX_IDLE_CONNECTIONS_PER_HOST,
};
pub use error::HttpClientError;
pub use reqwest::{Method, StatusCode, Url};
pub use tokio_util::sync::CancellationToken;
