use std::time::Duration;

use reqwest::{header, Client, Method, Url};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use serde::{de::DeserializeOwned, Serialize};
use telemetry::Tracer;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, Span};

use crate::HttpClientError;

/// Default request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
/// Maximum number of idle connections to maintain per host
pub const MAX_IDLE_CONNECTIONS_PER_HOST: usize = 10;

/// Connection settings, fixed for the lifetime of a [`TypedHttpClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpClientConfig {
    /// Base address every request path is resolved against
    pub base_url: Url,
    /// Timeout applied to every request made by the client
    pub timeout: Duration,
    /// Idle connections kept in the pool per host
    pub max_idle_per_host: usize,
}

impl HttpClientConfig {
    /// Config with the default timeout and pool size
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            max_idle_per_host: MAX_IDLE_CONNECTIONS_PER_HOST,
        }
    }

    /// Overrides the request timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// HTTP client that speaks JSON to one downstream base address.
///
/// Cloning is cheap and clones share the same connection pool, so one
/// instance per downstream service is enough for any number of concurrent
/// requests. Each call opens its own span, is attempted exactly once and
/// aborts as soon as its cancellation token fires.
#[derive(Clone)]
pub struct TypedHttpClient {
    base_url: Url,
    http_client: ClientWithMiddleware,
    tracer: Tracer,
}

impl TypedHttpClient {
    /// Creates a new client
    ///
    /// # Errors
    ///
    /// Returns [`HttpClientError::Build`] if the reqwest client cannot be created
    pub fn new(config: &HttpClientConfig, tracer: Tracer) -> Result<Self, HttpClientError> {
        let reqwest_client = Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(config.max_idle_per_host)
            .build()
            .map_err(HttpClientError::Build)?;

        // Propagates the current trace context as `traceparent` on every request
        let http_client = ClientBuilder::new(reqwest_client)
            .with(TracingMiddleware::default())
            .build();

        Ok(Self {
            base_url: config.base_url.clone(),
            http_client,
            tracer,
        })
    }

    /// Base address requests are resolved against
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds an absolute request path from raw segments.
    ///
    /// Each segment is percent-encoded, so reserved characters in ids stay
    /// inside their segment instead of changing the path or the query.
    ///
    /// # Errors
    ///
    /// Returns [`HttpClientError::InvalidSegment`] for an empty or dot segment,
    /// which cannot be addressed unambiguously
    pub fn segment_path(&self, segments: &[&str]) -> Result<String, HttpClientError> {
        if let Some(segment) = segments
            .iter()
            .find(|segment| matches!(**segment, "" | "." | ".."))
        {
            return Err(HttpClientError::InvalidSegment((*segment).to_string()));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| HttpClientError::InvalidSegment(self.base_url.to_string()))?
            .clear()
            // `%` is left alone by the URL parser, so escape it first
            .extend(segments.iter().map(|segment| segment.replace('%', "%25")));

        Ok(url.path().to_string())
    }

    /// Sends a GET request and decodes the JSON response
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, undecodable
    /// body or cancellation
    pub async fn get<TResponse>(
        &self,
        path: &str,
        cancel: &CancellationToken,
    ) -> Result<TResponse, HttpClientError>
    where
        TResponse: DeserializeOwned,
    {
        self.call(Method::GET, path, None::<&()>, cancel, decode::<TResponse>)
            .await
    }

    /// Sends `body` as JSON in a POST request and decodes the JSON response
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be encoded, on transport failure,
    /// non-2xx status, undecodable body or cancellation
    pub async fn post<TRequest, TResponse>(
        &self,
        path: &str,
        body: &TRequest,
        cancel: &CancellationToken,
    ) -> Result<TResponse, HttpClientError>
    where
        TRequest: Serialize + Sync + ?Sized,
        TResponse: DeserializeOwned,
    {
        self.call(Method::POST, path, Some(body), cancel, decode::<TResponse>)
            .await
    }

    /// Sends `body` as JSON in a PUT request and decodes the JSON response
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be encoded, on transport failure,
    /// non-2xx status, undecodable body or cancellation
    pub async fn put<TRequest, TResponse>(
        &self,
        path: &str,
        body: &TRequest,
        cancel: &CancellationToken,
    ) -> Result<TResponse, HttpClientError>
    where
        TRequest: Serialize + Sync + ?Sized,
        TResponse: DeserializeOwned,
    {
        self.call(Method::PUT, path, Some(body), cancel, decode::<TResponse>)
            .await
    }

    /// Sends a DELETE request, ignoring any response body
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status or cancellation
    pub async fn delete(&self, path: &str, cancel: &CancellationToken) -> Result<(), HttpClientError> {
        self.call(Method::DELETE, path, None::<&()>, cancel, |_| Ok(()))
            .await
    }

    async fn call<B, T, F>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        cancel: &CancellationToken,
        read: F,
    ) -> Result<T, HttpClientError>
    where
        B: Serialize + Sync + ?Sized,
        F: FnOnce(&[u8]) -> Result<T, HttpClientError> + Send,
    {
        let span = self.tracer.span(span_name(&method));
        span.record("http.method", method.as_str());
        span.record("http.route", path);

        let outcome = self
            .exchange(&method, path, body, cancel, read, &span)
            .instrument(span.clone())
            .await;

        // The span must carry the outcome before the caller sees it
        match &outcome {
            Ok(_) => {
                telemetry::record_success(&span);
                tracing::info!(parent: &span, "{method} request to {path} completed successfully");
            }
            Err(err) => {
                telemetry::record_failure(&span, err);
                tracing::error!(parent: &span, error = %err, "HTTP {method} request failed for {path}");
            }
        }
        drop(span);

        outcome
    }

    async fn exchange<B, T, F>(
        &self,
        method: &Method,
        path: &str,
        body: Option<&B>,
        cancel: &CancellationToken,
        read: F,
        span: &Span,
    ) -> Result<T, HttpClientError>
    where
        B: Serialize + Sync + ?Sized,
        F: FnOnce(&[u8]) -> Result<T, HttpClientError> + Send,
    {
        tracing::info!("Sending {method} request to {path}");

        if cancel.is_cancelled() {
            return Err(HttpClientError::Cancelled);
        }

        let url = self
            .base_url
            .join(path)
            .map_err(|source| HttpClientError::InvalidUrl {
                path: path.to_string(),
                source,
            })?;
        span.record("http.url", url.as_str());

        let mut request = self.http_client.request(method.clone(), url.clone());
        if let Some(body) = body {
            let json_body = serde_json::to_string(body).map_err(HttpClientError::Encode)?;
            request = request
                .header(header::CONTENT_TYPE, "application/json")
                .body(json_body);
        }

        // Dropping the send future aborts the in-flight request
        let response = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(HttpClientError::Cancelled),
            response = request.send() => response?,
        };

        let status = response.status();
        span.record("http.status_code", status.as_u16());
        if !status.is_success() {
            return Err(HttpClientError::Status {
                method: method.clone(),
                url: url.to_string(),
                status,
            });
        }

        let bytes = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(HttpClientError::Cancelled),
            bytes = response.bytes() => bytes.map_err(HttpClientError::Body)?,
        };

        read(&bytes)
    }
}

fn span_name(method: &Method) -> &'static str {
    match method.as_str() {
        "GET" => "HTTP GET",
        "POST" => "HTTP POST",
        "PUT" => "HTTP PUT",
        "DELETE" => "HTTP DELETE",
        _ => "HTTP",
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, HttpClientError> {
    serde_json::from_slice(body).map_err(HttpClientError::Decode)
}
