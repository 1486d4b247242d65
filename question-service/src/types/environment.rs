//! Environment configuration for different deployment stages

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use telemetry::LogFormat;
use url::Url;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_ANSWER_API_BASE_URL: &str = "http://localhost:5001";
const DEFAULT_ANSWER_API_TIMEOUT_SECS: u64 = 30;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Application environment configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Environment {
    /// Production environment
    Production,
    /// Staging environment
    Staging,
    /// Local development
    Development,
}

impl Environment {
    /// Creates an Environment from the `APP_ENV` environment variable,
    /// defaulting to development
    ///
    /// # Errors
    ///
    /// Returns an error if `APP_ENV` contains an unknown value
    pub fn from_env() -> anyhow::Result<Self> {
        let env = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .trim()
            .to_lowercase();

        match env.as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" => Ok(Self::Development),
            _ => bail!("Invalid environment: {env}"),
        }
    }

    /// Whether to show API docs
    #[must_use]
    pub const fn show_api_docs(&self) -> bool {
        matches!(self, Self::Development | Self::Staging)
    }

    /// JSON logs everywhere except local development
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        match self {
            Self::Production | Self::Staging => LogFormat::Json,
            Self::Development => LogFormat::Pretty,
        }
    }

    /// Filter used when `RUST_LOG` is not set
    #[must_use]
    pub const fn default_log_directive(&self) -> &'static str {
        match self {
            Self::Production | Self::Staging => "info",
            Self::Development => "debug",
        }
    }

    /// Port the HTTP server listens on
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` is not a valid port number
    pub fn port(&self) -> anyhow::Result<u16> {
        parse_var("PORT", DEFAULT_PORT)
    }

    /// Base URL of the answer service
    ///
    /// # Errors
    ///
    /// Returns an error if `ANSWER_API_BASE_URL` is not a valid URL, or is
    /// missing outside of development
    pub fn answer_api_base_url(&self) -> anyhow::Result<Url> {
        let raw = match (self, env::var("ANSWER_API_BASE_URL")) {
            (_, Ok(value)) => value,
            (Self::Development, Err(_)) => DEFAULT_ANSWER_API_BASE_URL.to_string(),
            (Self::Production | Self::Staging, Err(_)) => {
                bail!("ANSWER_API_BASE_URL environment variable is not set")
            }
        };

        Url::parse(raw.trim()).with_context(|| format!("Invalid ANSWER_API_BASE_URL: {raw}"))
    }

    /// Timeout applied to every call to the answer service
    ///
    /// # Errors
    ///
    /// Returns an error if `ANSWER_API_TIMEOUT_SECS` is not a number
    pub fn answer_api_timeout(&self) -> anyhow::Result<Duration> {
        parse_var("ANSWER_API_TIMEOUT_SECS", DEFAULT_ANSWER_API_TIMEOUT_SECS)
            .map(Duration::from_secs)
    }

    /// Deadline for handling one inbound request
    ///
    /// # Errors
    ///
    /// Returns an error if `REQUEST_TIMEOUT_SECS` is not a number
    pub fn request_timeout(&self) -> anyhow::Result<Duration> {
        parse_var("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS).map(Duration::from_secs)
    }

    /// Simulated work for every service operation, if overridden
    ///
    /// # Errors
    ///
    /// Returns an error if `PROCESSING_DELAY_MS` is not a number
    pub fn processing_delay(&self) -> anyhow::Result<Option<Duration>> {
        env::var("PROCESSING_DELAY_MS")
            .ok()
            .map(|millis| {
                millis
                    .trim()
                    .parse()
                    .map(Duration::from_millis)
                    .map_err(|err| anyhow!("Invalid PROCESSING_DELAY_MS `{millis}`: {err}"))
            })
            .transpose()
    }
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|err| anyhow!("Invalid {name} `{value}`: {err}")),
        Err(_) => Ok(default),
    }
}
