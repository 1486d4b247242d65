use std::{env, time::Duration};

use anyhow::{anyhow, bail};
use telemetry::LogFormat;

const DEFAULT_PORT: u16 = 5001;
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
    /// Creates an Environment from the `APP_ENV` environment variable
    ///
    /// # Errors
    ///
    /// Returns an error if `APP_ENV` contains an invalid value
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

    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        match self {
            Self::Production | Self::Staging => LogFormat::Json,
            Self::Development => LogFormat::Pretty,
        }
    }

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
        env::var("PORT").map_or(Ok(DEFAULT_PORT), |port| {
            port.trim()
                .parse()
                .map_err(|err| anyhow!("Invalid PORT `{port}`: {err}"))
        })
    }

    /// Deadline for handling one inbound request
    ///
    /// # Errors
    ///
    /// Returns an error if `REQUEST_TIMEOUT_SECS` is not a number
    pub fn request_timeout(&self) -> anyhow::Result<Duration> {
        env::var("REQUEST_TIMEOUT_SECS").map_or(
            Ok(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)),
            |secs| {
                secs.trim()
                    .parse()
                    .map(Duration::from_secs)
                    .map_err(|err| anyhow!("Invalid REQUEST_TIMEOUT_SECS `{secs}`: {err}"))
            },
        )
    }

    /// Replaces the simulated latency of every operation when set
    ///
    /// # Errors
    ///
    /// Returns an error if `PROCESSING_DELAY_MS` is not a number
    pub fn processing_delay(&self) -> anyhow::Result<Option<Duration>> {
        env::var("PROCESSING_DELAY_MS").map_or(Ok(None), |millis| {
            millis
                .trim()
                .parse()
                .map(|millis| Some(Duration::from_millis(millis)))
                .map_err(|err| anyhow!("Invalid PROCESSING_DELAY_MS `{millis}`: {err}"))
        })
    }
}
