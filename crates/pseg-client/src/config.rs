//! Prediction client configuration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::PredictionError;

/// Public deployment of the segmentation service.
pub const DEFAULT_BASE_URL: &str = "https://pothole-segmentation-app.onrender.com";
/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// How non-2xx responses are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusPolicy {
    /// Non-2xx responses fail with [`PredictionError::Status`].
    #[default]
    Strict,
    /// Status is ignored and the body is decoded as JSON regardless.
    Lenient,
}

impl FromStr for StatusPolicy {
    type Err = PredictionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(StatusPolicy::Strict),
            "lenient" => Ok(StatusPolicy::Lenient),
            other => Err(PredictionError::config(format!(
                "unknown status policy '{}', expected 'strict' or 'lenient'",
                other
            ))),
        }
    }
}

impl fmt::Display for StatusPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusPolicy::Strict => write!(f, "strict"),
            StatusPolicy::Lenient => write!(f, "lenient"),
        }
    }
}

/// Configuration for the prediction client.
#[derive(Debug, Clone)]
pub struct PredictionClientConfig {
    /// Base URL of the prediction service (without `/predict`)
    pub base_url: String,
    /// Request timeout, covering connect through full body read
    pub timeout: Duration,
    /// Treatment of non-2xx responses
    pub status_policy: StatusPolicy,
}

impl Default for PredictionClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            status_policy: StatusPolicy::Strict,
        }
    }
}

impl PredictionClientConfig {
    /// Create a config pointing at `base_url` with default settings.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Create config from environment variables.
    ///
    /// Unset variables fall back to defaults; an unrecognised
    /// `PREDICTION_STATUS_POLICY` is an error rather than a silent default.
    pub fn from_env() -> Result<Self, PredictionError> {
        Self::from_env_with(None)
    }

    /// Create config from environment variables with a pinned status policy.
    ///
    /// When `status_policy` is `Some`, `PREDICTION_STATUS_POLICY` is not read,
    /// so a caller-supplied policy wins even over a malformed env value.
    pub fn from_env_with(status_policy: Option<StatusPolicy>) -> Result<Self, PredictionError> {
        let status_policy = match status_policy {
            Some(policy) => policy,
            None => match std::env::var("PREDICTION_STATUS_POLICY") {
                Ok(s) if !s.trim().is_empty() => s.parse()?,
                _ => StatusPolicy::default(),
            },
        };

        Ok(Self {
            base_url: std::env::var("PREDICTION_API_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            // Zero would make every request time out immediately
            timeout: Duration::from_secs(
                std::env::var("PREDICTION_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .filter(|&secs: &u64| secs > 0)
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            status_policy,
        })
    }

    /// Returns a new config with the given timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns a new config with the given status policy.
    pub fn with_status_policy(mut self, status_policy: StatusPolicy) -> Self {
        self.status_policy = status_policy;
        self
    }
}
