//! Prediction service HTTP client.

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::{PredictionClientConfig, StatusPolicy};
use crate::error::{PredictionError, PredictionResult};
use crate::segmentation::{error_detail, SegmentationOutcome};
use crate::types::SelectedFile;

/// Client for the segmentation prediction service.
///
/// Cloning is cheap; clones share the underlying connection pool. Each
/// [`submit`](Self::submit) is an independent request with no coordination
/// between concurrent calls.
#[derive(Debug, Clone)]
pub struct PredictionClient {
    http: Client,
    predict_url: Url,
    status_policy: StatusPolicy,
}

impl PredictionClient {
    /// Create a new prediction client.
    pub fn new(config: PredictionClientConfig) -> PredictionResult<Self> {
        let predict_url = predict_url(&config.base_url)?;

        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(PredictionError::Transport)?;

        Ok(Self {
            http,
            predict_url,
            status_policy: config.status_policy,
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> PredictionResult<Self> {
        Self::new(PredictionClientConfig::from_env()?)
    }

    /// Fully resolved `/predict` endpoint.
    pub fn predict_url(&self) -> &Url {
        &self.predict_url
    }

    pub fn status_policy(&self) -> StatusPolicy {
        self.status_policy
    }

    /// Upload a file for prediction and return the decoded JSON response.
    ///
    /// Sends exactly one request. Transport failures (including timeouts and
    /// failures while reading the body) surface as
    /// [`PredictionError::Transport`] before any parsing; a body that is not
    /// JSON is [`PredictionError::Decode`]. Under [`StatusPolicy::Lenient`]
    /// the status code is never looked at.
    pub async fn submit(&self, file: SelectedFile) -> PredictionResult<Value> {
        let file_name = file.file_name().to_string();
        let size = file.len();
        let form = file.into_form()?;

        debug!(
            file = %file_name,
            bytes = size,
            url = %self.predict_url,
            "Sending prediction request"
        );

        let response = self
            .http
            .post(self.predict_url.clone())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if self.status_policy == StatusPolicy::Strict && !status.is_success() {
            let detail = error_detail(&body);
            warn!(
                file = %file_name,
                status = %status,
                "Prediction service rejected request: {}", detail
            );
            return Err(PredictionError::Status { status, detail });
        }

        let value: Value = serde_json::from_slice(&body)?;

        info!(
            file = %file_name,
            status = %status,
            response_bytes = body.len(),
            "Prediction response received"
        );

        Ok(value)
    }

    /// Upload a file and interpret the response as a segmentation outcome.
    pub async fn submit_segmentation(
        &self,
        file: SelectedFile,
    ) -> PredictionResult<SegmentationOutcome> {
        let value = self.submit(file).await?;
        SegmentationOutcome::from_value(&value)
    }
}

/// Resolve `{base_url}/predict`, keeping any path prefix on the base.
fn predict_url(base_url: &str) -> PredictionResult<Url> {
    let trimmed = base_url.trim().trim_end_matches('/');
    let url = Url::parse(&format!("{}/predict", trimmed))
        .map_err(|e| PredictionError::config(format!("invalid base URL '{}': {}", base_url, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(PredictionError::config(format!(
            "unsupported URL scheme '{}' in '{}'",
            other, base_url
        ))),
    }
}
