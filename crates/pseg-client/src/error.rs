//! Prediction client error types.

use reqwest::StatusCode;
use thiserror::Error;

pub type PredictionResult<T> = Result<T, PredictionError>;

#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode response as JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Prediction service returned {status}: {detail}")]
    Status { status: StatusCode, detail: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PredictionError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// True if the HTTP exchange itself never completed.
    pub fn is_transport(&self) -> bool {
        matches!(self, PredictionError::Transport(_))
    }

    /// True if a body was received but was not valid JSON.
    pub fn is_decode(&self) -> bool {
        matches!(self, PredictionError::Decode(_))
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            PredictionError::Status { status, .. } => Some(*status),
            PredictionError::Transport(e) => e.status(),
            _ => None,
        }
    }
}
