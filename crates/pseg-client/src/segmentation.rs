//! Typed view over the reference segmentation service's response.
//!
//! [`PredictionClient::submit`](crate::PredictionClient::submit) returns a bare
//! JSON value. The deployed service answers with two PNG images encoded as
//! data URLs plus a label, or with a FastAPI `{"detail": ...}` message when it
//! declines to segment. This module classifies those shapes and decodes the
//! images; callers that only want the raw JSON can ignore it.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::Value;

use crate::error::{PredictionError, PredictionResult};

/// An image carried inline in the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    /// MIME type declared by the data URL
    pub content_type: String,
    /// Decoded image bytes
    pub bytes: Vec<u8>,
}

impl EncodedImage {
    /// Decode a `data:<mime>;base64,<payload>` URL.
    pub fn from_data_url(data_url: &str) -> PredictionResult<Self> {
        let rest = data_url
            .strip_prefix("data:")
            .ok_or_else(|| PredictionError::invalid_response("image is not a data URL"))?;
        let (meta, payload) = rest
            .split_once(',')
            .ok_or_else(|| PredictionError::invalid_response("data URL has no payload"))?;
        let params = meta.strip_suffix(";base64").ok_or_else(|| {
            PredictionError::invalid_response("data URL is not base64 encoded")
        })?;
        // Parameters such as `charset=` follow the MIME type
        let content_type = params.split(';').next().unwrap_or_default().trim();

        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| PredictionError::invalid_response(format!("bad base64 image: {}", e)))?;

        Ok(Self {
            content_type: if content_type.is_empty() {
                "text/plain".to_string()
            } else {
                content_type.to_string()
            },
            bytes,
        })
    }

    /// File extension matching the declared MIME type.
    pub fn extension(&self) -> &'static str {
        match self.content_type.as_str() {
            "image/png" => "png",
            "image/jpeg" | "image/jpg" => "jpg",
            "image/gif" => "gif",
            "image/webp" => "webp",
            "image/bmp" => "bmp",
            _ => "bin",
        }
    }

    /// Write the decoded bytes to `path`.
    pub async fn save_to(&self, path: impl AsRef<Path>) -> PredictionResult<()> {
        tokio::fs::write(path, &self.bytes).await?;
        Ok(())
    }
}

/// A successful segmentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentationResult {
    /// The uploaded image as the service resized it
    pub original_image: EncodedImage,
    /// The image with the predicted mask, box and label drawn on it
    pub segmentation_image: EncodedImage,
    /// Predicted class label
    pub predicted_labels: String,
}

/// What the service said about an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentationOutcome {
    Segmented(SegmentationResult),
    /// A `detail` message, e.g. "No potholes detected" or a validation error
    Detail(String),
}

impl SegmentationOutcome {
    /// Classify a response value.
    pub fn from_value(value: &Value) -> PredictionResult<Self> {
        let obj = value.as_object().ok_or_else(|| {
            PredictionError::invalid_response(format!(
                "expected a JSON object, got {}",
                kind(value)
            ))
        })?;

        if let (Some(original), Some(segmentation), Some(labels)) = (
            obj.get("original_image").and_then(Value::as_str),
            obj.get("segmentation_image").and_then(Value::as_str),
            obj.get("predicted_labels").and_then(Value::as_str),
        ) {
            return Ok(SegmentationOutcome::Segmented(SegmentationResult {
                original_image: EncodedImage::from_data_url(original)?,
                segmentation_image: EncodedImage::from_data_url(segmentation)?,
                predicted_labels: labels.to_string(),
            }));
        }

        match obj.get("detail") {
            Some(Value::String(detail)) => Ok(SegmentationOutcome::Detail(detail.clone())),
            // FastAPI validation errors carry a list of problems
            Some(detail @ Value::Array(_)) => Ok(SegmentationOutcome::Detail(detail.to_string())),
            _ => Err(PredictionError::invalid_response(
                "response has neither segmentation images nor a detail message",
            )),
        }
    }

    pub fn is_segmented(&self) -> bool {
        matches!(self, SegmentationOutcome::Segmented(_))
    }
}

/// Pull a human-readable message out of an error body.
///
/// FastAPI wraps `HTTPException` messages as `{"detail": "..."}`; anything
/// else is returned as text, cut down to a sane length.
pub(crate) fn error_detail(body: &[u8]) -> String {
    const MAX_DETAIL_LEN: usize = 512;

    if let Ok(Value::Object(obj)) = serde_json::from_slice::<Value>(body) {
        match obj.get("detail") {
            Some(Value::String(detail)) => return detail.clone(),
            Some(other) => return other.to_string(),
            None => {}
        }
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        return "<empty body>".to_string();
    }
    match text.char_indices().nth(MAX_DETAIL_LEN) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
