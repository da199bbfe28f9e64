//! Upload payload types.

use std::path::Path;

use reqwest::multipart::{Form, Part};

use crate::error::{PredictionError, PredictionResult};

/// Multipart field name the prediction endpoint reads the upload from.
pub const FILE_FIELD: &str = "file";

const OCTET_STREAM: &str = "application/octet-stream";

/// A file chosen for prediction: raw bytes plus the name it was selected under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    file_name: String,
    bytes: Vec<u8>,
    content_type: Option<String>,
}

impl SelectedFile {
    /// Create a file from bytes already in memory.
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
            content_type: None,
        }
    }

    /// Read a file from disk, naming it after its final path component.
    pub async fn from_path(path: impl AsRef<Path>) -> PredictionResult<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                PredictionError::config(format!("{} has no file name", path.display()))
            })?;
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::new(file_name, bytes))
    }

    /// Override the MIME type sent with the part.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// MIME type for the part: the explicit one, else inferred from the extension.
    pub fn content_type(&self) -> &str {
        self.content_type
            .as_deref()
            .unwrap_or_else(|| content_type_for(&self.file_name))
    }

    /// Build the single-part form the `/predict` endpoint expects.
    pub fn into_form(self) -> PredictionResult<Form> {
        let content_type = self.content_type().to_string();
        let part = Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&content_type)
            .map_err(|e| {
                PredictionError::config(format!("invalid content type '{}': {}", content_type, e))
            })?;
        Ok(Form::new().part(FILE_FIELD, part))
    }
}

/// Infer a MIME type from a file name's extension.
pub fn content_type_for(file_name: &str) -> &'static str {
    let ext = match file_name.rsplit_once('.') {
        Some((_, ext)) => ext.to_ascii_lowercase(),
        None => return OCTET_STREAM,
    };

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "tif" | "tiff" => "image/tiff",
        _ => OCTET_STREAM,
    }
}
