//! Client for the pothole segmentation prediction service.
//!
//! This crate provides:
//! - [`PredictionClient`], which uploads one file per call as a multipart
//!   `file` part to `{base_url}/predict` and returns the JSON reply
//! - Environment-driven configuration with an explicit non-2xx status policy
//! - A typed view of the reference service's segmentation response

pub mod client;
pub mod config;
pub mod error;
pub mod segmentation;
pub mod types;

#[cfg(test)]
mod client_tests;

pub use client::PredictionClient;
pub use config::{PredictionClientConfig, StatusPolicy, DEFAULT_BASE_URL};
pub use error::{PredictionError, PredictionResult};
pub use segmentation::{EncodedImage, SegmentationOutcome, SegmentationResult};
pub use types::SelectedFile;
