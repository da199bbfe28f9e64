//! Command-line front end for the pothole segmentation service.
//!
//! Stands in for the file-picker UI: reads images from disk, submits each one
//! through [`pseg_client::PredictionClient`] and reports the JSON replies.

pub mod args;
pub mod logging;
pub mod output;
pub mod submit;

pub use args::Args;
pub use submit::{submit_all, FileReport, Submission};
