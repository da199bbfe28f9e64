//! Submitting files and collecting per-file reports.

use std::path::{Path, PathBuf};

use anyhow::Context;
use futures::stream::{self, Stream, StreamExt};
use pseg_client::{PredictionClient, SegmentationOutcome, SelectedFile};
use serde_json::{json, Value};
use tracing::{info, warn, Instrument};

use crate::logging::submission_span;
use crate::output::write_segmentation;

/// A successful submission.
#[derive(Debug)]
pub struct Submission {
    /// JSON returned by the service
    pub response: Value,
    /// Images written to the output directory, if any
    pub saved: Vec<PathBuf>,
}

/// Result of processing one input file.
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: anyhow::Result<Submission>,
}

impl FileReport {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// The document printed to stdout for a successful file.
    pub fn to_json(&self) -> Option<Value> {
        self.outcome.as_ref().ok().map(|submission| {
            json!({
                "file": self.path.display().to_string(),
                "response": submission.response,
                "saved": submission
                    .saved
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>(),
            })
        })
    }
}

/// Submit every file, at most `concurrency` at a time.
///
/// Reports are yielded in input order. Each file is an independent request;
/// one failure does not stop the others.
pub fn submit_all(
    client: PredictionClient,
    files: Vec<PathBuf>,
    out_dir: Option<PathBuf>,
    concurrency: usize,
) -> impl Stream<Item = FileReport> {
    stream::iter(files.into_iter().enumerate())
        .map(move |(index, path)| {
            let client = client.clone();
            let out_dir = out_dir.clone();
            let span = submission_span(&path);
            async move {
                let outcome = process_file(&client, index, &path, out_dir.as_deref()).await;
                FileReport { path, outcome }
            }
            .instrument(span)
        })
        .buffered(concurrency.max(1))
}

async fn process_file(
    client: &PredictionClient,
    index: usize,
    path: &Path,
    out_dir: Option<&Path>,
) -> anyhow::Result<Submission> {
    let file = SelectedFile::from_path(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;

    let response = client
        .submit(file)
        .await
        .with_context(|| format!("prediction failed for {}", path.display()))?;

    let saved = match out_dir {
        Some(dir) => save_outputs(dir, index, path, &response).await?,
        None => Vec::new(),
    };

    Ok(Submission { response, saved })
}

async fn save_outputs(
    out_dir: &Path,
    index: usize,
    source: &Path,
    response: &Value,
) -> anyhow::Result<Vec<PathBuf>> {
    match SegmentationOutcome::from_value(response) {
        Ok(SegmentationOutcome::Segmented(result)) => {
            info!("Predicted label: {}", result.predicted_labels);
            write_segmentation(out_dir, index, source, &result).await
        }
        Ok(SegmentationOutcome::Detail(detail)) => {
            info!("No segmentation returned: {}", detail);
            Ok(Vec::new())
        }
        Err(e) => {
            warn!("Response is not a segmentation result, nothing saved: {}", e);
            Ok(Vec::new())
        }
    }
}
