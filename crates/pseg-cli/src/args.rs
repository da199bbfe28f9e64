//! Command-line arguments.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use pseg_client::{PredictionClientConfig, StatusPolicy};

/// Upload images to the pothole segmentation service and print its replies.
#[derive(Debug, Parser)]
#[command(name = "pseg", version, about)]
pub struct Args {
    /// Image files to submit
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Base URL of the prediction service (overrides PREDICTION_API_URL)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Request timeout in seconds (overrides PREDICTION_TIMEOUT)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Treatment of non-2xx responses: strict or lenient (overrides PREDICTION_STATUS_POLICY)
    #[arg(long = "status-policy", value_name = "POLICY", conflicts_with = "lenient")]
    pub policy: Option<StatusPolicy>,

    /// Shorthand for `--status-policy lenient`
    #[arg(long)]
    pub lenient: bool,

    /// Write decoded original and segmentation images into this directory
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Maximum number of requests in flight
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    pub concurrency: u16,
}

impl Args {
    /// Status policy chosen on the command line, if any.
    pub fn status_policy(&self) -> Option<StatusPolicy> {
        if self.lenient {
            Some(StatusPolicy::Lenient)
        } else {
            self.policy
        }
    }

    /// Layer command-line overrides on top of an environment-derived config.
    pub fn apply_to(&self, mut config: PredictionClientConfig) -> PredictionClientConfig {
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(secs) = self.timeout {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(policy) = self.status_policy() {
            config.status_policy = policy;
        }
        config
    }
}
