//! Pothole segmentation CLI binary.

use clap::Parser;
use futures::StreamExt;
use tracing::{error, info};

use pseg_cli::logging::init_tracing;
use pseg_cli::{submit_all, Args};
use pseg_client::{PredictionClient, PredictionClientConfig};

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for TLS/HTTPS)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing();

    // A policy given on the command line means the env value is never consulted
    let config = match PredictionClientConfig::from_env_with(args.status_policy()) {
        Ok(c) => args.apply_to(c),
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };

    let client = match PredictionClient::new(config) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to create prediction client: {}", e);
            std::process::exit(2);
        }
    };

    info!(
        "Submitting {} file(s) to {} (status policy: {})",
        args.files.len(),
        client.predict_url(),
        client.status_policy()
    );

    let mut reports = std::pin::pin!(submit_all(
        client,
        args.files.clone(),
        args.out_dir.clone(),
        usize::from(args.concurrency),
    ));

    let mut failures = 0usize;
    while let Some(report) = reports.next().await {
        match report.to_json() {
            Some(doc) => match serde_json::to_string_pretty(&doc) {
                Ok(text) => println!("{}", text),
                Err(e) => {
                    error!("Failed to render output for {}: {}", report.path.display(), e);
                    failures += 1;
                }
            },
            None => {
                if let Err(e) = &report.outcome {
                    error!("{:#}", e);
                }
                failures += 1;
            }
        }
    }

    if failures > 0 {
        error!("{} of {} submission(s) failed", failures, args.files.len());
        std::process::exit(1);
    }
}
