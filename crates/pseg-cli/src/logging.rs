//! Tracing setup and per-file spans.

use std::path::Path;

use tracing::Span;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_FILTER: &str = "pseg=info,pseg_cli=info,pseg_client=info";

/// Install the global subscriber.
///
/// Logs go to stderr so stdout stays clean JSON. `LOG_FORMAT=json` switches to
/// JSON log lines; `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}

/// Span wrapping everything done for one input file.
pub fn submission_span(path: &Path) -> Span {
    tracing::info_span!("submission", file = %path.display())
}
