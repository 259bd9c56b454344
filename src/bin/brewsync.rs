//! Brewsync CLI - keep a vector index in sync with brewing content
//!
//! Batch entry point for sync, cleanup, and analysis passes.
//!
//! # Examples
//!
//! ```bash
//! # Run a full sync pass
//! brewsync sync
//!
//! # Rehearse without writing anything durable
//! brewsync sync --dry-run
//!
//! # Remove records for deleted files
//! brewsync cleanup
//!
//! # Check content quality without embedding
//! brewsync validate --format json
//!
//! # Inspect a preset
//! brewsync config video_transcript
//! ```

use brewsync::cli::{output, run, Cli};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "brewsync=info".into()),
        )
        // stderr keeps stdout clean for --format json
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() {
    init_logging();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            output::print_error(&e.to_string());
            std::process::exit(1);
        }
    }
}
