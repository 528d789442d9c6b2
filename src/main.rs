//! mediaprep
//!
//! Batch preparation of the portfolio website's media assets.
//!
//! # Usage
//!
//! ```bash
//! mediaprep ios-videos
//! mediaprep optimize-images --skip-carousel
//! mediaprep optimize-videos -i assets/clips -o assets/rendered --bitrate 6M
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;

use mediaprep::cli::{commands, Cli};
use mediaprep::utils::logging::init_logging;

/// Main entry point for the mediaprep CLI
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.logging_config())?;
    info!("Starting mediaprep {}", env!("CARGO_PKG_VERSION"));

    commands::execute(&cli).await?;

    info!("mediaprep completed successfully");
    Ok(())
}
