//! macspoof - MAC address spoofing tool
//!
//! Main entry point: initializes logging, loads configuration, and
//! dispatches the parsed command line.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use macspoof::{cli, cli::Cli, config::AppConfig, logging};
use tracing::debug;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).await?;
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    logging::init_logging(&config.logging)?;

    debug!(?cli, "parsed command line");
    cli::run(cli, config).await
}
