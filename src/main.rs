//! Chart engine CLI application.

mod cli;

use anyhow::{Context, Result};
use chart_config::load_or_default;
use chart_monitor::setup_logging;
use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_or_default(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    // Setup logging
    let level = cli
        .log_level
        .map(|l| l.as_str().to_string())
        .unwrap_or_else(|| config.logging.level.clone());
    let _log_guard = setup_logging(
        &level,
        cli.json_logs || config.logging.is_json(),
        config.logging.file.as_deref(),
    );

    // Execute command
    match cli.command {
        Commands::Replay(args) => cli::commands::replay::run(args, &config).await,
        Commands::Indicators(args) => cli::commands::indicators::run(args, &config).await,
        Commands::Hover(args) => cli::commands::hover::run(args, &config).await,
        Commands::ValidateConfig(args) => cli::commands::validate::run(args, &cli.config).await,
    }
}
