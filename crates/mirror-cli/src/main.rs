//! bucket-mirror CLI
//!
//! Mirrors a local directory into a bucket, or a bucket into a directory.

mod cli;
mod commands;
mod console;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use error::{CliError, Result};

const USAGE_HINT: &str = "\
Usage: mirror <CONFIG> [sync|upload|download|diff]
Config file should contain:
{
  \"directory\": \"/path/to/directory\",
  \"bucket\": \"bucket-name\",
  \"accessKeyId\": \"AccessKey\",
  \"secretAccessKey\": \"AccessSecret\",
  \"region\": \"eu-west-1\",
  \"store\": { \"type\": \"directory\", \"root\": \"/path/to/buckets\" }
}";

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        if matches!(e, CliError::Config { .. }) {
            eprintln!("{}", USAGE_HINT.dimmed());
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let command = cli.command.unwrap_or(Commands::Sync);
    tracing::debug!(config = %cli.config.display(), ?command, "starting");

    runtime.block_on(execute_command(&cli.config, command))
}

async fn execute_command(config: &std::path::Path, command: Commands) -> Result<()> {
    match command {
        Commands::Sync => commands::run_sync(config).await,
        Commands::Upload => commands::run_upload(config).await,
        Commands::Download => commands::run_download(config).await,
        Commands::Diff { json } => commands::run_diff(config, json).await,
    }
}

/// Log to stderr; stdout carries the progress lines and `--json` output.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}
