//! CloudPush CLI - Command-line interface for CloudPush
//!
//! Provides commands for:
//! - Authentication with OneDrive (device-code flow)
//! - Pushing a local directory into a mounted iCloud Drive folder
//! - Checking which local files differ from that folder
//! - Downloading and uploading single OneDrive files

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cloudpush_core::config::Config;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{
    auth::AuthCommand, check::CheckCommand, download::DownloadCommand, push::PushCommand,
    upload::UploadCommand,
};
use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(
    name = "cloudpush",
    version,
    about = "Push local files to iCloud Drive and move files to and from OneDrive"
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Authentication commands
    #[command(subcommand)]
    Auth(AuthCommand),
    /// Push a local directory into a mounted iCloud Drive folder
    Push(PushCommand),
    /// Report which local files differ from a mounted iCloud Drive folder
    Check(CheckCommand),
    /// Download a file from OneDrive
    Download(DownloadCommand),
    /// Upload a file to OneDrive
    Upload(UploadCommand),
}

/// Picks the log filter directive: `-v`/`-vv` win over the configured level
fn log_level(verbose: u8, config: &Config) -> String {
    match verbose {
        0 => config.logging.level.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let config = Config::load_or_default(&config_path);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level(cli.verbose, &config)));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    debug!(config_path = %config_path.display(), "Loaded configuration");
    for error in config.validate() {
        warn!(%error, "Invalid configuration value");
    }

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };

    match cli.command {
        Commands::Auth(cmd) => cmd.execute(&config, format).await,
        Commands::Push(cmd) => cmd.execute(format).await,
        Commands::Check(cmd) => cmd.execute(format).await,
        Commands::Download(cmd) => cmd.execute(&config, format).await,
        Commands::Upload(cmd) => cmd.execute(&config, format).await,
    }
}
