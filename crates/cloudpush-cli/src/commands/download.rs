//! Download command - Fetch a single file from OneDrive

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use cloudpush_core::config::Config;
use cloudpush_graph::client::GraphClient;
use tracing::info;

use crate::commands::auth::acquire_token;
use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct DownloadCommand {
    /// Path of the file relative to the OneDrive root
    pub remote_path: String,

    /// Local directory to save into (defaults to `download.destination`)
    #[arg(long)]
    pub dest: Option<PathBuf>,
}

impl DownloadCommand {
    fn destination(&self, config: &Config) -> PathBuf {
        self.dest
            .clone()
            .unwrap_or_else(|| config.download.destination.clone())
    }

    pub async fn execute(&self, config: &Config, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(matches!(format, OutputFormat::Json));
        let dest = self.destination(config);

        tokio::fs::create_dir_all(&dest)
            .await
            .with_context(|| format!("Failed to create {}", dest.display()))?;

        let token = acquire_token(config).await?;
        let client = GraphClient::new(token);

        info!(remote_path = %self.remote_path, dest = %dest.display(), "Downloading");
        let saved = client
            .download_file(&self.remote_path, &dest)
            .await
            .with_context(|| format!("Failed to download {}", self.remote_path))?;

        if matches!(format, OutputFormat::Json) {
            formatter.print_json(&serde_json::json!({
                "success": true,
                "remote_path": self.remote_path,
                "saved_to": saved.display().to_string(),
            }));
        } else {
            formatter.success(&format!("Downloaded to {}", saved.display()));
        }
        Ok(())
    }
}
