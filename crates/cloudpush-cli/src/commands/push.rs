//! Push command - Copy a local directory into a mounted iCloud Drive folder
//!
//! Provides the `cloudpush push` CLI command which:
//! 1. Opens the destination as a [`MountedFolder`]
//! 2. Runs the push dispatcher over the local directory
//! 3. Reports completion; individual upload failures only appear in the log

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use cloudpush_sync::{push_folder, MountedFolder, UPLOAD_WORKERS};
use tracing::info;

use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct PushCommand {
    /// Local directory whose files are pushed
    pub local_dir: PathBuf,

    /// iCloud Drive folder on the local filesystem
    pub icloud_dir: PathBuf,
}

impl PushCommand {
    pub async fn execute(&self, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(matches!(format, OutputFormat::Json));

        let folder = MountedFolder::open(&self.icloud_dir).with_context(|| {
            format!("Cannot use {} as iCloud folder", self.icloud_dir.display())
        })?;

        info!(
            local_dir = %self.local_dir.display(),
            icloud_dir = %self.icloud_dir.display(),
            workers = UPLOAD_WORKERS,
            "Starting push"
        );

        let folder = Arc::new(folder);
        push_folder(&self.local_dir, folder.clone())
            .await
            .with_context(|| format!("Push from {} failed", self.local_dir.display()))?;

        if matches!(format, OutputFormat::Json) {
            formatter.print_json(&serde_json::json!({
                "success": true,
                "local_dir": self.local_dir.display().to_string(),
                "icloud_dir": folder.root().display().to_string(),
            }));
        } else {
            formatter.success(&format!(
                "Pushed {} to {}",
                self.local_dir.display(),
                folder.root().display()
            ));
        }
        Ok(())
    }
}
