//! Upload command - Send a single file to a OneDrive folder
//!
//! The Graph client does not implement uploads yet, so this command always
//! ends with the client's not-supported error once authentication succeeds.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use cloudpush_core::config::Config;
use cloudpush_graph::client::GraphClient;

use crate::commands::auth::acquire_token;
use crate::output::OutputFormat;

#[derive(Debug, Args)]
pub struct UploadCommand {
    /// Destination folder relative to the OneDrive root
    pub remote_folder: String,

    /// Local file to upload
    pub local_file: PathBuf,
}

impl UploadCommand {
    pub async fn execute(&self, config: &Config, _format: OutputFormat) -> Result<()> {
        if !self.local_file.is_file() {
            bail!("{} is not a regular file", self.local_file.display());
        }

        let token = acquire_token(config).await?;
        GraphClient::new(token)
            .upload_file(&self.remote_folder, &self.local_file)
            .await
            .with_context(|| {
                format!(
                    "Failed to upload {} to {}",
                    self.local_file.display(),
                    self.remote_folder
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn test_upload_rejects_missing_local_file() {
        let dir = TempDir::new().unwrap();
        let cmd = UploadCommand {
            remote_folder: "onedrive_test".to_string(),
            local_file: dir.path().join("missing.docx"),
        };
        let err = cmd
            .execute(&Config::default(), OutputFormat::Human)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not a regular file"));
    }
}
