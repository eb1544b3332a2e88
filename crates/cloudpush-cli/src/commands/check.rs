//! Check command - Report which local files differ from a mounted iCloud Drive folder
//!
//! Nothing is uploaded. Each regular file in the local directory is reported
//! as missing, diverged or current.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use cloudpush_sync::{compare_folder, FileComparison, MountedFolder};

use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Local directory to compare
    pub local_dir: PathBuf,

    /// iCloud Drive folder on the local filesystem
    pub icloud_dir: PathBuf,
}

impl CheckCommand {
    pub async fn execute(&self, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(matches!(format, OutputFormat::Json));
        let report = self.run().await?;

        if matches!(format, OutputFormat::Json) {
            let files: Vec<_> = report
                .iter()
                .map(|c| {
                    serde_json::json!({
                        "path": c.path.display().to_string(),
                        "state": c.state.as_str(),
                    })
                })
                .collect();
            formatter.print_json(&serde_json::json!({ "files": files }));
            return Ok(());
        }

        formatter.success(&format!(
            "Compared {} files with {}",
            report.len(),
            self.icloud_dir.display()
        ));
        for c in &report {
            formatter.info(&format!("{:<9} {}", c.state.as_str(), c.path.display()));
        }
        Ok(())
    }

    async fn run(&self) -> Result<Vec<FileComparison>> {
        let folder = MountedFolder::open(&self.icloud_dir).with_context(|| {
            format!("Cannot use {} as iCloud folder", self.icloud_dir.display())
        })?;
        compare_folder(&self.local_dir, &folder)
            .await
            .with_context(|| format!("Check of {} failed", self.local_dir.display()))
    }
}
