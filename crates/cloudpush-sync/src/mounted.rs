//! Remote folder adapter for cloud folders mounted on the local filesystem
//!
//! iCloud Drive exposes its contents as a regular directory (on macOS under
//! `~/Library/Mobile Documents/com~apple~CloudDocs`), and the platform daemon
//! uploads whatever lands there. [`MountedFolder`] treats such a directory as
//! a [`RemoteFolder`].
//!
//! ## Design Decisions
//!
//! - **Atomic writes**: uploads write to a hidden temp file in the same
//!   directory and rename over the target, so the sync daemon never picks up
//!   a half-written file.
//! - **Flat namespace**: file names containing path separators are rejected.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use cloudpush_core::{domain::RemoteFileInfo, ports::RemoteFolder};
use tracing::{debug, instrument};

use crate::SyncError;

/// A directory on a mounted cloud drive
#[derive(Debug, Clone)]
pub struct MountedFolder {
    root: PathBuf,
}

impl MountedFolder {
    /// Opens an existing mounted directory
    ///
    /// # Errors
    /// - [`SyncError::PathNotFound`] if `root` does not exist
    /// - [`SyncError::NotADirectory`] if `root` is not a directory
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, SyncError> {
        let root = root.into();
        let metadata = match std::fs::metadata(&root) {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(SyncError::PathNotFound(root));
            }
            Err(e) => return Err(e.into()),
        };
        if !metadata.is_dir() {
            return Err(SyncError::NotADirectory(root));
        }
        Ok(Self { root })
    }

    /// Directory uploads are written into
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn target(&self, filename: &str) -> anyhow::Result<PathBuf> {
        let valid = !filename.is_empty()
            && filename != "."
            && filename != ".."
            && !filename.contains(['/', '\\']);
        if !valid {
            bail!("Invalid file name '{filename}' for {}", self.root.display());
        }
        Ok(self.root.join(filename))
    }
}

#[async_trait::async_trait]
impl RemoteFolder for MountedFolder {
    #[instrument(skip(self), fields(root = %self.root.display()))]
    async fn entry(&self, name: &str) -> anyhow::Result<Option<RemoteFileInfo>> {
        let path = self.target(name)?;
        let metadata = match tokio::fs::metadata(&path).await {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("no remote entry");
                return Ok(None);
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to stat {}", path.display()));
            }
        };

        if !metadata.is_file() {
            bail!("Remote entry {} is not a regular file", path.display());
        }

        let date_modified = metadata.modified().ok().map(DateTime::<Utc>::from);
        Ok(Some(RemoteFileInfo {
            name: name.to_string(),
            size: Some(metadata.len()),
            date_modified,
        }))
    }

    #[instrument(skip(self, content), fields(root = %self.root.display(), bytes = content.len()))]
    async fn upload(&self, content: Vec<u8>, filename: &str) -> anyhow::Result<()> {
        let target = self.target(filename)?;
        let tmp_path = self.root.join(format!(".{filename}.cloudpush-tmp"));

        debug!(?tmp_path, "writing to temporary file");
        if let Err(e) = tokio::fs::write(&tmp_path, &content).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e).with_context(|| format!("Failed to write {}", tmp_path.display()));
        }

        debug!("renaming temporary file to target");
        if let Err(e) = tokio::fs::rename(&tmp_path, &target).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e).with_context(|| format!("Failed to replace {}", target.display()));
        }

        debug!("upload complete");
        Ok(())
    }
}
