//! Push dispatcher - uploads a local directory into a remote folder
//!
//! ## Flow
//!
//! ```text
//! read_dir ──→ regular files ──→ JoinSet ──→ join_next
//!  (scan)        (snapshot)    (≤ 4 running)  (drain)
//! ```
//!
//! Every regular file becomes one tokio task. Tasks queue freely but must
//! hold a semaphore permit to run, which caps concurrent uploads at
//! [`UPLOAD_WORKERS`]. A failed or panicking task is logged and the batch
//! keeps going; only a failure to list the directory aborts the run.

use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use cloudpush_core::{domain::LocalFile, ports::RemoteFolder};
use tokio::{sync::Semaphore, task::JoinSet};
use tracing::{debug, info, instrument, warn};

use crate::SyncError;

/// Number of uploads allowed to run at the same time
pub const UPLOAD_WORKERS: usize = 4;

// ============================================================================
// Upload task
// ============================================================================

/// Reads `path` fully into memory and uploads it under its base name
///
/// # Errors
/// Fails if the file cannot be read, has no usable name, or the remote
/// upload fails.
#[instrument(skip_all, fields(path = %path.display()))]
pub async fn upload_file(path: &Path, remote: &dyn RemoteFolder) -> anyhow::Result<()> {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("{} has no UTF-8 file name", path.display()))?;

    let content = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    debug!(bytes = content.len(), "Uploading");
    remote
        .upload(content, filename)
        .await
        .with_context(|| format!("Failed to upload {filename}"))
}

// ============================================================================
// Dispatcher
// ============================================================================

/// Uploads every regular file in `local_dir` into `remote`
///
/// Only immediate entries are considered and symlinks are never followed.
/// No comparison with the remote side is made; see
/// [`compare_folder`](crate::differ::compare_folder) for that.
///
/// Returns once every upload has finished. Upload failures are logged,
/// not returned.
///
/// # Errors
/// - [`SyncError::PathNotFound`] / [`SyncError::NotADirectory`] for a bad `local_dir`
/// - [`SyncError::IoError`] if the directory cannot be listed
#[instrument(skip_all, fields(local_dir = %local_dir.display()))]
pub async fn push_folder(local_dir: &Path, remote: Arc<dyn RemoteFolder>) -> Result<(), SyncError> {
    info!("Scanning local folder: {}", local_dir.display());
    let files = scan(local_dir).await?;
    info!("Found {} files to upload!", files.len());

    let semaphore = Arc::new(Semaphore::new(UPLOAD_WORKERS));
    info!("Created a pool of {} workers!", UPLOAD_WORKERS);
    let mut tasks = JoinSet::new();

    for file in files {
        info!("Scheduling upload for {}", file.display_name());
        let path = file.path().to_path_buf();

        let semaphore = Arc::clone(&semaphore);
        let remote = Arc::clone(&remote);
        tasks.spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .context("Upload pool closed")?;
            upload_file(&path, remote.as_ref()).await
        });
    }

    debug!(pending = tasks.len(), "Draining upload tasks");
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("An upload failed: {:#}", e),
            Err(e) => warn!("An upload failed: {}", e),
        }
    }

    info!("All uploads finished!");
    Ok(())
}

/// Lists the regular files directly inside `dir`, sorted by path
pub(crate) async fn scan(dir: &Path) -> Result<Vec<LocalFile>, SyncError> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(SyncError::PathNotFound(dir.to_path_buf()));
        }
        Err(e) => {
            if tokio::fs::metadata(dir).await.is_ok_and(|m| !m.is_dir()) {
                return Err(SyncError::NotADirectory(dir.to_path_buf()));
            }
            return Err(e.into());
        }
    };

    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        // DirEntry::metadata does not traverse symlinks
        let metadata = entry.metadata().await?;
        if metadata.is_file() {
            files.push(LocalFile::from_metadata(entry.path(), &metadata)?);
        } else {
            debug!(path = %entry.path().display(), "Skipping non-file entry");
        }
    }

    files.sort_by(|a, b| a.path().cmp(b.path()));
    Ok(files)
}
