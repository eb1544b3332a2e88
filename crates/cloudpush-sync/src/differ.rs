//! Divergence check between a local file and its remote counterpart
//!
//! The check is deliberately shallow: it looks only at byte size and the
//! modification time in whole seconds. No content hashing is done.
//!
//! [`push_folder`](crate::push::push_folder) uploads unconditionally; the
//! check is used for reporting through [`compare_folder`].

use std::path::{Path, PathBuf};

use cloudpush_core::domain::{LocalFile, RemoteFileInfo};
use cloudpush_core::ports::RemoteFolder;
use tracing::debug;

use crate::{push::scan, SyncError};

/// How a local file relates to the remote folder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteState {
    /// No entry with that name
    Missing,
    /// [`differ`] reports divergence
    Diverged,
    /// [`differ`] reports no divergence
    Current,
}

impl RemoteState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteState::Missing => "missing",
            RemoteState::Diverged => "diverged",
            RemoteState::Current => "current",
        }
    }
}

/// Divergence report for one local file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileComparison {
    pub path: PathBuf,
    pub state: RemoteState,
}

/// Decides whether `local_path` needs to be pushed over `remote`
///
/// - sizes differ: `true`
/// - sizes match and the modification times (epoch seconds) are equal: `true`
/// - otherwise: `false`
///
/// The equal-timestamp rule looks inverted; it is kept as-is and pinned by
/// the `equal_mtime` tests.
///
/// # Errors
/// - [`SyncError::IoError`] if the local file cannot be stat'ed
/// - [`SyncError::MissingRemoteMetadata`] if `remote` lacks `size` or `date_modified`
pub async fn differ(local_path: &Path, remote: &RemoteFileInfo) -> Result<bool, SyncError> {
    let metadata = tokio::fs::metadata(local_path).await?;
    let local = LocalFile::from_metadata(local_path, &metadata)?;

    let remote_size = remote.size()?;
    if local.size() != remote_size {
        debug!(
            path = %local_path.display(),
            local_size = local.size(),
            remote_size,
            "Size differs"
        );
        return Ok(true);
    }

    let local_mtime = local.modified_epoch_secs();
    let remote_mtime = remote.modified_epoch_secs()?;
    debug!(path = %local_path.display(), local_mtime, "Local modification time");
    debug!(name = %remote.name, remote_mtime, "Remote modification time");

    Ok(local_mtime == remote_mtime)
}

/// Runs [`differ`] for every regular file in `local_dir` against `remote`
///
/// Files are reported in path order. Nothing is uploaded.
///
/// # Errors
/// - listing errors as in [`push_folder`](crate::push::push_folder)
/// - [`SyncError::Remote`] if a lookup fails
/// - [`SyncError::MissingRemoteMetadata`] if an entry lacks size or mtime
pub async fn compare_folder(
    local_dir: &Path,
    remote: &dyn RemoteFolder,
) -> Result<Vec<FileComparison>, SyncError> {
    let files = scan(local_dir).await?;
    let mut report = Vec::with_capacity(files.len());

    for file in files {
        let name = file.display_name();
        let state = match remote.entry(&name).await.map_err(SyncError::Remote)? {
            None => RemoteState::Missing,
            Some(existing) if differ(file.path(), &existing).await? => RemoteState::Diverged,
            Some(_) => RemoteState::Current,
        };
        debug!(file = %name, state = state.as_str(), "Compared");
        report.push(FileComparison {
            path: file.path().to_path_buf(),
            state,
        });
    }

    Ok(report)
}
