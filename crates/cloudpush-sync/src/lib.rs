//! CloudPush Sync - One-way push engine
//!
//! Provides:
//! - A cheap size/mtime divergence check between a local file and its remote copy
//! - A push dispatcher that uploads a directory's files on a bounded worker pool
//! - A [`RemoteFolder`](cloudpush_core::ports::RemoteFolder) adapter for
//!   cloud folders mounted on the local filesystem (iCloud Drive)
//!
//! ## Modules
//!
//! - [`differ`] - Divergence check and per-folder comparison report
//! - [`push`] - Upload task and push dispatcher
//! - [`mounted`] - Mounted remote folder adapter (atomic writes)

pub mod differ;
pub mod mounted;
pub mod push;

use std::path::PathBuf;

use cloudpush_core::domain::DomainError;
use thiserror::Error;

pub use differ::{compare_folder, differ, FileComparison, RemoteState};
pub use mounted::MountedFolder;
pub use push::{push_folder, upload_file, UPLOAD_WORKERS};

/// Errors that can occur during push operations
#[derive(Debug, Error)]
pub enum SyncError {
    /// An I/O error occurred during file operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// The specified path does not exist
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The path exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The remote handle lacks an attribute the divergence check needs
    #[error(transparent)]
    MissingRemoteMetadata(#[from] DomainError),

    /// The remote folder failed to answer a lookup during comparison
    #[error("Remote folder error: {0:#}")]
    Remote(anyhow::Error),
}
