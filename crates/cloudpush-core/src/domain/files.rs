//! File metadata snapshots
//!
//! [`LocalFile`] is taken from the local filesystem at scan time;
//! [`RemoteFileInfo`] is supplied by a [`RemoteFolder`](crate::ports::RemoteFolder)
//! adapter. Neither is cached across push runs.

use std::borrow::Cow;
use std::fs::Metadata;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::DomainError;

// ============================================================================
// LocalFile
// ============================================================================

/// A regular file in the local source directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    path: PathBuf,
    size: u64,
    modified: DateTime<Utc>,
}

impl LocalFile {
    /// Builds a snapshot from metadata already fetched by the caller
    ///
    /// # Errors
    /// Returns the I/O error if the platform does not report a modification time.
    pub fn from_metadata(path: impl Into<PathBuf>, metadata: &Metadata) -> std::io::Result<Self> {
        Ok(Self {
            path: path.into(),
            size: metadata.len(),
            modified: DateTime::<Utc>::from(metadata.modified()?),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size in bytes
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Modification time as whole seconds since the Unix epoch
    pub fn modified_epoch_secs(&self) -> i64 {
        self.modified.timestamp()
    }

    /// Final path component for display; invalid UTF-8 is replaced
    pub fn display_name(&self) -> Cow<'_, str> {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default()
    }
}

// ============================================================================
// RemoteFileInfo
// ============================================================================

/// Metadata a remote backend reports for one file
///
/// Both attributes are optional because remote APIs omit them for some
/// items (Graph returns no `size` for packages, for example). Accessors
/// turn an absent attribute into [`DomainError::MissingRemoteMetadata`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFileInfo {
    /// File name within the remote folder
    pub name: String,
    /// Size in bytes
    pub size: Option<u64>,
    /// Last modification time
    pub date_modified: Option<DateTime<Utc>>,
}

impl RemoteFileInfo {
    /// Creates a fully populated handle
    pub fn new(name: impl Into<String>, size: u64, date_modified: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            size: Some(size),
            date_modified: Some(date_modified),
        }
    }

    pub fn size(&self) -> Result<u64, DomainError> {
        self.size.ok_or_else(|| DomainError::MissingRemoteMetadata {
            name: self.name.clone(),
            field: "size",
        })
    }

    pub fn date_modified(&self) -> Result<DateTime<Utc>, DomainError> {
        self.date_modified
            .ok_or_else(|| DomainError::MissingRemoteMetadata {
                name: self.name.clone(),
                field: "date_modified",
            })
    }

    /// Modification time as whole seconds since the Unix epoch
    pub fn modified_epoch_secs(&self) -> Result<i64, DomainError> {
        self.date_modified().map(|t| t.timestamp())
    }
}
