//! Remote folder port (driven/secondary port)
//!
//! A directory-like destination in a cloud backend. The push dispatcher is
//! written only against this trait, so any backend that can report per-file
//! size/modification time and accept an upload can be a push target.

use crate::domain::RemoteFileInfo;

/// Port trait for a remote folder that accepts uploads
#[async_trait::async_trait]
pub trait RemoteFolder: Send + Sync {
    /// Looks up an existing file by name
    ///
    /// # Returns
    /// `Ok(None)` if the folder has no entry with that name.
    async fn entry(&self, name: &str) -> anyhow::Result<Option<RemoteFileInfo>>;

    /// Stores `content` in this folder under `filename`, replacing any
    /// existing file of the same name
    async fn upload(&self, content: Vec<u8>, filename: &str) -> anyhow::Result<()>;
}
