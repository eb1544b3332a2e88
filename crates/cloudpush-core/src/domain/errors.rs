//! Domain error types
//!
//! Malformed settings files and incomplete remote metadata.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A remote handle did not expose an attribute the caller needs
    #[error("Remote file '{name}' is missing the '{field}' attribute")]
    MissingRemoteMetadata {
        /// Name of the remote file
        name: String,
        /// The attribute that was absent
        field: &'static str,
    },

    /// The auth settings file is malformed
    #[error("Invalid auth settings: {0}")]
    InvalidAuthSettings(String),
}
