//! Domain entities
//!
//! This module contains the core domain types for CloudPush:
//! - File metadata snapshots for the local and remote side of a push
//! - Domain-specific error types

pub mod errors;
pub mod files;

// Re-export commonly used types
pub use errors::DomainError;
pub use files::{LocalFile, RemoteFileInfo};
