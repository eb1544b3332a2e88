//! Port definitions (hexagonal architecture interfaces)
//!
//! Ports are interfaces that the push logic depends on, but whose
//! implementations live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`CredentialProvider`] - Access token acquisition (OneDrive device-code flow)
//! - [`RemoteFolder`] - Upload destination with per-file metadata lookup

pub mod credential_provider;
pub mod remote_folder;

pub use credential_provider::{CredentialProvider, Tokens};
pub use remote_folder::RemoteFolder;
