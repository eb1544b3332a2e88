//! CloudPush Graph - Microsoft Graph API client
//!
//! Provides async client for:
//! - OAuth2 authentication (Device Authorization Grant) with a JSON token cache
//! - OneDrive file download by path
//!
//! ## Modules
//!
//! - [`auth`] - Device-code flow, token cache, and the [`CredentialProvider`] adapter
//! - [`client`] - Microsoft Graph API HTTP client
//!
//! [`CredentialProvider`]: cloudpush_core::ports::CredentialProvider

pub mod auth;
pub mod client;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when communicating with the Microsoft Graph API
#[derive(Debug, Error)]
pub enum GraphError {
    /// Authentication credentials are invalid or expired
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Insufficient permissions for the requested operation
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// A server-side error occurred (5xx)
    #[error("Server error: {0}")]
    ServerError(String),

    /// Any other non-success status
    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body as returned by the server
        body: String,
    },

    /// A network-level error occurred
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// The API response could not be parsed or was malformed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The operation has no implementation for this backend yet
    #[error("Not supported: {0}")]
    NotSupported(String),

    /// Writing a downloaded file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GraphError {
    /// Maps a non-success HTTP status and its body to an error variant
    pub fn from_status(status: StatusCode, body: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => GraphError::Unauthorized(body),
            StatusCode::FORBIDDEN => GraphError::Forbidden(body),
            StatusCode::NOT_FOUND => GraphError::NotFound(body),
            s if s.is_server_error() => GraphError::ServerError(body),
            s => GraphError::UnexpectedStatus {
                status: s.as_u16(),
                body,
            },
        }
    }
}
