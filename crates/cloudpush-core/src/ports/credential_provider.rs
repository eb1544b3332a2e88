//! Credential provider port (driven/secondary port)
//!
//! Supplies bearer tokens for a remote backend. The core never reads or
//! writes the token cache itself; persistence is owned by the adapter
//! (see `cloudpush_graph::auth::TokenCache`).
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because errors at port boundaries are adapter-specific
//!   and don't need domain-level classification.
//! - Uses `#[async_trait]` for async trait methods.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Tokens struct
// ============================================================================

/// OAuth tokens received from the identity provider
///
/// Contains the access token for API requests, an optional refresh token
/// for obtaining new access tokens, and the expiration time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tokens {
    /// Bearer token for authenticating API requests
    pub access_token: String,
    /// Token for refreshing the access token without user interaction
    /// (requires `offline_access` scope)
    pub refresh_token: Option<String>,
    /// When the access token expires
    pub expires_at: DateTime<Utc>,
}

impl Tokens {
    /// Returns true if the access token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Returns true if the access token will expire within the given duration
    pub fn expires_within(&self, duration: chrono::Duration) -> bool {
        Utc::now() + duration >= self.expires_at
    }
}

// ============================================================================
// CredentialProvider trait
// ============================================================================

/// Port trait for obtaining an access token
///
/// Implementations may reuse a cached session, refresh silently, or run an
/// interactive flow. Any failure is an authentication error and is fatal
/// for the caller.
#[async_trait::async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Returns a bearer token ready to be placed in an `Authorization` header
    async fn acquire(&self) -> anyhow::Result<String>;
}
