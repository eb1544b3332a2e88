//! Auth commands - Login and Status for OneDrive authentication
//!
//! Provides the `cloudpush auth` CLI subcommands which:
//! 1. `login`  - Runs the device-code credential provider and caches the tokens
//!    in the JSON token cache.
//! 2. `status` - Shows whether a cached token exists and whether it is expired.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Subcommand;
use cloudpush_core::{
    config::{AuthSettings, Config},
    ports::CredentialProvider,
};
use cloudpush_graph::auth::{DeviceCodeCredentialProvider, TokenCache};
use tracing::info;

use crate::output::{get_formatter, OutputFormat, OutputFormatter};

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Authenticate with OneDrive via the device-code flow
    Login,
    /// Check authentication status
    Status,
}

/// Builds the credential provider described by `config`
pub fn credential_provider(config: &Config) -> Result<DeviceCodeCredentialProvider> {
    let settings = AuthSettings::load(&config.auth.settings_file).with_context(|| {
        format!(
            "Failed to load auth settings from {}",
            config.auth.settings_file.display()
        )
    })?;
    Ok(DeviceCodeCredentialProvider::new(
        settings,
        &config.auth.cache_file,
    ))
}

/// Returns a bearer token, signing in interactively if needed
pub async fn acquire_token(config: &Config) -> Result<String> {
    credential_provider(config)?
        .acquire()
        .await
        .context("Authentication failed")
}

/// State of the cached OneDrive session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenStatus {
    /// No cached token for the configured application
    NotFound,
    Expired(DateTime<Utc>),
    Valid(DateTime<Utc>),
}

impl TokenStatus {
    fn label(&self) -> &'static str {
        match self {
            TokenStatus::NotFound => "Not found",
            TokenStatus::Expired(_) => "Expired",
            TokenStatus::Valid(_) => "Valid",
        }
    }

    fn expires_at(&self) -> Option<DateTime<Utc>> {
        match self {
            TokenStatus::NotFound => None,
            TokenStatus::Expired(t) | TokenStatus::Valid(t) => Some(*t),
        }
    }
}

/// Inspects the token cache without touching the network
pub fn token_status(config: &Config) -> Result<TokenStatus> {
    let settings = AuthSettings::load(&config.auth.settings_file)?;
    let cache = TokenCache::load(&config.auth.cache_file)?;

    Ok(match cache.tokens_for(&settings) {
        None => TokenStatus::NotFound,
        Some(t) if t.is_expired() => TokenStatus::Expired(t.expires_at),
        Some(t) => TokenStatus::Valid(t.expires_at),
    })
}

impl AuthCommand {
    pub async fn execute(&self, config: &Config, format: OutputFormat) -> Result<()> {
        let fmt = get_formatter(format == OutputFormat::Json);
        match self {
            AuthCommand::Login => self.execute_login(config, &*fmt).await,
            AuthCommand::Status => self.execute_status(config, &*fmt, format),
        }
    }

    async fn execute_login(&self, config: &Config, fmt: &dyn OutputFormatter) -> Result<()> {
        info!(cache = %config.auth.cache_file.display(), "Starting device-code login");
        acquire_token(config).await?;

        fmt.success("Authenticated with OneDrive");
        fmt.info(&format!(
            "Token cache: {}",
            config.auth.cache_file.display()
        ));
        Ok(())
    }

    fn execute_status(
        &self,
        config: &Config,
        fmt: &dyn OutputFormatter,
        format: OutputFormat,
    ) -> Result<()> {
        let status = token_status(config)?;

        if matches!(format, OutputFormat::Json) {
            fmt.print_json(&serde_json::json!({
                "authenticated": matches!(status, TokenStatus::Valid(_)),
                "token_status": status.label(),
                "expires_at": status.expires_at().map(|t| t.to_rfc3339()),
                "cache_file": config.auth.cache_file.display().to_string(),
            }));
            return Ok(());
        }

        match &status {
            TokenStatus::Valid(_) => fmt.success("Authenticated"),
            TokenStatus::Expired(_) => fmt.warn("Cached token has expired"),
            TokenStatus::NotFound => {
                fmt.info("Authentication status: Not configured");
                fmt.info("Run 'cloudpush auth login' to authenticate");
                return Ok(());
            }
        }
        fmt.info(&format!("Token status:  {}", status.label()));
        if let Some(expires_at) = status.expires_at() {
            fmt.info(&format!(
                "Expires at:    {}",
                expires_at.format("%Y-%m-%d %H:%M:%S UTC")
            ));
        }
        Ok(())
    }
}
