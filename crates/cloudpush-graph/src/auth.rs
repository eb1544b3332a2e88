//! OAuth2 Device Authorization Grant for Microsoft Graph API
//!
//! Implements the device-code flow (RFC 8628) against the Microsoft identity
//! platform, with a JSON token cache so later runs can reuse or silently
//! refresh the session.
//!
//! ## Components
//!
//! - [`TokenCache`] - Serializable session cache with a changed-flag
//! - [`DeviceCodeFlow`] - Device authorization, token polling and refresh
//! - [`DeviceCodeCredentialProvider`] - [`CredentialProvider`] adapter tying the two together

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use cloudpush_core::config::AuthSettings;
use cloudpush_core::ports::{CredentialProvider, Tokens};
use oauth2::{
    basic::{BasicClient, BasicTokenResponse},
    ClientId, DeviceAuthorizationUrl, EndpointNotSet, EndpointSet, RefreshToken, Scope,
    StandardDeviceAuthorizationResponse, TokenResponse, TokenUrl,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Microsoft identity platform host; the tenant is appended per account
const AUTHORITY_HOST: &str = "https://login.microsoftonline.com";

/// Cached tokens closer than this to expiry are refreshed before use
const EXPIRY_MARGIN_MINUTES: i64 = 5;

/// Number of token characters echoed to the debug log
const TOKEN_PREFIX_LEN: usize = 100;

// ============================================================================
// TokenCache
// ============================================================================

/// Serializable session cache persisted as JSON
///
/// Remembers which client/tenant the tokens were issued for so that editing
/// the auth settings file invalidates the cached session. The
/// `has_state_changed` flag is in-memory only and tells the caller whether
/// the file needs rewriting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenCache {
    client_id: Option<String>,
    tenant_id: Option<String>,
    tokens: Option<Tokens>,
    #[serde(skip)]
    changed: bool,
}

impl TokenCache {
    /// Loads the cache from `path`
    ///
    /// A missing or empty file yields an empty cache; malformed JSON is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No token cache on disk");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("Failed to read token cache {}", path.display())))
            }
        };

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let cache: TokenCache =
            serde_json::from_str(&content).context("Failed to deserialize token cache")?;
        debug!(path = %path.display(), "Loaded token cache");
        Ok(cache)
    }

    /// Writes the cache to `path` as JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize token cache")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write token cache {}", path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
                .context("Failed to restrict token cache permissions")?;
        }

        debug!(path = %path.display(), "Saved token cache");
        Ok(())
    }

    /// Returns the cached tokens if they were issued for `settings`' client and tenant
    pub fn tokens_for(&self, settings: &AuthSettings) -> Option<&Tokens> {
        if self.client_id.as_deref() == Some(settings.client_id.as_str())
            && self.tenant_id.as_deref() == Some(settings.tenant_id.as_str())
        {
            self.tokens.as_ref()
        } else {
            None
        }
    }

    /// Stores new tokens for `settings`, marking the cache as changed
    pub fn replace(&mut self, settings: &AuthSettings, tokens: Tokens) {
        self.client_id = Some(settings.client_id.clone());
        self.tenant_id = Some(settings.tenant_id.clone());
        self.tokens = Some(tokens);
        self.changed = true;
    }

    /// Whether the cache differs from what was loaded
    pub fn has_state_changed(&self) -> bool {
        self.changed
    }
}

// ============================================================================
// DeviceCodeFlow
// ============================================================================

/// What the user has to do to finish signing in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevicePrompt {
    /// Page the user opens in a browser
    pub verification_uri: String,
    /// Code the user types on that page
    pub user_code: String,
    /// How long the code stays valid
    pub expires_in: std::time::Duration,
}

impl DevicePrompt {
    /// Human-readable sign-in instructions
    pub fn message(&self) -> String {
        format!(
            "To sign in, use a web browser to open the page {} and enter the code {} to authenticate.",
            self.verification_uri, self.user_code
        )
    }
}

type DeviceClient = BasicClient<EndpointNotSet, EndpointSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// OAuth2 device authorization flow using the `oauth2` crate
///
/// Handles requesting a device code, polling the token endpoint until the
/// user has approved the request, and refreshing tokens.
pub struct DeviceCodeFlow {
    client: DeviceClient,
    scopes: Vec<String>,
    http_client: reqwest::Client,
}

impl DeviceCodeFlow {
    /// Creates a flow against the public Microsoft identity platform
    pub fn new(settings: &AuthSettings) -> Result<Self> {
        Self::with_authority(settings, AUTHORITY_HOST)
    }

    /// Creates a flow against a custom authority host (useful for testing)
    ///
    /// Endpoints are `{authority}/{tenant}/oauth2/v2.0/devicecode` and
    /// `{authority}/{tenant}/oauth2/v2.0/token`.
    pub fn with_authority(settings: &AuthSettings, authority: &str) -> Result<Self> {
        let base = format!(
            "{}/{}/oauth2/v2.0",
            authority.trim_end_matches('/'),
            settings.tenant_id
        );

        let client = BasicClient::new(ClientId::new(settings.client_id.clone()))
            .set_device_authorization_url(
                DeviceAuthorizationUrl::new(format!("{base}/devicecode"))
                    .context("Invalid device authorization URL")?,
            )
            .set_token_uri(TokenUrl::new(format!("{base}/token")).context("Invalid token URL")?);

        Ok(Self {
            client,
            scopes: settings.scopes.clone(),
            http_client: reqwest::Client::new(),
        })
    }

    /// Requests a device code and user code
    pub async fn start(&self) -> Result<StandardDeviceAuthorizationResponse> {
        info!("Initiating device code flow");

        let details: StandardDeviceAuthorizationResponse = self
            .client
            .exchange_device_code()
            .add_scopes(self.scopes.iter().cloned().map(Scope::new))
            .request_async(&self.http_client)
            .await
            .context("Device flow error")?;

        Ok(details)
    }

    /// Polls the token endpoint until the user approves or the code expires
    pub async fn poll(&self, details: &StandardDeviceAuthorizationResponse) -> Result<Tokens> {
        let token_result = self
            .client
            .exchange_device_access_token(details)
            .request_async(&self.http_client, tokio::time::sleep, None)
            .await
            .context("Error acquiring token")?;

        info!("Device code flow completed");
        Ok(tokens_from_response(&token_result, None))
    }

    /// Refreshes an expired access token using a refresh token
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<Tokens> {
        info!("Refreshing access token");

        let token_result = self
            .client
            .exchange_refresh_token(&RefreshToken::new(refresh_token.to_string()))
            .add_scopes(self.scopes.iter().cloned().map(Scope::new))
            .request_async(&self.http_client)
            .await
            .context("Failed to refresh token")?;

        Ok(tokens_from_response(&token_result, Some(refresh_token)))
    }
}

/// Converts an OAuth token response into port-level [`Tokens`]
///
/// Keeps `previous_refresh` when the server does not rotate the refresh token.
fn tokens_from_response(response: &BasicTokenResponse, previous_refresh: Option<&str>) -> Tokens {
    let expires_at = response
        .expires_in()
        .map(|d| Utc::now() + Duration::seconds(d.as_secs() as i64))
        .unwrap_or_else(|| Utc::now() + Duration::hours(1));

    Tokens {
        access_token: response.access_token().secret().to_string(),
        refresh_token: response
            .refresh_token()
            .map(|t| t.secret().to_string())
            .or_else(|| previous_refresh.map(str::to_string)),
        expires_at,
    }
}

// ============================================================================
// DeviceCodeCredentialProvider
// ============================================================================

/// Writes the sign-in instructions to stderr
fn print_prompt(prompt: &DevicePrompt) {
    eprintln!("{}", prompt.message());
}

/// [`CredentialProvider`] backed by the device-code flow and a [`TokenCache`] file
///
/// `acquire()`:
/// 1. Loads the token cache (missing file = empty cache)
/// 2. Returns cached tokens that are still valid for the configured client
/// 3. Otherwise refreshes silently if a refresh token is cached
/// 4. Otherwise runs the interactive device-code flow
/// 5. Rewrites the cache file only if its state changed
pub struct DeviceCodeCredentialProvider {
    settings: AuthSettings,
    cache_path: PathBuf,
    authority: String,
    open_browser: bool,
    prompt: fn(&DevicePrompt),
}

impl DeviceCodeCredentialProvider {
    pub fn new(settings: AuthSettings, cache_path: impl Into<PathBuf>) -> Self {
        Self {
            settings,
            cache_path: cache_path.into(),
            authority: AUTHORITY_HOST.to_string(),
            open_browser: true,
            prompt: print_prompt,
        }
    }

    /// Overrides the identity platform host (useful for testing)
    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = authority.into();
        self
    }

    /// Skips launching a browser on the verification page
    pub fn without_browser(mut self) -> Self {
        self.open_browser = false;
        self
    }

    /// Replaces how sign-in instructions are shown to the user
    pub fn with_prompt(mut self, prompt: fn(&DevicePrompt)) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    async fn interactive(&self, flow: &DeviceCodeFlow) -> Result<Tokens> {
        let details = flow.start().await?;

        let prompt = DevicePrompt {
            verification_uri: details.verification_uri().url().to_string(),
            user_code: details.user_code().secret().to_string(),
            expires_in: details.expires_in(),
        };
        (self.prompt)(&prompt);

        if self.open_browser {
            if let Err(e) = webbrowser::open(&prompt.verification_uri) {
                warn!(error = %e, "Could not open browser, continue manually");
            }
        }

        flow.poll(&details).await
    }
}

#[async_trait::async_trait]
impl CredentialProvider for DeviceCodeCredentialProvider {
    async fn acquire(&self) -> Result<String> {
        let mut cache = TokenCache::load(&self.cache_path)?;
        let flow = DeviceCodeFlow::with_authority(&self.settings, &self.authority)?;

        let cached = cache.tokens_for(&self.settings).cloned();
        let tokens = match cached {
            Some(t) if !t.expires_within(Duration::minutes(EXPIRY_MARGIN_MINUTES)) => {
                debug!("Using cached access token");
                t
            }
            Some(Tokens {
                refresh_token: Some(rt),
                ..
            }) => match flow.refresh_token(&rt).await {
                Ok(t) => {
                    cache.replace(&self.settings, t.clone());
                    t
                }
                Err(e) => {
                    warn!(error = %e, "Silent refresh failed, falling back to device code");
                    let t = self.interactive(&flow).await?;
                    cache.replace(&self.settings, t.clone());
                    t
                }
            },
            _ => {
                let t = self.interactive(&flow).await?;
                cache.replace(&self.settings, t.clone());
                t
            }
        };

        info!("Access token acquired!");
        let prefix: String = tokens.access_token.chars().take(TOKEN_PREFIX_LEN).collect();
        debug!(token_prefix = %prefix, "...");

        if cache.has_state_changed() {
            cache.save(&self.cache_path)?;
        }

        Ok(tokens.access_token)
    }
}
