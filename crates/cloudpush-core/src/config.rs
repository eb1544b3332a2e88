//! Configuration module for CloudPush.
//!
//! Two files are involved:
//! - the YAML [`Config`] that says where everything lives, and
//! - the line-oriented [`AuthSettings`] file holding the Azure AD
//!   application registration (client ID, tenant ID, scopes).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for CloudPush.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub auth: AuthConfig,
    pub download: DownloadConfig,
    pub logging: LoggingConfig,
}

/// Where the OneDrive credentials live.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Three-line text file: client ID, tenant ID, comma-separated scopes.
    pub settings_file: PathBuf,
    /// JSON token cache, rewritten only when the cached session changes.
    pub cache_file: PathBuf,
}

/// OneDrive download settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Local directory downloaded files are written to when `--dest` is omitted.
    pub destination: PathBuf,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

// ---------------------------------------------------------------------------
// Config::load()
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/cloudpush/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        config_home().join("config.yaml")
    }
}

fn config_home() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("cloudpush")
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

impl Default for AuthConfig {
    fn default() -> Self {
        let dir = config_home();
        Self {
            settings_file: dir.join("onedrive_auth.txt"),
            cache_file: dir.join("onedrive_auth_cache.json"),
        }
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            destination: dirs::download_dir()
                .or_else(|| dirs::home_dir().map(|h| h.join("Downloads")))
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config::validate()
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"logging.level"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- auth ---
        if self.auth.settings_file.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: "auth.settings_file".into(),
                message: "must not be empty".into(),
            });
        }
        if self.auth.cache_file.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: "auth.cache_file".into(),
                message: "must not be empty".into(),
            });
        }

        // --- download ---
        if self.download.destination.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: "download.destination".into(),
                message: "must not be empty".into(),
            });
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level '{}'; valid options: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// AuthSettings
// ---------------------------------------------------------------------------

/// Azure AD application registration used for the device-code flow.
///
/// Read from a plain text file with exactly three meaningful lines:
///
/// ```text
/// <client id>
/// <tenant id>
/// Files.ReadWrite,User.Read
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSettings {
    pub client_id: String,
    pub tenant_id: String,
    pub scopes: Vec<String>,
}

impl AuthSettings {
    /// Parse the three-line settings format.
    ///
    /// Each line is trimmed. Scopes are split on `,`, trimmed, and empty
    /// items are dropped. Lines after the third are ignored.
    pub fn parse(content: &str) -> Result<Self, DomainError> {
        let mut lines = content.lines().map(str::trim);

        let client_id = lines
            .next()
            .filter(|l| !l.is_empty())
            .ok_or_else(|| DomainError::InvalidAuthSettings("missing clientId on line 1".into()))?
            .to_string();
        let tenant_id = lines
            .next()
            .filter(|l| !l.is_empty())
            .ok_or_else(|| DomainError::InvalidAuthSettings("missing tenantId on line 2".into()))?
            .to_string();
        let scopes: Vec<String> = lines
            .next()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        if scopes.is_empty() {
            return Err(DomainError::InvalidAuthSettings(
                "missing scopes on line 3".into(),
            ));
        }

        Ok(Self {
            client_id,
            tenant_id,
            scopes,
        })
    }

    /// Read and parse the settings file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::parse(&content)?)
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
