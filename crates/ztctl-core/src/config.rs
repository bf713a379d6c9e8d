//! Configuration structures for ztctl.
//!
//! This module loads the TOML configuration file, validates it, and exposes the
//! values the ZeroTier Central client needs: base URL, API token and timeout.

use crate::client::{
    ClientConfig, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS, ZEROTIER_API_URL,
};
use crate::util::{file_exists, read_head};
use crate::Error;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use validator::Validate;

/// Maximum number of bytes read from a token file.
pub const TOKEN_FILE_LIMIT: usize = 256;

/// Top-level configuration file.
///
/// ```toml
/// [zerotier]
/// url = "https://api.zerotier.com/api/v1"
/// token_file = "/home/me/.config/ztctl/token"
/// timeout_secs = 20
/// connect_timeout_secs = 10
/// compression = true
/// ```
#[derive(Debug, Default, Deserialize, Validate)]
pub struct AppConfig {
    /// ZeroTier Central settings
    #[validate(nested)]
    #[serde(default)]
    pub zerotier: ZeroTierConfig,
}

impl AppConfig {
    /// Load and validate a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the file cannot be read or parsed and
    /// [`Error::ValidationError`] if a value is out of range.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigError(format!("{}: {}", path.display(), e)))?;
        let config: Self = toml::from_str(&text)
            .map_err(|e| Error::ConfigError(format!("{}: {}", path.display(), e)))?;
        config.validate()?;

        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Load `explicit` when given, otherwise the default file if it exists.
    ///
    /// A missing default file is not an error: defaults are used instead.
    ///
    /// # Errors
    ///
    /// See [`AppConfig::load`].
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self, Error> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match default_config_path() {
            Some(path) if file_exists(&path) => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}

/// Default location of the configuration file.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ztctl").join("config.toml"))
}

/// Settings for the ZeroTier Central API.
#[derive(Debug, Deserialize, Validate)]
pub struct ZeroTierConfig {
    /// API base URL
    #[validate(url)]
    #[serde(default = "default_url")]
    pub url: String,

    /// API token
    #[serde(default, deserialize_with = "deserialize_secret")]
    pub token: Option<SecretString>,

    /// File holding the API token, used when `token` is unset
    #[serde(default)]
    pub token_file: Option<PathBuf>,

    /// Request timeout in seconds (0 selects the default)
    #[validate(range(max = 300))]
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connect timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Accept gzip-compressed responses
    #[serde(default = "default_compression")]
    pub compression: bool,

    /// Account ID bound to the token, discovered on demand when unset
    #[serde(default)]
    pub uid: Option<String>,
}

fn default_url() -> String {
    ZEROTIER_API_URL.to_string()
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

const fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

const fn default_compression() -> bool {
    true
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
}

impl ZeroTierConfig {
    /// Set the API base URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set the API token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::from(token.into()));
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_secs = seconds;
        self
    }

    /// Set the account ID.
    #[must_use]
    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Transport settings for the HTTP client.
    #[must_use]
    pub const fn http_config(&self) -> ClientConfig {
        ClientConfig::new()
            .with_timeout(self.timeout())
            .with_connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .with_compression(self.compression)
    }

    /// Resolve the API token from `token` or, failing that, `token_file`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] when no token is configured, the token
    /// file cannot be read, or it is empty.
    pub fn resolve_token(&self) -> Result<SecretString, Error> {
        if let Some(token) = &self.token {
            return Ok(SecretString::from(token.expose_secret().to_owned()));
        }

        let Some(path) = &self.token_file else {
            return Err(Error::ConfigError(
                "no API token configured (set `token`, `token_file` or ZTCTL_TOKEN)".to_string(),
            ));
        };

        let raw = read_head(path, TOKEN_FILE_LIMIT)
            .map_err(|e| Error::ConfigError(format!("token file {e}")))?;
        let token = String::from_utf8_lossy(&raw).trim().to_string();
        if token.is_empty() {
            return Err(Error::ConfigError(format!(
                "token file {} is empty",
                path.display()
            )));
        }
        Ok(SecretString::from(token))
    }

    /// Re-check the settings, e.g. after command-line overrides.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] if a value is out of range.
    pub fn validated(self) -> Result<Self, Error> {
        self.validate()?;
        Ok(self)
    }

    /// Displayable view of the settings with the token redacted.
    #[must_use]
    pub fn summary(&self) -> ConfigSummary {
        ConfigSummary {
            url: self.url.clone(),
            token: self.token.as_ref().map(|_| "<redacted>".to_string()),
            token_file: self
                .token_file
                .as_ref()
                .map(|path| path.display().to_string()),
            timeout_secs: self.timeout_secs,
            connect_timeout_secs: self.connect_timeout_secs,
            compression: self.compression,
            uid: self.uid.clone(),
        }
    }
}

impl Default for ZeroTierConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            token: None,
            token_file: None,
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            compression: default_compression(),
            uid: None,
        }
    }
}

/// Serializable view of [`ZeroTierConfig`] used by the `info` command.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ConfigSummary {
    /// API base URL
    pub url: String,
    /// Placeholder when a token is set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Token file path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_file: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// Gzip responses accepted
    pub compression: bool,
    /// Account ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
}
