//! HTTP client settings.
//!
//! This module provides the timeouts and transport options shared by the
//! ZeroTier Central client, plus the base URL normalization applied when a
//! client is built.

use std::time::Duration;

/// Public ZeroTier Central API endpoint.
pub const ZEROTIER_API_URL: &str = "https://api.zerotier.com/api/v1";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Default connect timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// HTTP client configuration.
///
/// A zero timeout is never handed to the transport: it is replaced by
/// [`DEFAULT_TIMEOUT_SECS`] so a request cannot hang indefinitely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    /// Request timeout
    pub timeout: Duration,

    /// Connect timeout
    pub connect_timeout: Duration,

    /// Enable response compression
    pub enable_compression: bool,
}

impl ClientConfig {
    /// Create a new client configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            enable_compression: true,
        }
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Enable or disable compression.
    #[must_use]
    pub const fn with_compression(mut self, enabled: bool) -> Self {
        self.enable_compression = enabled;
        self
    }

    /// The request timeout to hand to the transport.
    #[must_use]
    pub const fn effective_timeout(&self) -> Duration {
        if self.timeout.is_zero() {
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        } else {
            self.timeout
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip a single trailing slash so paths can be appended verbatim.
#[must_use]
pub fn normalize_base_url(base_url: &str) -> &str {
    base_url.strip_suffix('/').unwrap_or(base_url)
}
