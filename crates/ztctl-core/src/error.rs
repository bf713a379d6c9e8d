//! Error types for ztctl operations.
//!
//! This module provides the error hierarchy shared by the transport client, the
//! renderers and the command-line front end, together with the conversions from
//! the third-party error types they encounter.

use thiserror::Error;

/// Main error type for ztctl operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Local I/O failure (reading files, writing output)
    #[error("I/O error: {0}")]
    Io(String),

    /// Base URL and path could not be joined into a valid URL
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Request payload could not be encoded as JSON
    #[error("Failed to encode request body: {0}")]
    EncodingError(String),

    /// A value could not be encoded for display
    #[error("Failed to render value: {0}")]
    RenderError(String),

    /// Response body could not be decoded
    #[error("Failed to decode response: {0}")]
    DecodeError(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Request timed out
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Remote service could not be reached
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Request could not be assembled
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Specialized result type for ztctl operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::EncodingError(_) => "ENCODING_ERROR",
            Self::RenderError(_) => "RENDER_ERROR",
            Self::DecodeError(_) => "DECODE_ERROR",
            Self::HttpError(_) => "HTTP_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::ValidationError(_) => "VALIDATION_ERROR",
        }
    }

    /// Returns true if the process cannot continue after this error.
    ///
    /// Bootstrap failures and display failures are fatal; everything the
    /// transport produces is reported and skipped.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ConfigError(_) | Self::Io(_) | Self::RenderError(_) | Self::ValidationError(_)
        )
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else if err.is_decode() {
            Self::DecodeError(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::DecodeError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::ConfigError(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            Error::ConfigError("test".to_string()).error_code(),
            "CONFIG_ERROR"
        );
        assert_eq!(Error::Io("test".to_string()).error_code(), "IO_ERROR");
        assert_eq!(
            Error::InvalidEndpoint("test".to_string()).error_code(),
            "INVALID_ENDPOINT"
        );
        assert_eq!(
            Error::EncodingError("test".to_string()).error_code(),
            "ENCODING_ERROR"
        );
        assert_eq!(
            Error::RenderError("test".to_string()).error_code(),
            "RENDER_ERROR"
        );
        assert_eq!(
            Error::DecodeError("test".to_string()).error_code(),
            "DECODE_ERROR"
        );
        assert_eq!(
            Error::HttpError("test".to_string()).error_code(),
            "HTTP_ERROR"
        );
        assert_eq!(Error::Timeout("test".to_string()).error_code(), "TIMEOUT");
        assert_eq!(
            Error::ServiceUnavailable("test".to_string()).error_code(),
            "SERVICE_UNAVAILABLE"
        );
        assert_eq!(
            Error::InvalidRequest("test".to_string()).error_code(),
            "INVALID_REQUEST"
        );
        assert_eq!(
            Error::ValidationError("test".to_string()).error_code(),
            "VALIDATION_ERROR"
        );
    }

    #[test]
    fn test_error_display() {
        let err = Error::ServiceUnavailable("connection refused".to_string());
        assert_eq!(err.to_string(), "Service unavailable: connection refused");

        let err = Error::InvalidEndpoint("relative URL without a base".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid endpoint: relative URL without a base"
        );
    }

    #[test]
    fn test_is_fatal() {
        assert!(Error::ConfigError("test".to_string()).is_fatal());
        assert!(Error::RenderError("test".to_string()).is_fatal());
        assert!(Error::Io("test".to_string()).is_fatal());

        assert!(!Error::Timeout("test".to_string()).is_fatal());
        assert!(!Error::DecodeError("test".to_string()).is_fatal());
        assert!(!Error::EncodingError("test".to_string()).is_fatal());
        assert!(!Error::InvalidEndpoint("test".to_string()).is_fatal());
    }

    #[test]
    fn test_from_url_parse_error() {
        let err = url::Url::parse("not a url").unwrap_err();
        let zt_err: Error = err.into();
        assert!(matches!(zt_err, Error::InvalidEndpoint(_)));
    }

    #[test]
    fn test_from_serde_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let zt_err: Error = err.into();
        assert!(matches!(zt_err, Error::DecodeError(_)));
    }

    #[test]
    fn test_from_toml_error() {
        let err = toml::from_str::<toml::Table>("key = ").unwrap_err();
        let zt_err: Error = err.into();
        assert_eq!(zt_err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_from_io_error() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let zt_err: Error = err.into();
        assert_eq!(zt_err, Error::Io("missing".to_string()));
    }

    #[test]
    fn test_error_partial_eq() {
        let err1 = Error::HttpError("test".to_string());
        let err2 = Error::HttpError("test".to_string());
        let err3 = Error::HttpError("other".to_string());

        assert_eq!(err1, err2);
        assert_ne!(err1, err3);
    }
}
