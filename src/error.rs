//! Error types
//!
//! A single error enum covers configuration, static file serving, and
//! transport failures surfaced to handlers.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// HTTPS was requested without both certificate and key files.
    #[error("Cannot create HTTPS server; server options must define cert_file and key_file")]
    MissingHttpsOption,

    /// `file()` was called but no static root is configured.
    #[error("Cannot send file; server options must define static_path")]
    MissingStaticFileOption,

    /// The static file could not be opened or inspected.
    #[error("There was an error reading the file \"{}\". {source}", path.display())]
    FileReadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid address '{0}'")]
    InvalidAddress(String),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TLS setup failed: {0}")]
    Tls(String),

    #[error("Invalid request target: {0}")]
    Url(#[from] url::ParseError),

    #[error("Failed to serialize JSON body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read request body: {0}")]
    Body(#[from] hyper::Error),

    #[error("Request body is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// The connection went away before the response could be written.
    #[error("Response receiver dropped; connection closed")]
    ResponseDropped,

    #[error("Listener already closed")]
    ListenerClosed,
}

impl Error {
    /// True for the configuration errors raised while constructing a server.
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingHttpsOption | Self::Config(_) | Self::InvalidAddress(_) | Self::Tls(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_static_file_message() {
        let err = Error::MissingStaticFileOption;
        assert_eq!(
            err.to_string(),
            "Cannot send file; server options must define static_path"
        );
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_file_read_failure_wraps_io_error() {
        let err = Error::FileReadFailure {
            path: PathBuf::from("/srv/public/missing.html"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "No such file"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/srv/public/missing.html"));
        assert!(msg.contains("No such file"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_https_error_is_configuration() {
        assert!(Error::MissingHttpsOption.is_configuration());
        assert!(Error::Tls("bad key".to_string()).is_configuration());
    }
}
