// Configuration types module
// Defines the server and logging configuration structures

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Top-level configuration loaded by the binary
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Options a server is constructed with
///
/// Immutable once handed to [`crate::Server::new`].
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host name, defaults to localhost
    #[serde(default = "default_hostname")]
    pub hostname: String,
    /// Port to serve on, defaults to 3000
    #[serde(default = "default_port")]
    pub port: u16,
    /// Serve over TLS; requires `cert_file` and `key_file`
    #[serde(default)]
    pub https: bool,
    /// PEM certificate chain for HTTPS
    #[serde(default)]
    pub cert_file: Option<PathBuf>,
    /// PEM private key for HTTPS
    #[serde(default)]
    pub key_file: Option<PathBuf>,
    /// Root directory for static files
    #[serde(default)]
    pub static_path: Option<PathBuf>,
    /// Send an `x-powered-by` header with the current version
    #[serde(default = "default_true")]
    pub powered_by: bool,
    /// HTTP/1.1 keep-alive on accepted connections
    #[serde(default = "default_true")]
    pub keep_alive: bool,
}

#[allow(clippy::missing_const_for_fn)]
fn default_hostname() -> String {
    "localhost".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            hostname: default_hostname(),
            port: default_port(),
            https: false,
            cert_file: None,
            key_file: None,
            static_path: None,
            powered_by: true,
            keep_alive: true,
        }
    }
}

impl ServerConfig {
    /// Check option combinations that cannot be expressed by the types alone.
    pub fn validate(&self) -> Result<()> {
        if self.https && (self.cert_file.is_none() || self.key_file.is_none()) {
            return Err(Error::MissingHttpsOption);
        }
        Ok(())
    }

    /// URL scheme the server answers on
    pub const fn protocol(&self) -> Protocol {
        if self.https {
            Protocol::Https
        } else {
            Protocol::Http
        }
    }
}

/// Protocol the listener speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Http,
    Https,
}

impl Protocol {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_true")]
    pub access_log: bool,
    /// Access log format (combined, common, json)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_level() -> String {
    "info".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            access_log: true,
            access_log_format: default_access_log_format(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.hostname, "localhost");
        assert_eq!(cfg.port, 3000);
        assert!(!cfg.https);
        assert!(cfg.powered_by);
        assert!(cfg.static_path.is_none());
        assert_eq!(cfg.protocol(), Protocol::Http);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_https_requires_cert_and_key() {
        let mut cfg = ServerConfig {
            https: true,
            cert_file: Some(PathBuf::from("cert.pem")),
            ..ServerConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(Error::MissingHttpsOption)));

        cfg.key_file = Some(PathBuf::from("key.pem"));
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.protocol().as_str(), "https");
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let cfg: ServerConfig =
            serde_json::from_str(r#"{"port": 1234, "powered_by": false, "static_path": "./somewhere/else"}"#)
                .unwrap();
        assert_eq!(cfg.port, 1234);
        assert!(!cfg.powered_by);
        assert_eq!(cfg.static_path, Some(PathBuf::from("./somewhere/else")));
        assert_eq!(cfg.hostname, "localhost");
        assert!(cfg.keep_alive);
    }
}
