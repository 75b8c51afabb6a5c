// Configuration module entry point
// Loads server and logging configuration from file and environment

mod types;

pub use types::{AppConfig, LoggingConfig, Protocol, ServerConfig};

/// Default config file name (without extension)
pub const DEFAULT_CONFIG_PATH: &str = "revers";

impl AppConfig {
    /// Load configuration from specified file path (without extension)
    ///
    /// The file is optional; `REVERS_SERVER__PORT=8080` style environment
    /// variables override it.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("REVERS").separator("__"))
            .set_default("server.hostname", "localhost")?
            .set_default("server.port", 3000)?
            .set_default("server.https", false)?
            .set_default("server.powered_by", true)?
            .set_default("server.keep_alive", true)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .build()?;

        settings.try_deserialize()
    }

    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }
}
