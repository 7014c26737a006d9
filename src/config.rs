//! Configuration management for Booklib server

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable holding the configuration file path
pub const CONFIG_PATH_ENV: &str = "CONFIG_PATH";

#[derive(Debug, Deserialize, Clone)]
pub struct HttpServerConfig {
    /// Listen address, `host:port`
    pub address: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Free-form environment tag
    pub env: String,
    /// Path of the SQLite database file
    pub storage: PathBuf,
    pub http_server: HttpServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from the file named by `CONFIG_PATH`, falling
    /// back to the `--config` flag value.
    pub fn load(config_flag: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = resolve_config_path(env::var(CONFIG_PATH_ENV).ok(), config_flag)?;
        Self::from_file(&path)
    }

    /// Load configuration from a single file plus environment overrides
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::Message(format!(
                "config file does not exist at path: {}",
                path.display()
            )));
        }

        let config = Config::builder()
            .set_default("env", "production")?
            .add_source(File::from(path).required(true))
            // Add environment variables (e.g. BOOKLIB__HTTP_SERVER__ADDRESS)
            .add_source(Environment::with_prefix("BOOKLIB").separator("__"))
            // Override environment tag from ENV if present
            .set_override_option("env", env::var("ENV").ok())?
            .build()?;

        config.try_deserialize()
    }
}

/// Pick the config file path: the environment value wins over the flag.
pub fn resolve_config_path(
    env_value: Option<String>,
    config_flag: Option<PathBuf>,
) -> Result<PathBuf, ConfigError> {
    env_value
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or(config_flag)
        .ok_or_else(|| ConfigError::Message("config path is not set".to_string()))
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
