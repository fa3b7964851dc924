use crate::draw::engine::MAX_NEVER_PLAYED_DAYS;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub draw: DrawConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: Option<u16>,
    pub unix_socket: Option<PathBuf>,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DrawConfig {
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    #[serde(default = "default_never_played_days")]
    pub never_played_days: i64,
    #[serde(default = "default_max_count")]
    pub max_count: usize,
    #[serde(default = "default_pechvogel_count")]
    pub pechvogel_count: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_console")]
    pub console: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            unix_socket: None,
            bind_address: default_bind_address(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
        }
    }
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            history_capacity: default_history_capacity(),
            never_played_days: default_never_played_days(),
            max_count: default_max_count(),
            pechvogel_count: default_pechvogel_count(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            console: default_console(),
        }
    }
}

// Default value functions
fn default_port() -> Option<u16> {
    Some(8420)
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_data_file() -> PathBuf {
    PathBuf::from("data.json")
}

fn default_history_capacity() -> usize {
    30
}

fn default_never_played_days() -> i64 {
    999
}

fn default_max_count() -> usize {
    100
}

fn default_pechvogel_count() -> usize {
    3
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "console".to_string()
}

fn default_console() -> bool {
    false
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .context("Failed to parse config file")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.server.port.is_none() && self.server.unix_socket.is_none() {
            bail!("Either port or unix_socket must be specified in server config");
        }

        if let Some(port) = self.server.port {
            if port == 0 {
                bail!("Server port must be greater than 0");
            }
        }

        if self.storage.data_file.as_os_str().is_empty() {
            bail!("data_file must not be empty");
        }

        if self.draw.history_capacity == 0 {
            bail!("history_capacity must be greater than 0");
        }

        if self.draw.never_played_days < 0 {
            bail!("never_played_days must be non-negative");
        }

        if self.draw.never_played_days > MAX_NEVER_PLAYED_DAYS {
            bail!(
                "never_played_days must be at most {}, got {}",
                MAX_NEVER_PLAYED_DAYS,
                self.draw.never_played_days
            );
        }

        if self.draw.max_count == 0 {
            bail!("max_count must be greater than 0");
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            bail!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.logging.level
            );
        }

        let valid_formats = ["json", "console"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            bail!(
                "Invalid log format '{}'. Must be one of: json, console",
                self.logging.format
            );
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            draw: DrawConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
