use anyhow::{Context, Result};
use eventsched_core::{OverlapScope, StoreConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub events: EventsConfig,
}

/// Listen address
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

/// SQLite database file and pool settings
#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    /// Database file; relative paths resolve against the working directory
    #[serde(default = "default_database_path")]
    pub path: String,

    #[serde(default = "default_pool_size")]
    pub pool_size: u32,

    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u32,
}

#[derive(Debug, Default, Deserialize)]
pub struct EventsConfig {
    /// Which stored events a new one-time event is checked against
    #[serde(default)]
    pub overlap_scope: OverlapScope,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_database_path() -> String {
    "events.db".to_string()
}

fn default_pool_size() -> u32 {
    StoreConfig::default().pool_size
}

fn default_busy_timeout_ms() -> u32 {
    StoreConfig::default().busy_timeout_ms
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            path: default_database_path(),
            pool_size: default_pool_size(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl DatabaseConfig {
    pub fn resolved_path(&self) -> PathBuf {
        expand_path(&self.path)
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            pool_size: self.pool_size,
            busy_timeout_ms: self.busy_timeout_ms,
        }
    }
}

/// Get the config file path (~/.config/eventsched/config.toml)
pub fn config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("Could not determine config directory")?
        .join("eventsched");
    Ok(config_dir.join("config.toml"))
}

/// Load config from an explicit path, or from the default location.
///
/// A missing file at the default location means "use defaults"; a missing
/// file that was asked for explicitly is an error.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found at {}", path.display());
            }
            path.to_path_buf()
        }
        None => {
            let path = config_path()?;
            if !path.exists() {
                return Ok(Config::default());
            }
            path
        }
    };

    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;

    let config: Config = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

    Ok(config)
}

/// Expand ~ in paths to the home directory
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
