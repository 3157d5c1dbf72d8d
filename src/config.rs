use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::engine::SessionTiming;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Row-store base URL - overridden by env SUPABASE_URL.
    #[serde(default = "default_store_url")]
    pub url: String,
    /// Anon API key - loaded from env SUPABASE_ANON_KEY, never stored in the file.
    #[serde(default)]
    pub api_key: String,
    /// Table holding the user rows.
    #[serde(default = "default_table")]
    pub table: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Accrual recompute cadence in seconds.
    #[serde(default = "default_tick_secs")]
    pub tick_interval_secs: u64,
    /// Remote persistence cadence in seconds.
    #[serde(default = "default_sync_secs")]
    pub sync_interval_secs: u64,
}

impl EngineConfig {
    pub fn timing(&self) -> SessionTiming {
        SessionTiming {
            tick_interval: Duration::from_secs(self.tick_interval_secs),
            sync_interval: Duration::from_secs(self.sync_interval_secs),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_store_url() -> String {
    // supabase local-dev default
    "http://localhost:54321".to_string()
}
fn default_table() -> String {
    "Users".to_string()
}
fn default_tick_secs() -> u64 {
    60
}
fn default_sync_secs() -> u64 {
    300
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: default_store_url(),
            api_key: String::new(),
            table: default_table(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_secs: default_tick_secs(),
            sync_interval_secs: default_sync_secs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load config from a TOML file, then overlay environment variables for
    /// the store endpoint and secret.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;

        if let Ok(url) = std::env::var("SUPABASE_URL") {
            config.store.url = url;
        }
        if let Ok(key) = std::env::var("SUPABASE_ANON_KEY") {
            config.store.api_key = key;
        }

        Ok(config)
    }

    fn parse(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }
}
