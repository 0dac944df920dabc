//! Console configuration
//!
//! Defaults, optionally overlaid by a JSON file and then by environment
//! variables.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info};

pub const CONFIG_PATH_VAR: &str = "DCF_CONFIG";
pub const API_URL_VAR: &str = "DCF_API_URL";
pub const LOG_DIR_VAR: &str = "DCF_LOG_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the valuation service; `/dcf` is appended.
    pub api_base_url: String,
    pub countdown_seed_secs: u32,
    pub countdown_tick_ms: u64,
    pub banner_ttl_ms: u64,
    pub connect_timeout_ms: u64,
    pub log_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            countdown_seed_secs: 30,
            countdown_tick_ms: 1000,
            banner_ttl_ms: 3000,
            connect_timeout_ms: 5000,
            log_dir: PathBuf::from("logs"),
        }
    }
}

impl AppConfig {
    pub fn countdown_tick(&self) -> Duration {
        Duration::from_millis(self.countdown_tick_ms)
    }

    pub fn banner_ttl(&self) -> Duration {
        Duration::from_millis(self.banner_ttl_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Overlay values from `lookup`, normally `std::env::var`
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_URL_VAR).filter(|v| !v.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
        if let Some(dir) = lookup(LOG_DIR_VAR).filter(|v| !v.trim().is_empty()) {
            self.log_dir = PathBuf::from(dir.trim());
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api_base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                field: "api_base_url",
                reason: format!("expected an http(s) URL, got '{}'", url),
            });
        }
        if self.countdown_tick_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "countdown_tick_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

pub struct ConfigLoader {
    path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// Loader for the file named by `DCF_CONFIG`, if set
    pub fn from_env() -> Self {
        Self::new(std::env::var_os(CONFIG_PATH_VAR).map(PathBuf::from))
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Read the file layer only. A missing file yields defaults.
    pub async fn load_file(&self) -> Result<AppConfig, ConfigError> {
        let Some(path) = &self.path else {
            return Ok(AppConfig::default());
        };
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found; using defaults");
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(path).await.map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })
    }

    /// File layer plus environment overrides, validated
    pub async fn load(&self) -> Result<AppConfig, ConfigError> {
        let mut config = self.load_file().await?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        info!(api = %config.api_base_url, "Configuration loaded");
        Ok(config)
    }
}
