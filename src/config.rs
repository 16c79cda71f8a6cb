//! Configuration for sidebyside

use crate::source::SourceConfig;
use crate::storage::CacheConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that switches the fragment cache on or off
pub const CACHE_ENV: &str = "SIDEBYSIDE_CACHE";
/// Environment variable overriding the cache database path
pub const CACHE_PATH_ENV: &str = "SIDEBYSIDE_CACHE_PATH";
/// Environment variable overriding the wiki base URL
pub const BASE_URL_ENV: &str = "SIDEBYSIDE_BASE_URL";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Where pages come from
    #[serde(default)]
    pub source: SourceConfig,

    /// Fragment cache settings
    #[serde(default)]
    pub cache: CacheConfig,
}

impl Config {
    /// Default location: `<config dir>/sidebyside/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(crate::APP_NAME).join("config.toml"))
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    }

    /// Load an explicit file, else the default file if present, else defaults;
    /// then apply environment overrides
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::load(&path)?,
                None => Self::default(),
            },
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply overrides from a variable lookup
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(flag) = lookup(CACHE_ENV) {
            self.cache.enabled = parse_flag(&flag);
        }
        if let Some(path) = lookup(CACHE_PATH_ENV).filter(|p| !p.is_empty()) {
            self.cache.path = Some(PathBuf::from(path));
        }
        if let Some(url) = lookup(BASE_URL_ENV).filter(|u| !u.is_empty()) {
            self.source.base_url = url;
        }
    }

    /// Serialize as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_lowercase().as_str(),
        "0" | "off" | "false" | "no" | ""
    )
}
