//! Application configuration management.
//!
//! Configuration is stored at `~/.config/placeboard/config.json` and holds the
//! backend URL, fetch timeouts and the last used username. Environment
//! variables override the file:
//!
//! - `PLACEBOARD_API_URL`
//! - `PLACEBOARD_FETCH_TIMEOUT_SECS`
//! - `PLACEBOARD_TOKEN` (read by `Config::env_token`, never saved)

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::client::REQUEST_TIMEOUT_SECS;
use crate::cache::CacheConfig;
use crate::kinds::ResourceKind;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "placeboard";

/// Config file name
const CONFIG_FILE: &str = "config.json";

const DEFAULT_API_URL: &str = "http://localhost:8000/api";

const ENV_API_URL: &str = "PLACEBOARD_API_URL";
const ENV_FETCH_TIMEOUT: &str = "PLACEBOARD_FETCH_TIMEOUT_SECS";
const ENV_TOKEN: &str = "PLACEBOARD_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    /// Upper bound on one in-flight fetch, per kind unless overridden
    pub fetch_timeout_secs: u64,
    /// Per-kind overrides of `fetch_timeout_secs`
    pub kind_timeouts_secs: HashMap<ResourceKind, u64>,
    pub last_username: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            fetch_timeout_secs: REQUEST_TIMEOUT_SECS,
            kind_timeouts_secs: HashMap::new(),
            last_username: None,
        }
    }
}

impl Config {
    /// Load from disk, then apply environment overrides
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents).context("Failed to parse config file")?
        } else {
            Self::default()
        };
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_API_URL).filter(|u| !u.is_empty()) {
            self.api_base_url = url;
        }
        if let Some(raw) = lookup(ENV_FETCH_TIMEOUT) {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => self.fetch_timeout_secs = secs,
                _ => warn!(value = %raw, "Ignoring invalid {}", ENV_FETCH_TIMEOUT),
            }
        }
    }

    /// Bearer token from the environment, if set
    pub fn env_token() -> Option<String> {
        std::env::var(ENV_TOKEN).ok().filter(|t| !t.is_empty())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Zero timeouts would fail every fetch at once, so they fall back to
    /// the default
    pub fn cache_config(&self) -> CacheConfig {
        let fetch_timeout_secs = if self.fetch_timeout_secs > 0 {
            self.fetch_timeout_secs
        } else {
            warn!("Ignoring zero fetch_timeout_secs");
            REQUEST_TIMEOUT_SECS
        };
        let mut cache_config = CacheConfig::new(Duration::from_secs(fetch_timeout_secs));
        for (kind, &secs) in &self.kind_timeouts_secs {
            if secs == 0 {
                warn!(kind = %kind, "Ignoring zero fetch timeout");
                continue;
            }
            cache_config = cache_config.with_kind_timeout(*kind, Duration::from_secs(secs));
        }
        cache_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_config() {
        let json = r#"{"api_base_url":"https://tpo.example.edu/api","kind_timeouts_secs":{"all_students":90}}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.api_base_url, "https://tpo.example.edu/api");
        assert_eq!(config.fetch_timeout_secs, REQUEST_TIMEOUT_SECS);

        let cache_config = config.cache_config();
        assert_eq!(cache_config.timeout_for(ResourceKind::AllStudents), Duration::from_secs(90));
        assert_eq!(
            cache_config.timeout_for(ResourceKind::Years),
            Duration::from_secs(REQUEST_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_env(|name| match name {
            ENV_API_URL => Some("https://override.example.edu".to_string()),
            ENV_FETCH_TIMEOUT => Some("5".to_string()),
            _ => None,
        });
        assert_eq!(config.api_base_url, "https://override.example.edu");
        assert_eq!(config.fetch_timeout_secs, 5);
    }

    #[test]
    fn test_invalid_env_timeout_ignored() {
        let mut config = Config::default();
        config.apply_env(|name| (name == ENV_FETCH_TIMEOUT).then(|| "0".to_string()));
        assert_eq!(config.fetch_timeout_secs, REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn test_zero_timeouts_fall_back_to_default() {
        let json = r#"{"fetch_timeout_secs":0,"kind_timeouts_secs":{"rounds":0,"dashboard":10}}"#;
        let config: Config = serde_json::from_str(json).unwrap();

        let cache_config = config.cache_config();
        let default = Duration::from_secs(REQUEST_TIMEOUT_SECS);
        assert_eq!(cache_config.timeout_for(ResourceKind::Rounds), default);
        assert_eq!(cache_config.timeout_for(ResourceKind::Years), default);
        assert_eq!(cache_config.timeout_for(ResourceKind::Dashboard), Duration::from_secs(10));
    }
}
