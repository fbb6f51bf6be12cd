//! Application configuration management.
//!
//! Configuration is stored at `~/.config/authdesk/config.json` and holds
//! the API base URL, the token storage backend and the request timeout.
//! Environment variables (optionally from a `.env` file) override the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::DEFAULT_REQUEST_TIMEOUT_SECS;
use crate::auth::StorageBackend;

/// Application name used for config/data directory paths
const APP_NAME: &str = "authdesk";

/// Config file name
const CONFIG_FILE: &str = "config.json";

pub const ENV_API_URL: &str = "AUTHDESK_API_URL";
pub const ENV_STORAGE: &str = "AUTHDESK_STORAGE";
pub const ENV_EMAIL: &str = "AUTHDESK_EMAIL";

fn default_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api_url: Option<String>,
    #[serde(default)]
    pub storage: StorageBackend,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Pre-filled login email; only ever set from the environment
    #[serde(skip)]
    pub default_email: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            storage: StorageBackend::default(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            default_email: None,
        }
    }
}

impl Config {
    /// Load the config file (if any) and apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    /// Apply overrides from a variable lookup (the process environment in production)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api_url = Some(url.trim().to_string());
        }

        if let Some(raw) = lookup(ENV_STORAGE) {
            match StorageBackend::parse(&raw) {
                Some(backend) => self.storage = backend,
                None => warn!(value = %raw, "Unknown storage backend, keeping {:?}", self.storage),
            }
        }

        if let Some(email) = lookup(ENV_EMAIL).filter(|v| !v.is_empty()) {
            self.default_email = Some(email);
        }
    }

    /// The API base URL, required before any request can be made
    pub fn api_url(&self) -> Result<&str> {
        self.api_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "No API URL configured. Set {} or api_url in {}",
                    ENV_API_URL,
                    Self::config_path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|_| CONFIG_FILE.to_string())
                )
            })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory for the token storage file and logs
    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    pub fn log_dir(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().expect("temp dir");
        let config = Config::load_from(&dir.path().join(CONFIG_FILE)).expect("load");
        assert!(config.api_url.is_none());
        assert_eq!(config.storage, StorageBackend::File);
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert!(config.api_url().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(
            &path,
            r#"{"api_url":"http://10.0.2.2:8000/api","storage":"keyring","request_timeout_secs":5}"#,
        )
        .expect("write");

        let config = Config::load_from(&path).expect("load");
        assert_eq!(config.api_url().expect("url"), "http://10.0.2.2:8000/api");
        assert_eq!(config.storage, StorageBackend::Keyring);
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_file_is_error() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "{ not json").expect("write");
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = Config {
            api_url: Some("http://file.example".to_string()),
            ..Config::default()
        };
        config.apply_overrides(lookup_from(&[
            (ENV_API_URL, " http://env.example/api "),
            (ENV_STORAGE, "memory"),
            (ENV_EMAIL, "ada@example.com"),
        ]));

        assert_eq!(config.api_url().expect("url"), "http://env.example/api");
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.default_email.as_deref(), Some("ada@example.com"));
    }

    #[test]
    fn test_unknown_storage_override_is_ignored() {
        let mut config = Config::default();
        config.apply_overrides(lookup_from(&[(ENV_STORAGE, "floppy"), (ENV_API_URL, "")]));
        assert_eq!(config.storage, StorageBackend::File);
        assert!(config.api_url.is_none());
    }

    #[test]
    fn test_zero_timeout_clamped() {
        let config = Config {
            request_timeout_secs: 0,
            ..Config::default()
        };
        assert_eq!(config.request_timeout(), Duration::from_secs(1));
    }
}
