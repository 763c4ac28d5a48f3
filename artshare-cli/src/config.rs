use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default backend API base. Same-origin deployments route `/api/v1` at the
/// load balancer; the CLI talks to a local server unless told otherwise.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";

/// Environment variable overriding the configured API base URL.
pub const API_URL_ENV: &str = "ARTSHARE_API_URL";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub schema_version: u32,
    pub api_base_url: String,
    pub author_name: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_version: 1,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            author_name: None,
        }
    }
}

impl Config {
    /// Load config from file, or return default when the file is absent
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .context("Failed to read config file")?;
            serde_json::from_str(&content).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }
        let content = serde_json::to_string_pretty(self)
            .context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")
    }

    /// Get the default config directory
    pub fn default_config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Failed to get home directory")?;
        Ok(home.join(".artshare"))
    }

    /// Get the default config file path
    pub fn default_config_path() -> Result<PathBuf> {
        Ok(Self::default_config_dir()?.join("config.json"))
    }

    /// Load config from the default location, falling back to defaults
    pub fn load_or_default() -> Self {
        let path = match Self::default_config_path() {
            Ok(path) => path,
            Err(e) => {
                debug!("Failed to resolve config path, using default: {}", e);
                return Self::default();
            }
        };
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                debug!("Failed to load config, using default: {}", e);
                Self::default()
            }
        }
    }

    /// Resolve the API base URL: the environment override wins over the
    /// configured value.
    pub fn resolve_api_base_url(&self) -> String {
        std::env::var(API_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| self.api_base_url.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.schema_version, 1);
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert!(config.author_name.is_none());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Config::default();
        config.api_base_url = "https://gallery.example.com/api/v1".to_string();
        config.author_name = Some("Ann".to_string());
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.api_base_url, "https://gallery.example.com/api/v1");
        assert_eq!(loaded.author_name, Some("Ann".to_string()));
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("missing.json")).unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_load_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path().unwrap();
        assert!(path.to_string_lossy().contains(".artshare"));
        assert!(path.to_string_lossy().ends_with("config.json"));
    }

    #[test]
    #[serial]
    fn test_resolve_api_base_url_prefers_env() {
        let config = Config::default();
        std::env::set_var(API_URL_ENV, "https://override.example.com/api/v1");
        assert_eq!(
            config.resolve_api_base_url(),
            "https://override.example.com/api/v1"
        );
        std::env::remove_var(API_URL_ENV);
    }

    #[test]
    #[serial]
    fn test_resolve_api_base_url_ignores_blank_env() {
        let config = Config::default();
        std::env::set_var(API_URL_ENV, "   ");
        assert_eq!(config.resolve_api_base_url(), DEFAULT_API_BASE_URL);
        std::env::remove_var(API_URL_ENV);
    }

    #[test]
    #[serial]
    fn test_resolve_api_base_url_without_env() {
        std::env::remove_var(API_URL_ENV);
        let config = Config::default();
        assert_eq!(config.resolve_api_base_url(), DEFAULT_API_BASE_URL);
    }
}
