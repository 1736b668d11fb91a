//! Application configuration.
//!
//! Defaults, then `config.json` from the platform config directory, then
//! environment overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Locale;
use directories::ProjectDirs;
use podcastr_api::{client::DEFAULT_BASE_URL, ClientConfig};
use podcastr_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Overrides [`AppConfig::api_base_url`].
pub const API_URL_ENV: &str = "PODCASTR_API_URL";
/// Overrides [`AppConfig::locale`].
pub const LOCALE_ENV: &str = "PODCASTR_LOCALE";

const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    /// Episodes requested for the home page.
    pub home_limit: u32,
    /// How many of them are shown as latest releases.
    pub latest_count: usize,
    pub request_timeout_secs: u64,
    pub cache_ttl_secs: u64,
    /// POSIX locale name used for dates, e.g. `pt_BR`.
    pub locale: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            home_limit: 12,
            latest_count: 2,
            request_timeout_secs: 30,
            cache_ttl_secs: 300,
            locale: "pt_BR".to_string(),
        }
    }
}

impl AppConfig {
    /// Where `config.json` lives on this platform.
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "podcastr", "Podcastr").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Load the effective configuration. Never fails: problems are logged
    /// and defaults used instead.
    pub fn load() -> Self {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => Self::from_file(&path).unwrap_or_else(|e| {
                warn!("Ignoring invalid config: {e}");
                Self::default()
            }),
            Some(path) => {
                debug!("No config file at {}", path.display());
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env(|name| std::env::var(name).ok());
        info!("API: {}, locale: {}", config.api_base_url, config.locale);
        config
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Apply overrides from `lookup` (the process environment in production).
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
        if let Some(locale) = lookup(LOCALE_ENV).filter(|v| !v.trim().is_empty()) {
            self.locale = locale.trim().to_string();
        }
    }

    /// The configured locale, or `pt_BR` when the name is unknown.
    pub fn locale(&self) -> Locale {
        self.locale.parse().unwrap_or_else(|_| {
            warn!("Unknown locale {:?}, using pt_BR", self.locale);
            Locale::pt_BR
        })
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api_base_url.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
            cache_ttl: Duration::from_secs(self.cache_ttl_secs),
            locale: self.locale(),
            ..ClientConfig::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("podcastr-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:3333");
        assert_eq!(config.home_limit, 12);
        assert_eq!(config.latest_count, 2);
        assert_eq!(config.locale(), Locale::pt_BR);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let path = temp_file("partial.json", r#"{ "api_base_url": "https://api.example.com" }"#);
        let config = AppConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.api_base_url, "https://api.example.com");
        assert_eq!(config.home_limit, 12);
        assert_eq!(config.cache_ttl_secs, 300);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let path = temp_file("broken.json", "{ not json");
        let result = AppConfig::from_file(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config.apply_env(|name| match name {
            API_URL_ENV => Some(" http://10.0.0.2:3333 ".to_string()),
            LOCALE_ENV => Some("en_US".to_string()),
            _ => None,
        });

        assert_eq!(config.api_base_url, "http://10.0.0.2:3333");
        assert_eq!(config.locale(), Locale::en_US);
    }

    #[test]
    fn test_blank_env_is_ignored_and_bad_locale_falls_back() {
        let mut config = AppConfig {
            locale: "xx_YY".to_string(),
            ..AppConfig::default()
        };
        config.apply_env(|_| Some("   ".to_string()));

        assert_eq!(config.api_base_url, "http://localhost:3333");
        assert_eq!(config.locale(), Locale::pt_BR);
    }

    #[test]
    fn test_client_config() {
        let config = AppConfig {
            request_timeout_secs: 5,
            ..AppConfig::default()
        };
        let client = config.client_config();
        assert_eq!(client.timeout, Duration::from_secs(5));
        assert_eq!(client.cache_ttl, Duration::from_secs(300));
    }
}
