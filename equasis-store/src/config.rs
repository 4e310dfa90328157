//! Configuration management.
//!
//! The configuration lives in `config.json` under the platform config
//! directory. Every field has a default, so a missing file or a file with
//! only some keys loads fine. The password is never written here.

use std::path::{Path, PathBuf};
use std::time::Duration;

use equasis_fetch::{DEFAULT_BASE_URL, FetchSettings, RetryPolicy};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::persistence::{default_config_path, load_json, save_json};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Portal base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Retry settings.
    #[serde(default)]
    pub retry: RetryConfig,
    /// Pacing between requests.
    #[serde(default)]
    pub pacing: PacingConfig,
    /// Batch behaviour.
    #[serde(default)]
    pub batch: BatchConfig,
    /// Equasis account name. The password is kept in the system keychain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Retry settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Delay before the first retry, in milliseconds.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Backoff multiplier.
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    /// Delay cap, in milliseconds.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Relative jitter.
    #[serde(default = "default_jitter")]
    pub jitter: f64,
}

/// Pauses between requests, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Between the tabs of one vessel.
    #[serde(default = "default_pause_ms")]
    pub tab_pause_ms: u64,
    /// Between two entities of a batch.
    #[serde(default = "default_pause_ms")]
    pub entity_pause_ms: u64,
}

/// Batch behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Keep going after a failed key.
    #[serde(default = "default_true")]
    pub continue_on_error: bool,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_multiplier() -> f64 {
    2.0
}

fn default_max_delay_ms() -> u64 {
    60_000
}

fn default_jitter() -> f64 {
    0.25
}

fn default_pause_ms() -> u64 {
    1000
}

fn default_true() -> bool {
    true
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            multiplier: default_multiplier(),
            max_delay_ms: default_max_delay_ms(),
            jitter: default_jitter(),
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            tab_pause_ms: default_pause_ms(),
            entity_pause_ms: default_pause_ms(),
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            continue_on_error: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            retry: RetryConfig::default(),
            pacing: PacingConfig::default(),
            batch: BatchConfig::default(),
            username: None,
        }
    }
}

impl Config {
    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        default_config_path()
    }

    /// Loads configuration from the default path.
    pub async fn load() -> Result<Self, StoreError> {
        Self::load_from(&Self::default_path()).await
    }

    /// Loads configuration from a specific path.
    ///
    /// A missing file yields the defaults; an unreadable or invalid one is an
    /// error.
    pub async fn load_from(path: &Path) -> Result<Self, StoreError> {
        let config: Self = match load_json(path).await {
            Ok(config) => config,
            Err(e) if e.is_not_found() => {
                debug!(path = %path.display(), "Config file not found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e),
        };

        config.validate()?;
        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Saves configuration to the default path.
    pub async fn save(&self) -> Result<(), StoreError> {
        self.save_to(&Self::default_path()).await
    }

    /// Saves configuration to a specific path.
    pub async fn save_to(&self, path: &Path) -> Result<(), StoreError> {
        self.validate()?;
        save_json(path, self).await?;
        info!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Checks values that would make every request fail.
    pub fn validate(&self) -> Result<(), StoreError> {
        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            return Err(StoreError::Config(format!(
                "base_url must be an http(s) URL, got {:?}",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(StoreError::Config("timeout_secs must be positive".to_string()));
        }
        Ok(())
    }

    /// Converts to fetch settings.
    pub fn to_fetch_settings(&self) -> FetchSettings {
        let retry = RetryPolicy::new(self.retry.max_retries)
            .with_base_delay(Duration::from_millis(self.retry.base_delay_ms))
            .with_multiplier(self.retry.multiplier)
            .with_max_delay(Duration::from_millis(self.retry.max_delay_ms))
            .with_jitter(self.retry.jitter);

        FetchSettings::default()
            .with_base_url(self.base_url.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_retry(retry)
            .with_pacing(
                Duration::from_millis(self.pacing.tab_pause_ms),
                Duration::from_millis(self.pacing.entity_pause_ms),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_fetch_defaults() {
        assert_eq!(Config::default().to_fetch_settings(), FetchSettings::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = serde_json::from_str(
            r#"{"retry": {"max_retries": 5}, "batch": {"continue_on_error": false}}"#,
        )
        .unwrap();

        assert_eq!(config.retry.max_retries, 5);
        assert_eq!(config.retry.base_delay_ms, 1000);
        assert!(!config.batch.continue_on_error);
        assert_eq!(config.pacing, PacingConfig::default());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_to_fetch_settings() {
        let config = Config {
            timeout_secs: 10,
            retry: RetryConfig {
                max_retries: 1,
                base_delay_ms: 250,
                multiplier: 3.0,
                max_delay_ms: 5000,
                jitter: 0.0,
            },
            pacing: PacingConfig {
                tab_pause_ms: 0,
                entity_pause_ms: 1500,
            },
            ..Config::default()
        };
        let settings = config.to_fetch_settings();

        assert_eq!(settings.timeout, Duration::from_secs(10));
        assert_eq!(settings.retry.total_attempts(), 2);
        assert_eq!(settings.retry.base_delay, Duration::from_millis(250));
        assert_eq!(settings.tab_pause, Duration::ZERO);
        assert_eq!(settings.entity_pause, Duration::from_millis(1500));
    }

    #[test]
    fn test_password_is_not_a_config_field() {
        let config: Config =
            serde_json::from_str(r#"{"username": "ops@example.com", "password": "x"}"#).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("password"));
        assert!(json.contains("ops@example.com"));
    }

    #[tokio::test]
    async fn test_missing_file_loads_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).await.unwrap();
        assert_eq!(config, Config::default());
    }

    #[tokio::test]
    async fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("equasis").join("config.json");
        let config = Config {
            username: Some("ops@example.com".to_string()),
            ..Config::default()
        };

        config.save_to(&path).await.unwrap();
        assert_eq!(Config::load_from(&path).await.unwrap(), config);
    }

    #[tokio::test]
    async fn test_invalid_values_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        tokio::fs::write(&path, r#"{"base_url": "ftp://example.com"}"#).await.unwrap();

        let err = Config::load_from(&path).await.unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[tokio::test]
    async fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        tokio::fs::write(&path, "{not json").await.unwrap();

        let err = Config::load_from(&path).await.unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }
}
