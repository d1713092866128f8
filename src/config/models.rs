use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    /// Largest accepted request body, in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 5134))
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024 // 10 MB
}

/// Prediction endpoint configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub endpoint: String,
    #[serde(default = "default_classifier_timeout_secs")]
    pub timeout_secs: u64,
    /// Prediction key (loaded from environment, not from config file)
    #[serde(skip)]
    pub prediction_key: Option<String>,
}

impl ClassifierConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            timeout_secs: default_classifier_timeout_secs(),
            prediction_key: None,
        }
    }
}

fn default_classifier_timeout_secs() -> u64 {
    30
}

/// Storage provider type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProvider {
    Dropbox,
    #[default]
    Memory,
    Local,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub provider: StorageProvider,
    /// Root directory for the local provider
    pub root: Option<PathBuf>,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_content_base")]
    pub content_base: String,
    #[serde(default = "default_storage_timeout_secs")]
    pub timeout_secs: u64,
    /// Dropbox access token (loaded from environment, not from config file)
    #[serde(skip)]
    pub access_token: Option<String>,
}

impl StorageConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: StorageProvider::default(),
            root: None,
            api_base: default_api_base(),
            content_base: default_content_base(),
            timeout_secs: default_storage_timeout_secs(),
            access_token: None,
        }
    }
}

fn default_api_base() -> String {
    "https://api.dropboxapi.com".to_string()
}

fn default_content_base() -> String {
    "https://content.dropboxapi.com".to_string()
}

fn default_storage_timeout_secs() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.bind_addr.to_string(), "0.0.0.0:5134");
        assert_eq!(config.server.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.classifier.timeout(), Duration::from_secs(30));
        assert_eq!(config.storage.provider, StorageProvider::Memory);
        assert_eq!(config.storage.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn secrets_are_never_serialized() {
        let mut config = Config::default();
        config.classifier.prediction_key = Some("secret-key".into());
        config.storage.access_token = Some("secret-token".into());

        let rendered = toml::to_string(&config).unwrap();
        assert!(!rendered.contains("secret"));
    }
}
