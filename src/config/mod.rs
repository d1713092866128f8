//! Configuration management for badgerwatch
//!
//! Settings are layered from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use badgerwatch::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("Server listening on: {}", config.server.bind_addr);
//! ```
//!
//! # Environment Variables
//!
//! Any key can be overridden with `BADGERWATCH__<section>__<key>`:
//! - `BADGERWATCH__SERVER__BIND_ADDR=0.0.0.0:9000`
//! - `BADGERWATCH__CLASSIFIER__ENDPOINT=https://...`
//! - `BADGERWATCH__STORAGE__PROVIDER=dropbox`
//!
//! Secrets are read only from the environment (or `.env`):
//! `CLASSIFIER_PREDICTION_KEY` and `DROPBOX_ACCESS_TOKEN`.
//!
//! # Configuration File
//!
//! Loaded from `config/badgerwatch.toml` unless `BADGERWATCH_CONFIG` points elsewhere.

mod models;
mod sources;
mod validation;

pub use models::{ClassifierConfig, Config, ServerConfig, StorageConfig, StorageProvider};
pub use validation::ValidationError;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// # Errors
    ///
    /// Returns an error if the file is malformed or validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(None)
    }

    /// Same as [`Config::load`], with an optional explicit file path
    pub fn load_with(path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let config = sources::load(path)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path, without environment secrets
    ///
    /// Useful for testing with custom configuration files.
    pub fn load_from_path(path: PathBuf) -> Result<Self, config::ConfigError> {
        sources::load_from_sources(path)
    }

    /// Check an already assembled configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate(self)
    }
}
