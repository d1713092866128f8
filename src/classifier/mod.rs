//! Classifier client for the external image prediction service

mod client;
pub mod models;

pub use client::{ClassifierSettings, HttpClassifier};
pub use models::{ClassificationResponse, Prediction};

use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("classification timed out after {0:?}")]
    Timeout(Duration),

    #[error("classification request failed: {0}")]
    Request(String),

    #[error("classifier returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to deserialize classification response: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("invalid classifier configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, ClassifierError>;

/// Single-shot image classification.
///
/// Implementations make exactly one attempt per call; retries are the
/// caller's business (and the detector does not retry).
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, image: Bytes) -> Result<ClassificationResponse>;
}
