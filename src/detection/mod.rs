//! Image analysis workflow: classify, decide, and store detections.
//!
//! [`Detector::analyze`] runs one upload through the pipeline. Classification
//! failures fail the request; storage failures are recorded on the result and
//! the request still succeeds.

mod buffer;
pub mod naming;
pub mod rules;

pub use buffer::ImageBuffer;
pub use rules::{DETECTION_THRESHOLD, TARGET_TAG, Verdict};

use bytes::Bytes;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{error, info};

use crate::classifier::{ClassificationResponse, Classifier, ClassifierError};
use crate::observability::Metrics;
use crate::storage::StorageClient;

/// One uploaded image, alive for a single request
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub data: Bytes,
    pub file_name: Option<String>,
}

impl UploadedImage {
    pub fn new(data: impl Into<Bytes>, file_name: Option<String>) -> Self {
        Self {
            data: data.into(),
            file_name,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Outcome of analysing one image
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(rename = "isHoneyBadger")]
    pub is_target_detected: bool,
    pub confidence: f64,
    #[serde(rename = "fullResponse")]
    pub raw_classification: ClassificationResponse,
    pub processing_time_ms: u64,
    #[serde(rename = "dropboxPath", skip_serializing_if = "Option::is_none")]
    pub stored_path: Option<String>,
    #[serde(rename = "dropboxUploadError", skip_serializing_if = "Option::is_none")]
    pub storage_error: Option<String>,
}

impl AnalysisResult {
    /// Attach the storage outcome; exactly one of path or error ends up set
    fn record_storage<E: std::fmt::Display>(&mut self, outcome: Result<String, E>) {
        match outcome {
            Ok(path) => {
                self.stored_path = Some(path);
                self.storage_error = None;
            }
            Err(e) => {
                self.stored_path = None;
                self.storage_error = Some(e.to_string());
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum DetectError {
    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Classification(#[from] ClassifierError),
}

/// Request-scoped orchestration over shared, immutable clients
#[derive(Clone)]
pub struct Detector {
    classifier: Arc<dyn Classifier>,
    storage: StorageClient,
    metrics: Arc<Metrics>,
}

impl Detector {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        storage: StorageClient,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            classifier,
            storage,
            metrics,
        }
    }

    pub async fn analyze(&self, image: UploadedImage) -> Result<AnalysisResult, DetectError> {
        if image.is_empty() {
            return Err(DetectError::InvalidInput("No image provided".to_string()));
        }

        let size = image.len();
        info!(size, file_name = ?image.file_name, "Analyzing image");
        self.metrics.image_analyzed();

        let mut buffer = ImageBuffer::new(image.data);

        let started = Instant::now();
        let classification = match self.classifier.classify(buffer.read_remaining()).await {
            Ok(classification) => classification,
            Err(e) => {
                self.metrics.classification_failed();
                error!(size, error = %e, "Classification failed");
                return Err(e.into());
            }
        };
        let processing_time_ms = started.elapsed().as_millis() as u64;

        let verdict = rules::evaluate(&classification);
        info!(
            processing_time_ms,
            detected = verdict.detected,
            confidence = verdict.confidence,
            "Analysis completed"
        );

        let mut result = AnalysisResult {
            is_target_detected: verdict.detected,
            confidence: verdict.confidence,
            raw_classification: classification,
            processing_time_ms,
            stored_path: None,
            storage_error: None,
        };

        if verdict.detected {
            self.metrics.detection();

            let file_name =
                naming::generate_file_name(image.file_name.as_deref(), chrono::Utc::now());
            buffer.rewind();

            let outcome = self
                .storage
                .upload_image(buffer.read_remaining(), &file_name)
                .await;
            match &outcome {
                Ok(path) => {
                    self.metrics.upload_succeeded();
                    info!(path = %path, "Detected image stored");
                }
                Err(e) => {
                    self.metrics.upload_failed();
                    error!(
                        file_name = %file_name,
                        error = %e,
                        "Failed to store image, but analysis was successful"
                    );
                }
            }
            result.record_storage(outcome);
        }

        Ok(result)
    }
}
