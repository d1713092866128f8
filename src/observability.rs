//! In-process counters for the analysis pipeline

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics handle for recording counters
#[derive(Debug, Default)]
pub struct Metrics {
    images_analyzed: AtomicU64,
    detections: AtomicU64,
    classification_failures: AtomicU64,
    uploads_succeeded: AtomicU64,
    uploads_failed: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image_analyzed(&self) {
        self.images_analyzed.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "images_analyzed", "Metric incremented");
    }

    pub fn detection(&self) {
        self.detections.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "detections", "Metric incremented");
    }

    pub fn classification_failed(&self) {
        self.classification_failures.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "classification_failures", "Metric incremented");
    }

    pub fn upload_succeeded(&self) {
        self.uploads_succeeded.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "uploads_succeeded", "Metric incremented");
    }

    pub fn upload_failed(&self) {
        self.uploads_failed.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "uploads_failed", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            images_analyzed: self.images_analyzed.load(Ordering::Relaxed),
            detections: self.detections.load(Ordering::Relaxed),
            classification_failures: self.classification_failures.load(Ordering::Relaxed),
            uploads_succeeded: self.uploads_succeeded.load(Ordering::Relaxed),
            uploads_failed: self.uploads_failed.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub images_analyzed: u64,
    pub detections: u64,
    pub classification_failures: u64,
    pub uploads_succeeded: u64,
    pub uploads_failed: u64,
}
