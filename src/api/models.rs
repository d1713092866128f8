//! Wire models for the HTTP API.
//!
//! `POST /api/camera/analyze` takes a `multipart/form-data` body with the
//! image in a field named `image` and answers with an
//! [`AnalysisResult`](crate::detection::AnalysisResult):
//!
//! ```json
//! {
//!   "isHoneyBadger": true,
//!   "confidence": 0.93,
//!   "fullResponse": { "id": "...", "predictions": [ ... ] },
//!   "processingTimeMs": 412,
//!   "dropboxPath": "/honey-badger/honey_badger_20240501_100000_1a2b3c4d.jpg"
//! }
//! ```
//!
//! `dropboxUploadError` replaces `dropboxPath` when the upload failed.

use serde::Serialize;

use crate::observability::MetricsSnapshot;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub metrics: MetricsSnapshot,
}
