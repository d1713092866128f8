use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{info, warn};

use super::{models::HealthResponse, state::AppState, utils};
use crate::api::error::ApiError;
use crate::detection::AnalysisResult;

/// Image analysis endpoint (POST /api/camera/analyze)
///
/// ## Flow:
/// 1. Read the image from the multipart form (400 if missing or empty)
/// 2. Classify it; a classifier failure answers 500 `{error, message}`
/// 3. Store the image when the target tag is detected
/// 4. Return the analysis, including any storage error
pub async fn analyze_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    info!("Image analysis request received");

    let multipart = multipart.map_err(|rejection| {
        warn!(error = %rejection, "Rejected analysis request");
        ApiError::InvalidImage("No image provided".to_string())
    })?;

    let image = utils::read_image(multipart)
        .await?
        .ok_or_else(|| ApiError::InvalidImage("No image provided".to_string()))?;

    let result = state.detector.analyze(image).await?;

    Ok(Json(result))
}

/// Health check endpoint (GET /health)
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        metrics: state.metrics.snapshot(),
    };

    (StatusCode::OK, Json(response))
}
