use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::any::Any;
use thiserror::Error;

use super::models::ErrorResponse;
use crate::detection::DetectError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidImage(String),
    #[error("image too large: {0}")]
    PayloadTooLarge(String),
    #[error("{0}")]
    Classification(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidImage(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Classification(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();

        // Client errors carry a plain message, server errors a JSON body
        if status.is_client_error() {
            return (status, self.to_string()).into_response();
        }

        let body = ErrorResponse {
            error: "Error processing image",
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<DetectError> for ApiError {
    fn from(value: DetectError) -> Self {
        match value {
            DetectError::InvalidInput(message) => ApiError::InvalidImage(message),
            DetectError::Classification(e) => ApiError::Classification(e.to_string()),
        }
    }
}

/// Answers a handler panic with the same 500 body as any unexpected failure
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown panic".to_string()
    };

    tracing::error!(panic = %message, "Request handler panicked");
    ApiError::Internal(message).into_response()
}
