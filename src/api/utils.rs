//! Multipart helpers for the analyze endpoint

use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;

use crate::api::error::ApiError;
use crate::detection::UploadedImage;

/// Form field carrying the image
pub const IMAGE_FIELD: &str = "image";

/// Reads the uploaded image from the form.
///
/// Prefers the `image` field; otherwise takes the first field that carries a
/// filename. Returns `None` when the form has no file at all.
pub async fn read_image(mut multipart: Multipart) -> Result<Option<UploadedImage>, ApiError> {
    let mut fallback: Option<UploadedImage> = None;

    while let Some(field) = multipart.next_field().await.map_err(map_multipart_error)? {
        let is_image_field = field.name() == Some(IMAGE_FIELD);
        let file_name = field.file_name().map(str::to_owned);

        if !is_image_field && (file_name.is_none() || fallback.is_some()) {
            continue;
        }

        let data = field.bytes().await.map_err(map_multipart_error)?;
        let image = UploadedImage::new(data, file_name);

        if is_image_field {
            return Ok(Some(image));
        }
        fallback = Some(image);
    }

    Ok(fallback)
}

fn map_multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(err.body_text())
    } else {
        ApiError::InvalidImage(format!("Failed to read multipart: {}", err.body_text()))
    }
}
