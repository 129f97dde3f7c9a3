use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument, warn};

use super::{types::UploadResponse, UPLOAD_FIELD, UPLOAD_URL_PREFIX};
use crate::shared::{AppError, AppState};

/// HTTP handler for image uploads
///
/// POST /api/upload (multipart, field "file")
/// Returns the URL the file is served from
#[instrument(name = "upload_file", skip(state, multipart))]
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let original_name = field.file_name().map(str::to_owned);
        let bytes = field.bytes().await.map_err(multipart_error)?;

        let file_name = state
            .upload_store
            .save(original_name.as_deref(), &bytes)
            .await?;

        info!(file_name = %file_name, size = bytes.len(), "File uploaded");
        return Ok(Json(UploadResponse {
            image_url: format!("{}/{}", UPLOAD_URL_PREFIX, file_name),
        }));
    }

    warn!("Upload request without a file field");
    Err(AppError::NoFileProvided)
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        warn!(error = %e, "Upload exceeds the configured body limit");
        AppError::PayloadTooLarge(e.body_text())
    } else {
        warn!(error = %e, "Malformed multipart body");
        AppError::Validation(e.body_text())
    }
}
