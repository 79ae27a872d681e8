//! Document Upload Handlers
//!
//! Files arrive as `multipart/form-data` with a `file` part and optional
//! `application_id` and `slot` text parts. The server runs the same checks
//! as the client before anything reaches storage.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::application::dto::request::{DeleteUploadRequest, UploadFields};
use crate::application::dto::response::{DeleteUploadResponse, UploadResponse};
use crate::domain::{DocumentSlot, LocalFile};
use crate::infrastructure::metrics;
use crate::shared::error::AppError;
use crate::shared::validation::validate_request;
use crate::startup::AppState;

/// Upload one document
/// POST /api/v1/uploads
///
/// Without a `slot` part the file gets the type and size checks only.
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut fields = UploadFields::default();
    let mut file = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                file = Some(LocalFile::new(file_name, content_type, bytes.to_vec()));
            }
            Some("application_id") => {
                let text = field.text().await.map_err(multipart_error)?;
                let id = Uuid::parse_str(text.trim())
                    .map_err(|_| AppError::BadRequest(format!("Invalid application id: {}", text)))?;
                fields.application_id = Some(id);
            }
            Some("slot") => {
                let text = field.text().await.map_err(multipart_error)?;
                fields.slot = Some(parse_slot(text.trim())?);
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| AppError::BadRequest("No file provided".into()))?;
    let slot = fields.slot.unwrap_or(DocumentSlot::PassportScan);

    let result = state
        .uploader
        .upload(&file, fields.application_id, slot, |percent| {
            tracing::debug!(file = %file.name, percent, "Upload progress");
        })
        .await;
    metrics::record_upload(
        slot.as_str(),
        result.as_ref().ok().map(|uploaded| uploaded.file_size),
    );

    Ok(Json(result?.into()))
}

/// Delete a stored document by URL
/// POST /api/v1/uploads/delete
pub async fn delete_file(
    State(state): State<AppState>,
    Json(body): Json<DeleteUploadRequest>,
) -> Result<Json<DeleteUploadResponse>, AppError> {
    validate_request(&body)?;

    let deleted = state.uploader.delete(&body.url).await?;
    Ok(Json(DeleteUploadResponse { deleted }))
}

fn parse_slot(value: &str) -> Result<DocumentSlot, AppError> {
    DocumentSlot::ALL
        .into_iter()
        .find(|slot| slot.as_str() == value)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown document slot: {}", value)))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::BadRequest(e.body_text())
    }
}
