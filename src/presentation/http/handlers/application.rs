//! Application Record Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::application::dto::response::ApplicationResponse;
use crate::domain::{DraftPatch, VisaApplicationDraft};
use crate::infrastructure::metrics;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Create a draft record
/// POST /api/v1/applications
pub async fn create_application(
    State(state): State<AppState>,
    Json(patch): Json<DraftPatch>,
) -> Result<(StatusCode, Json<ApplicationResponse>), AppError> {
    let result = state.applications.create_draft(patch).await;
    metrics::record_application_event("created", result.is_ok());

    Ok((StatusCode::CREATED, Json(result?.into())))
}

/// Get a record
/// GET /api/v1/applications/{id}
pub async fn get_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApplicationResponse>, AppError> {
    let record = state.applications.get_by_id(id).await?;
    Ok(Json(record.into()))
}

/// Merge a partial update into a draft
/// PATCH /api/v1/applications/{id}
pub async fn update_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<DraftPatch>,
) -> Result<Json<ApplicationResponse>, AppError> {
    let result = state.applications.update(id, patch).await;
    metrics::record_application_event("updated", result.is_ok());

    Ok(Json(result?.into()))
}

/// Submit a draft with its final field set
/// POST /api/v1/applications/{id}/submit
pub async fn submit_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(fields): Json<VisaApplicationDraft>,
) -> Result<Json<ApplicationResponse>, AppError> {
    let result = state.applications.submit(id, fields).await;
    metrics::record_application_event("submitted", result.is_ok());

    Ok(Json(result?.into()))
}
