//! Request DTOs
//!
//! Data structures for API request bodies and query strings. Draft bodies
//! are [`DraftPatch`](crate::domain::DraftPatch) and
//! [`VisaApplicationDraft`](crate::domain::VisaApplicationDraft) directly.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::DocumentSlot;

fn default_applicants() -> u32 {
    1
}

/// Pricing quote query
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QuoteQuery {
    pub visa_type: String,

    #[serde(default)]
    pub visa_duration: String,

    #[serde(default)]
    pub processing_time: String,

    #[serde(default = "default_applicants")]
    #[validate(range(min = 1, max = 10, message = "Number of applicants must be between 1 and 10"))]
    pub number_of_applicants: u32,
}

/// Non-file fields of a multipart upload
#[derive(Debug, Clone, Default)]
pub struct UploadFields {
    pub application_id: Option<Uuid>,
    pub slot: Option<DocumentSlot>,
}

/// Delete an uploaded file by URL
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DeleteUploadRequest {
    #[validate(length(min = 1, message = "URL is required"))]
    pub url: String,
}
