//! Application record entity and repository trait.
//!
//! Maps to the `applications` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::draft::VisaApplicationDraft;
use crate::shared::error::AppError;

/// Record lifecycle status matching the database VARCHAR constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    #[default]
    Draft,
    Submitted,
    UnderReview,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    /// Convert from database string representation. Unknown values map to
    /// `Draft`.
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "SUBMITTED" => Self::Submitted,
            "UNDER_REVIEW" => Self::UnderReview,
            "APPROVED" => Self::Approved,
            "REJECTED" => Self::Rejected,
            _ => Self::Draft,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Submitted => "SUBMITTED",
            Self::UnderReview => "UNDER_REVIEW",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Only drafts can be edited or submitted.
    pub fn is_draft(&self) -> bool {
        matches!(self, Self::Draft)
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Server-side representation of a visa application.
///
/// Maps to the `applications` table:
/// - id: UUID PRIMARY KEY
/// - status: VARCHAR(20) NOT NULL DEFAULT 'DRAFT'
/// - fields: JSONB NOT NULL (the application field set)
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - updated_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - submitted_at: TIMESTAMPTZ NULL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    /// Primary key
    pub id: Uuid,

    /// Lifecycle status
    pub status: ApplicationStatus,

    /// Field set as last saved. Document slots only ever hold URLs here.
    pub fields: VisaApplicationDraft,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// Last modification time
    pub updated_at: DateTime<Utc>,

    /// Set once, when the record leaves `Draft`
    pub submitted_at: Option<DateTime<Utc>>,
}

impl ApplicationRecord {
    /// A fresh draft record around `fields`.
    pub fn new_draft(fields: VisaApplicationDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            status: ApplicationStatus::Draft,
            fields,
            created_at: now,
            updated_at: now,
            submitted_at: None,
        }
    }
}

/// Repository trait for application record persistence.
///
/// Each call is atomic for a single record id.
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Persist a new record.
    async fn create(&self, record: &ApplicationRecord) -> Result<ApplicationRecord, AppError>;

    /// Find a record by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ApplicationRecord>, AppError>;

    /// Overwrite the field set of a record regardless of its status.
    /// Returns `None` if the id is unknown.
    async fn update_fields(
        &self,
        id: Uuid,
        fields: &VisaApplicationDraft,
    ) -> Result<Option<ApplicationRecord>, AppError>;

    /// Store `fields`, set status `SUBMITTED` and stamp `submitted_at`, but
    /// only if the record is currently a draft. Returns `None` when no draft
    /// with this id exists; the record is left untouched in that case.
    async fn submit_draft(
        &self,
        id: Uuid,
        fields: &VisaApplicationDraft,
        submitted_at: DateTime<Utc>,
    ) -> Result<Option<ApplicationRecord>, AppError>;
}
