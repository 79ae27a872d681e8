//! In-memory application repository.
//!
//! Used when no database is configured, and by tests. Each operation holds
//! the entry lock for its record, so the draft check and the status change
//! in `submit_draft` happen together.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::{ApplicationRecord, ApplicationRepository, ApplicationStatus, VisaApplicationDraft};
use crate::shared::error::AppError;

#[derive(Debug, Default)]
pub struct InMemoryApplicationRepository {
    records: DashMap<Uuid, ApplicationRecord>,
}

impl InMemoryApplicationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl ApplicationRepository for InMemoryApplicationRepository {
    async fn create(&self, record: &ApplicationRecord) -> Result<ApplicationRecord, AppError> {
        match self.records.entry(record.id) {
            Entry::Occupied(_) => Err(AppError::Conflict(format!(
                "Application {} already exists",
                record.id
            ))),
            Entry::Vacant(slot) => Ok(slot.insert(record.clone()).clone()),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ApplicationRecord>, AppError> {
        Ok(self.records.get(&id).map(|r| r.clone()))
    }

    async fn update_fields(
        &self,
        id: Uuid,
        fields: &VisaApplicationDraft,
    ) -> Result<Option<ApplicationRecord>, AppError> {
        Ok(self.records.get_mut(&id).map(|mut record| {
            record.fields = fields.clone();
            record.updated_at = Utc::now();
            record.clone()
        }))
    }

    async fn submit_draft(
        &self,
        id: Uuid,
        fields: &VisaApplicationDraft,
        submitted_at: DateTime<Utc>,
    ) -> Result<Option<ApplicationRecord>, AppError> {
        let Some(mut record) = self.records.get_mut(&id) else {
            return Ok(None);
        };
        if !record.status.is_draft() {
            return Ok(None);
        }

        record.fields = fields.clone();
        record.status = ApplicationStatus::Submitted;
        record.submitted_at = Some(submitted_at);
        record.updated_at = submitted_at;
        Ok(Some(record.clone()))
    }
}
