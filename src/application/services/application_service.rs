//! Application Record Service
//!
//! Create, read, update and submit over application records. Owns the
//! one-way `DRAFT` → `SUBMITTED` transition.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::services::validation::{
    validate_application, validate_draft_patch, ValidationReport,
};
use crate::domain::{
    ApplicationRecord, ApplicationRepository, ApplicationStatus, DraftPatch, VisaApplicationDraft,
};
use crate::shared::error::AppError;

/// Application record service trait
#[async_trait]
pub trait ApplicationService: Send + Sync {
    /// Create a `DRAFT` record from the default table with `patch` applied.
    async fn create_draft(&self, patch: DraftPatch) -> Result<ApplicationRecord, ApplicationError>;

    /// Get a record by id
    async fn get_by_id(&self, id: Uuid) -> Result<ApplicationRecord, ApplicationError>;

    /// Merge `patch` into a draft record
    async fn update(&self, id: Uuid, patch: DraftPatch) -> Result<ApplicationRecord, ApplicationError>;

    /// Replace the field set with `fields` and move the record to `SUBMITTED`
    async fn submit(
        &self,
        id: Uuid,
        fields: VisaApplicationDraft,
    ) -> Result<ApplicationRecord, ApplicationError>;
}

/// Application service errors
#[derive(Debug, thiserror::Error)]
pub enum ApplicationError {
    #[error("Application not found")]
    NotFound,

    #[error("Application has already been submitted (status {0})")]
    Conflict(ApplicationStatus),

    #[error("Validation failed: {0}")]
    Validation(ValidationReport),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AppError> for ApplicationError {
    fn from(e: AppError) -> Self {
        ApplicationError::Internal(e.to_string())
    }
}

impl From<ApplicationError> for AppError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::NotFound => AppError::NotFound("Application not found".into()),
            ApplicationError::Conflict(status) => {
                AppError::Conflict(format!("Application is {} and can no longer change", status))
            }
            ApplicationError::Validation(report) => AppError::Validation(report),
            ApplicationError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// ApplicationService implementation
pub struct ApplicationServiceImpl<R>
where
    R: ApplicationRepository,
{
    repo: Arc<R>,
}

impl<R> ApplicationServiceImpl<R>
where
    R: ApplicationRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    async fn find(&self, id: Uuid) -> Result<ApplicationRecord, ApplicationError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(ApplicationError::NotFound)
    }

    async fn find_draft(&self, id: Uuid) -> Result<ApplicationRecord, ApplicationError> {
        let record = self.find(id).await?;
        if !record.status.is_draft() {
            tracing::warn!(application_id = %id, status = %record.status, "Rejected change to non-draft application");
            return Err(ApplicationError::Conflict(record.status));
        }
        Ok(record)
    }
}

#[async_trait]
impl<R> ApplicationService for ApplicationServiceImpl<R>
where
    R: ApplicationRepository + 'static,
{
    async fn create_draft(&self, patch: DraftPatch) -> Result<ApplicationRecord, ApplicationError> {
        validate_draft_patch(&patch, Utc::now().date_naive())
            .into_result()
            .map_err(ApplicationError::Validation)?;

        let record = ApplicationRecord::new_draft(VisaApplicationDraft::from_patch(patch));
        let record = self.repo.create(&record).await?;

        tracing::info!(application_id = %record.id, "Draft application created");
        Ok(record)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<ApplicationRecord, ApplicationError> {
        self.find(id).await
    }

    async fn update(&self, id: Uuid, patch: DraftPatch) -> Result<ApplicationRecord, ApplicationError> {
        validate_draft_patch(&patch, Utc::now().date_naive())
            .into_result()
            .map_err(ApplicationError::Validation)?;

        let record = self.find_draft(id).await?;
        let mut fields = record.fields;
        fields.apply(patch);

        let updated = self
            .repo
            .update_fields(id, &fields)
            .await?
            .ok_or(ApplicationError::NotFound)?;

        tracing::debug!(application_id = %id, "Draft application updated");
        Ok(updated)
    }

    async fn submit(
        &self,
        id: Uuid,
        fields: VisaApplicationDraft,
    ) -> Result<ApplicationRecord, ApplicationError> {
        self.find_draft(id).await?;

        let mut report = validate_application(&fields, Utc::now().date_naive());
        for (slot, _) in fields.personal_info.file_uploads.pending() {
            report.add(
                format!("personal_info.file_uploads.{}", slot),
                "File must be uploaded before submission",
            );
        }
        report.into_result().map_err(ApplicationError::Validation)?;

        match self.repo.submit_draft(id, &fields, Utc::now()).await? {
            Some(record) => {
                tracing::info!(application_id = %id, "Application submitted");
                Ok(record)
            }
            // Lost a race with another submit, or the record vanished.
            None => match self.repo.find_by_id(id).await? {
                Some(record) => Err(ApplicationError::Conflict(record.status)),
                None => Err(ApplicationError::NotFound),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FileSlot, LocalFile, ProcessingTime, VisaDuration, VisaType};
    use crate::infrastructure::repositories::InMemoryApplicationRepository;
    use chrono::{Datelike, Days, NaiveDate};
    use pretty_assertions::assert_eq;

    fn service() -> ApplicationServiceImpl<InMemoryApplicationRepository> {
        ApplicationServiceImpl::new(Arc::new(InMemoryApplicationRepository::new()))
    }

    fn complete_fields() -> VisaApplicationDraft {
        let today = Utc::now().date_naive();
        let entry = today + Days::new(30);
        let mut draft = VisaApplicationDraft::default();

        let st = &mut draft.service_type;
        st.visa_type = VisaType::Business;
        st.visa_duration = Some(VisaDuration::MultipleThreeMonths);
        st.purpose_of_visit = "Trade fair".into();
        st.entry_date = Some(entry);
        st.exit_date = Some(entry + Days::new(10));
        st.processing_time = Some(ProcessingTime::Urgent);

        let pi = &mut draft.personal_info;
        pi.full_name = "Jane Doe".into();
        pi.date_of_birth = NaiveDate::from_ymd_opt(today.year() - 30, 3, 1);
        pi.nationality = "Canada".into();
        pi.passport_number = "AB1234567".into();
        pi.passport_issue_date = Some(today - Days::new(365));
        pi.passport_expiry_date = Some(today + Days::new(3650));
        pi.passport_issuing_country = "Canada".into();
        pi.contact_info.full_name = "Jane Doe".into();
        pi.contact_info.phone_number = "+1 555 123 4567".into();
        pi.contact_info.email_address = "jane@example.com".into();
        pi.contact_info.current_address = "1 Main St".into();
        pi.contact_info.vietnam_address = "2 Le Loi".into();
        pi.emergency_contact.full_name = "John Doe".into();
        pi.emergency_contact.phone_number = "+1 555 765 4321".into();
        pi.emergency_contact.email_address = "john@example.com".into();
        pi.emergency_contact.relationship = "Brother".into();
        pi.file_uploads.passport_scan = Some(FileSlot::Uploaded("/uploads/scan.png".into()));
        pi.file_uploads.portrait_photo = Some(FileSlot::Uploaded("/uploads/photo.png".into()));
        pi.agreements.information_confirmation = true;
        pi.agreements.terms_and_conditions = true;
        draft
    }

    #[tokio::test]
    async fn test_create_draft_applies_defaults() {
        let service = service();
        let mut patch = DraftPatch::default();
        patch.personal_info.full_name = Some("Jane".into());

        let record = service.create_draft(patch).await.unwrap();

        assert_eq!(record.status, ApplicationStatus::Draft);
        assert_eq!(record.fields.service_type.number_of_applicants, 1);
        assert_eq!(record.fields.service_type.visa_type, VisaType::Tourist);
        assert_eq!(record.fields.personal_info.full_name, "Jane");
        assert!(record.submitted_at.is_none());
    }

    #[tokio::test]
    async fn test_create_draft_rejects_invalid_present_field() {
        let mut patch = DraftPatch::default();
        patch.personal_info.contact_info.email_address = Some("not-an-email".into());

        let err = service().create_draft(patch).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Validation(_)));
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_not_found() {
        let err = service().get_by_id(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound));
    }

    #[tokio::test]
    async fn test_update_merges_patch() {
        let service = service();
        let mut patch = DraftPatch::default();
        patch.service_type.purpose_of_visit = Some("Holiday".into());
        let record = service.create_draft(patch).await.unwrap();

        let mut patch = DraftPatch::default();
        patch.service_type.number_of_applicants = Some(3);
        let updated = service.update(record.id, patch).await.unwrap();

        assert_eq!(updated.fields.service_type.number_of_applicants, 3);
        assert_eq!(updated.fields.service_type.purpose_of_visit, "Holiday");
    }

    #[tokio::test]
    async fn test_submit_moves_draft_to_submitted() {
        let service = service();
        let record = service.create_draft(DraftPatch::default()).await.unwrap();

        let submitted = service.submit(record.id, complete_fields()).await.unwrap();

        assert_eq!(submitted.status, ApplicationStatus::Submitted);
        assert!(submitted.submitted_at.is_some());
        assert_eq!(submitted.fields, complete_fields());
    }

    #[tokio::test]
    async fn test_second_submit_conflicts_and_leaves_record_untouched() {
        let service = service();
        let record = service.create_draft(DraftPatch::default()).await.unwrap();
        let first = service.submit(record.id, complete_fields()).await.unwrap();

        let mut other = complete_fields();
        other.service_type.purpose_of_visit = "Changed".into();
        let err = service.submit(record.id, other).await.unwrap_err();

        assert!(matches!(err, ApplicationError::Conflict(ApplicationStatus::Submitted)));
        assert_eq!(service.get_by_id(record.id).await.unwrap(), first);
    }

    #[tokio::test]
    async fn test_update_after_submit_conflicts() {
        let service = service();
        let record = service.create_draft(DraftPatch::default()).await.unwrap();
        service.submit(record.id, complete_fields()).await.unwrap();

        let mut patch = DraftPatch::default();
        patch.service_type.number_of_applicants = Some(5);
        let err = service.update(record.id, patch).await.unwrap_err();

        assert!(matches!(err, ApplicationError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_submit_rejects_incomplete_fields() {
        let service = service();
        let record = service.create_draft(DraftPatch::default()).await.unwrap();

        let err = service
            .submit(record.id, VisaApplicationDraft::default())
            .await
            .unwrap_err();

        match err {
            ApplicationError::Validation(report) => {
                assert!(report.message_for("service_type.visa_duration").is_some());
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(service.get_by_id(record.id).await.unwrap().status.is_draft());
    }

    #[tokio::test]
    async fn test_submit_rejects_pending_local_files() {
        let service = service();
        let record = service.create_draft(DraftPatch::default()).await.unwrap();
        let mut fields = complete_fields();
        fields.personal_info.file_uploads.portrait_photo =
            Some(FileSlot::Local(LocalFile::new("p.png", "image/png", vec![1])));

        let err = service.submit(record.id, fields).await.unwrap_err();

        match err {
            ApplicationError::Validation(report) => {
                assert_eq!(
                    report.message_for("personal_info.file_uploads.portrait_photo"),
                    Some("File must be uploaded before submission")
                );
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_submit_unknown_id_is_not_found() {
        let err = service()
            .submit(Uuid::new_v4(), complete_fields())
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound));
    }

    #[test]
    fn test_error_mapping() {
        assert!(matches!(
            AppError::from(ApplicationError::NotFound),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            AppError::from(ApplicationError::Conflict(ApplicationStatus::Submitted)),
            AppError::Conflict(_)
        ));
    }
}
