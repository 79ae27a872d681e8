//! The two-step application wizard.
//!
//! Holds the in-memory draft and the current step, gates step transitions
//! on validation, autosaves locally on every change and orchestrates
//! draft saves and the final submission.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::autosave::{Autosaver, DEFAULT_AUTOSAVE_DELAY};
use super::session::{FormSession, LocalStoreError};
use crate::application::services::{
    ApplicationError, ApplicationService, FileUploadClient, UploadError,
};
use crate::domain::services::validation::{
    validate_application, validate_service_type, ValidationReport,
};
use crate::domain::{
    ApplicationRecord, ApplicationStatus, DocumentSlot, DraftPatch, FileSlot, LocalFile,
    VisaApplicationDraft,
};

/// Wizard steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStep {
    ServiceType,
    PersonalInfo,
}

impl FormStep {
    pub const ALL: [FormStep; 2] = [FormStep::ServiceType, FormStep::PersonalInfo];

    /// 1-based position, for the progress indicator.
    pub fn number(&self) -> usize {
        match self {
            Self::ServiceType => 1,
            Self::PersonalInfo => 2,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::ServiceType => "Service Type",
            Self::PersonalInfo => "Personal Information",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::ServiceType => "Choose visa type and processing time",
            Self::PersonalInfo => "Enter your personal details and upload documents",
        }
    }

    fn next(&self) -> Option<FormStep> {
        match self {
            Self::ServiceType => Some(Self::PersonalInfo),
            Self::PersonalInfo => None,
        }
    }

    fn previous(&self) -> Option<FormStep> {
        match self {
            Self::ServiceType => None,
            Self::PersonalInfo => Some(Self::ServiceType),
        }
    }

    pub fn is_last(&self) -> bool {
        self.next().is_none()
    }
}

/// Wizard errors. [`FormError::user_message`] gives the text shown to the
/// applicant.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("Validation failed: {0}")]
    Validation(ValidationReport),

    #[error("Application not found")]
    NotFound,

    #[error("Application is {0}")]
    Conflict(ApplicationStatus),

    #[error("Failed to upload {slot}: {source}")]
    Upload {
        slot: DocumentSlot,
        #[source]
        source: UploadError,
    },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Submission is only possible from the last step")]
    NotAtLastStep,

    #[error(transparent)]
    LocalStore(#[from] LocalStoreError),
}

impl FormError {
    pub fn user_message(&self) -> String {
        match self {
            FormError::Validation(_) => "Please correct the highlighted fields and try again.".into(),
            FormError::NotFound => {
                "We could not find your application. Please save it again.".into()
            }
            FormError::Conflict(_) => "This application has already been submitted.".into(),
            FormError::Upload { slot, source } => {
                let document = match slot {
                    DocumentSlot::PassportScan => "passport scan",
                    DocumentSlot::PortraitPhoto => "portrait photo",
                };
                format!("Failed to upload {}: {}", document, source)
            }
            FormError::NotAtLastStep => "Please complete all steps before submitting.".into(),
            FormError::Transport(_) | FormError::LocalStore(_) => {
                "Something went wrong. Please try again.".into()
            }
        }
    }
}

impl From<ApplicationError> for FormError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::NotFound => FormError::NotFound,
            ApplicationError::Conflict(status) => FormError::Conflict(status),
            ApplicationError::Validation(report) => FormError::Validation(report),
            ApplicationError::Internal(msg) => FormError::Transport(msg),
        }
    }
}

/// Collaborators of a wizard.
#[derive(Clone)]
pub struct FormDependencies {
    pub records: Arc<dyn ApplicationService>,
    pub uploader: FileUploadClient,
    pub session: FormSession,
    pub autosave_delay: Duration,
}

impl FormDependencies {
    pub fn new(
        records: Arc<dyn ApplicationService>,
        uploader: FileUploadClient,
        session: FormSession,
    ) -> Self {
        Self {
            records,
            uploader,
            session,
            autosave_delay: DEFAULT_AUTOSAVE_DELAY,
        }
    }
}

/// One applicant's wizard.
pub struct ApplicationForm {
    step: FormStep,
    draft: VisaApplicationDraft,
    session: FormSession,
    records: Arc<dyn ApplicationService>,
    uploader: FileUploadClient,
    autosave: Autosaver,
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

impl ApplicationForm {
    /// Start a wizard. Without `initial` data the last locally saved
    /// snapshot is restored, if any. Must be called within a tokio runtime.
    pub fn new(deps: FormDependencies, initial: Option<VisaApplicationDraft>) -> Self {
        let draft = match initial {
            Some(draft) => draft,
            None => Self::restore_snapshot(&deps.session),
        };

        Self {
            step: FormStep::ServiceType,
            draft,
            autosave: Autosaver::spawn(deps.session.clone(), deps.autosave_delay),
            session: deps.session,
            records: deps.records,
            uploader: deps.uploader,
        }
    }

    /// Start a wizard on the server record remembered in the session. Falls
    /// back to [`ApplicationForm::new`] when there is none or it is gone.
    pub async fn resume(deps: FormDependencies) -> Result<Self, FormError> {
        let Some(id) = deps.session.application_id()? else {
            return Ok(Self::new(deps, None));
        };

        match deps.records.get_by_id(id).await {
            Ok(record) if record.status.is_draft() => Ok(Self::new(deps, Some(record.fields))),
            Ok(record) => Err(FormError::Conflict(record.status)),
            Err(ApplicationError::NotFound) => {
                tracing::warn!(application_id = %id, "Stored application no longer exists");
                deps.session.forget_application_id()?;
                Ok(Self::new(deps, None))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Snapshots are read as a patch over the defaults, so snapshots missing
    /// newer fields still load.
    fn restore_snapshot(session: &FormSession) -> VisaApplicationDraft {
        let snapshot = match session.load_draft() {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => return VisaApplicationDraft::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read saved draft");
                return VisaApplicationDraft::default();
            }
        };

        match serde_json::from_str::<DraftPatch>(&snapshot) {
            Ok(patch) => VisaApplicationDraft::from_patch(patch),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable saved draft");
                VisaApplicationDraft::default()
            }
        }
    }

    pub fn step(&self) -> FormStep {
        self.step
    }

    pub fn draft(&self) -> &VisaApplicationDraft {
        &self.draft
    }

    pub fn application_id(&self) -> Result<Option<Uuid>, FormError> {
        Ok(self.session.application_id()?)
    }

    /// Edit the draft in place and schedule an autosave.
    pub fn update<F>(&mut self, edit: F)
    where
        F: FnOnce(&mut VisaApplicationDraft),
    {
        edit(&mut self.draft);
        self.schedule_autosave();
    }

    pub fn apply_patch(&mut self, patch: DraftPatch) {
        self.update(|draft| draft.apply(patch));
    }

    /// Put a picked file into a document slot, or empty the slot.
    pub fn set_file(&mut self, slot: DocumentSlot, file: Option<LocalFile>) {
        self.update(|draft| {
            draft
                .personal_info
                .file_uploads
                .set(slot, file.map(FileSlot::Local))
        });
    }

    fn schedule_autosave(&self) {
        match self.draft.to_snapshot() {
            Ok(snapshot) => self.autosave.schedule(snapshot),
            Err(e) => tracing::warn!(error = %e, "Failed to serialize draft"),
        }
    }

    /// Full-mode rules for the current step. The last step checks the whole
    /// application.
    pub fn validate_current_step(&self) -> ValidationReport {
        match self.step {
            FormStep::ServiceType => validate_service_type(&self.draft.service_type, today()),
            FormStep::PersonalInfo => validate_application(&self.draft, today()),
        }
    }

    pub fn can_proceed(&self) -> bool {
        self.validate_current_step().is_valid()
    }

    /// Advance when the current step validates. A no-op on the last step.
    pub fn next(&mut self) -> Result<FormStep, FormError> {
        let Some(next) = self.step.next() else {
            return Ok(self.step);
        };

        self.validate_current_step()
            .into_result()
            .map_err(FormError::Validation)?;

        self.step = next;
        Ok(self.step)
    }

    /// Go back one step. A no-op on the first step.
    pub fn previous(&mut self) -> FormStep {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        self.step
    }

    /// Persist the draft on the server: create the record on first save,
    /// update it afterwards. Files not yet uploaded are left out.
    pub async fn save_as_draft(&mut self) -> Result<ApplicationRecord, FormError> {
        let patch = DraftPatch::from(&self.draft);

        let record = match self.session.application_id()? {
            Some(id) => self.records.update(id, patch).await?,
            None => {
                let record = self.records.create_draft(patch).await?;
                self.session.set_application_id(record.id)?;
                record
            }
        };

        tracing::info!(application_id = %record.id, "Draft saved");
        Ok(record)
    }

    /// Submit from the last step: make sure a record exists, upload pending
    /// files, submit the assembled application and clear local state. The
    /// wizard then starts over on an empty draft.
    pub async fn submit(&mut self) -> Result<ApplicationRecord, FormError> {
        self.submit_with_progress(|_, _| {}).await
    }

    /// [`ApplicationForm::submit`], reporting upload progress per slot.
    pub async fn submit_with_progress<F>(
        &mut self,
        mut on_progress: F,
    ) -> Result<ApplicationRecord, FormError>
    where
        F: FnMut(DocumentSlot, u8) + Send,
    {
        if !self.step.is_last() {
            return Err(FormError::NotAtLastStep);
        }
        validate_application(&self.draft, today())
            .into_result()
            .map_err(FormError::Validation)?;

        let id = match self.session.application_id()? {
            Some(id) => id,
            None => {
                let record = self
                    .records
                    .create_draft(DraftPatch::from(&self.draft))
                    .await?;
                self.session.set_application_id(record.id)?;
                record.id
            }
        };

        let pending: Vec<(DocumentSlot, LocalFile)> = self
            .draft
            .personal_info
            .file_uploads
            .pending()
            .map(|(slot, file)| (slot, file.clone()))
            .collect();

        let slots: Vec<DocumentSlot> = pending.iter().map(|(slot, _)| *slot).collect();
        let results = self
            .uploader
            .upload_many(&pending, Some(id), |index, p, _| on_progress(slots[index], p))
            .await;

        // Files uploaded before a failure keep their URLs in the draft.
        for (result, slot) in results.into_iter().zip(slots) {
            let uploaded = result.map_err(|source| FormError::Upload { slot, source })?;
            self.update(|draft| {
                draft
                    .personal_info
                    .file_uploads
                    .set(slot, Some(FileSlot::Uploaded(uploaded.url)))
            });
        }

        let record = self.records.submit(id, self.draft.clone()).await?;
        self.autosave.clear().await;
        self.draft = VisaApplicationDraft::default();
        self.step = FormStep::ServiceType;

        tracing::info!(application_id = %record.id, "Application submitted from wizard");
        Ok(record)
    }

    /// Write any pending autosave now.
    pub async fn flush(&self) {
        self.autosave.flush().await;
    }
}
