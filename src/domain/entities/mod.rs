//! # Domain Entities
//!
//! Core domain entities of the visa intake service.
//!
//! - **VisaApplicationDraft**: the application field set, as edited in the
//!   wizard and as stored on a record
//! - **DraftPatch**: typed partial update over a draft
//! - **ApplicationRecord**: the server-owned, persisted application
//!
//! ## Repository Traits
//!
//! `ApplicationRepository` defines record persistence. It is implemented in
//! the infrastructure layer.

mod application;
mod draft;
mod patch;

pub use application::{ApplicationRecord, ApplicationRepository, ApplicationStatus};

pub use draft::{
    Agreements, ContactInfo, DocumentSlot, EmergencyContact, FileSlot, FileUploads, LocalFile,
    PersonalInfo, ServiceType, VisaApplicationDraft,
};

pub use patch::{
    AgreementsPatch, ContactInfoPatch, DraftPatch, EmergencyContactPatch, FileUploadsPatch,
    PersonalInfoPatch, ServiceTypePatch,
};
