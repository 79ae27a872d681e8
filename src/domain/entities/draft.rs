//! Visa application draft entity.
//!
//! The working record held by the wizard while the applicant fills in the
//! form. The same shape is persisted as the field set of an
//! [`ApplicationRecord`](super::ApplicationRecord).
//!
//! Field-level rules for a complete application are declared with
//! `validator` attributes here; cross-field and time-relative rules live in
//! [`crate::domain::services::validation`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::services::validation::{PASSPORT_NUMBER_REGEX, PHONE_REGEX};
use crate::domain::value_objects::{ProcessingTime, VisaDuration, VisaType};

/// Complete application data, split the way the wizard splits its steps.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VisaApplicationDraft {
    pub service_type: ServiceType,
    pub personal_info: PersonalInfo,
}

impl VisaApplicationDraft {
    /// Serialize for local persistence. Pending local files are written as
    /// `null`; only uploaded URLs survive a reload.
    pub fn to_snapshot(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Step 1: what is being applied for.
///
/// Defaults: one applicant, tourist visa, everything else unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ServiceType {
    #[validate(range(min = 1, max = 10, message = "Number of applicants must be between 1 and 10"))]
    pub number_of_applicants: u32,

    pub visa_type: VisaType,

    #[validate(required(message = "Please select visa duration"))]
    pub visa_duration: Option<VisaDuration>,

    #[validate(length(min = 1, max = 500, message = "Purpose of visit must be 1-500 characters"))]
    pub purpose_of_visit: String,

    #[validate(required(message = "Entry date is required"))]
    pub entry_date: Option<NaiveDate>,

    #[validate(required(message = "Exit date is required"))]
    pub exit_date: Option<NaiveDate>,

    #[validate(required(message = "Please select processing time"))]
    pub processing_time: Option<ProcessingTime>,
}

impl Default for ServiceType {
    fn default() -> Self {
        Self {
            number_of_applicants: 1,
            visa_type: VisaType::Tourist,
            visa_duration: None,
            purpose_of_visit: String::new(),
            entry_date: None,
            exit_date: None,
            processing_time: None,
        }
    }
}

/// Step 2: who is applying.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
pub struct PersonalInfo {
    #[validate(length(min = 1, max = 100, message = "Full name must be 1-100 characters"))]
    pub full_name: String,

    #[validate(required(message = "Date of birth is required"))]
    pub date_of_birth: Option<NaiveDate>,

    #[validate(length(min = 1, message = "Nationality is required"))]
    pub nationality: String,

    #[validate(
        length(min = 1, max = 20, message = "Passport number must be 1-20 characters"),
        regex(path = *PASSPORT_NUMBER_REGEX, message = "Passport number must contain only letters and numbers")
    )]
    pub passport_number: String,

    #[validate(required(message = "Passport issue date is required"))]
    pub passport_issue_date: Option<NaiveDate>,

    #[validate(required(message = "Passport expiry date is required"))]
    pub passport_expiry_date: Option<NaiveDate>,

    #[validate(length(min = 1, message = "Passport issuing country is required"))]
    pub passport_issuing_country: String,

    #[validate(nested)]
    pub contact_info: ContactInfo,

    #[validate(nested)]
    pub emergency_contact: EmergencyContact,

    pub file_uploads: FileUploads,

    pub agreements: Agreements,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
pub struct ContactInfo {
    #[validate(length(min = 1, max = 100, message = "Full name must be 1-100 characters"))]
    pub full_name: String,

    #[validate(
        length(min = 1, message = "Phone number is required"),
        regex(path = *PHONE_REGEX, message = "Invalid phone number format")
    )]
    pub phone_number: String,

    #[validate(
        length(min = 1, message = "Email address is required"),
        email(message = "Invalid email format")
    )]
    pub email_address: String,

    #[validate(length(min = 1, max = 500, message = "Current address must be 1-500 characters"))]
    pub current_address: String,

    #[validate(length(min = 1, max = 500, message = "Vietnam address must be 1-500 characters"))]
    pub vietnam_address: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
pub struct EmergencyContact {
    #[validate(length(min = 1, max = 100, message = "Emergency contact name must be 1-100 characters"))]
    pub full_name: String,

    #[validate(
        length(min = 1, message = "Emergency contact phone is required"),
        regex(path = *PHONE_REGEX, message = "Invalid phone number format")
    )]
    pub phone_number: String,

    #[validate(
        length(min = 1, message = "Emergency contact email is required"),
        email(message = "Invalid email format")
    )]
    pub email_address: String,

    #[validate(length(min = 1, max = 50, message = "Relationship must be 1-50 characters"))]
    pub relationship: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Agreements {
    pub information_confirmation: bool,
    pub terms_and_conditions: bool,
}

/// Which document slot a file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentSlot {
    PassportScan,
    PortraitPhoto,
}

impl DocumentSlot {
    pub const ALL: [DocumentSlot; 2] = [DocumentSlot::PassportScan, DocumentSlot::PortraitPhoto];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PassportScan => "passport_scan",
            Self::PortraitPhoto => "portrait_photo",
        }
    }

    /// Only the portrait slot gets the photo dimension checks.
    pub fn requires_photo_checks(&self) -> bool {
        matches!(self, Self::PortraitPhoto)
    }
}

impl std::fmt::Display for DocumentSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A file picked on the client that has not been uploaded yet.
#[derive(Clone, PartialEq, Eq)]
pub struct LocalFile {
    /// Original filename, including extension.
    pub name: String,

    /// MIME type as reported by the picker.
    pub content_type: String,

    pub bytes: Vec<u8>,
}

impl LocalFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Text after the last dot, or the whole name when there is none.
    pub fn extension(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or_default()
    }

    /// Name without its extension.
    pub fn base_name(&self) -> &str {
        self.name
            .rsplit_once('.')
            .map(|(base, _)| base)
            .unwrap_or_default()
    }

    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }
}

impl std::fmt::Debug for LocalFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalFile")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Contents of a document slot: either still on the client, or already
/// stored and reachable by URL.
#[derive(Debug, Clone, PartialEq)]
pub enum FileSlot {
    Local(LocalFile),
    Uploaded(String),
}

impl FileSlot {
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Uploaded(url) => Some(url),
            Self::Local(_) => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Local(_))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FileUploads {
    #[serde(default, with = "file_slot_url")]
    pub passport_scan: Option<FileSlot>,

    #[serde(default, with = "file_slot_url")]
    pub portrait_photo: Option<FileSlot>,
}

impl FileUploads {
    pub fn get(&self, slot: DocumentSlot) -> Option<&FileSlot> {
        match slot {
            DocumentSlot::PassportScan => self.passport_scan.as_ref(),
            DocumentSlot::PortraitPhoto => self.portrait_photo.as_ref(),
        }
    }

    pub fn set(&mut self, slot: DocumentSlot, value: Option<FileSlot>) {
        match slot {
            DocumentSlot::PassportScan => self.passport_scan = value,
            DocumentSlot::PortraitPhoto => self.portrait_photo = value,
        }
    }

    /// Slots holding files that still need uploading, in upload order.
    pub fn pending(&self) -> impl Iterator<Item = (DocumentSlot, &LocalFile)> + '_ {
        DocumentSlot::ALL
            .into_iter()
            .filter_map(|slot| match self.get(slot) {
                Some(FileSlot::Local(file)) => Some((slot, file)),
                _ => None,
            })
    }
}

/// Slots serialize as their URL. Local files have no portable
/// representation and are written as `null`.
mod file_slot_url {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::FileSlot;

    pub fn serialize<S>(slot: &Option<FileSlot>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match slot.as_ref().and_then(FileSlot::url) {
            Some(url) => serializer.serialize_some(url),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<FileSlot>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let url = Option::<String>::deserialize(deserializer)?;
        Ok(url.filter(|u| !u.is_empty()).map(FileSlot::Uploaded))
    }
}
