//! Structured partial updates over [`VisaApplicationDraft`].
//!
//! A patch mirrors the draft with every field optional. Merge rule per
//! field: `None` leaves the target untouched, `Some(v)` overwrites it.
//! Nullable draft fields (dates, selections, document URLs) are
//! `Option<Option<T>>` in the patch so that `Some(None)` clears them; on the
//! wire a missing key is `None` and an explicit `null` is `Some(None)`.
//!
//! Patches are also the input of draft creation and draft saves, so the
//! partial-mode field rules are declared on them.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use super::draft::{
    Agreements, ContactInfo, EmergencyContact, FileSlot, FileUploads, PersonalInfo, ServiceType,
    VisaApplicationDraft,
};
use crate::domain::services::validation::{PASSPORT_NUMBER_REGEX, PHONE_REGEX};
use crate::domain::value_objects::{ProcessingTime, VisaDuration, VisaType};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
pub struct DraftPatch {
    #[serde(default)]
    #[validate(nested)]
    pub service_type: ServiceTypePatch,

    #[serde(default)]
    #[validate(nested)]
    pub personal_info: PersonalInfoPatch,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
pub struct ServiceTypePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 10, message = "Number of applicants must be between 1 and 10"))]
    pub number_of_applicants: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visa_type: Option<VisaType>,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub visa_duration: Option<Option<VisaDuration>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "Purpose of visit must be 1-500 characters"))]
    pub purpose_of_visit: Option<String>,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub entry_date: Option<Option<NaiveDate>>,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub exit_date: Option<Option<NaiveDate>>,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<Option<ProcessingTime>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
pub struct PersonalInfoPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100, message = "Full name must be 1-100 characters"))]
    pub full_name: Option<String>,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<Option<NaiveDate>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(
        length(max = 20, message = "Passport number must be 1-20 characters"),
        regex(path = *PASSPORT_NUMBER_REGEX, message = "Passport number must contain only letters and numbers")
    )]
    pub passport_number: Option<String>,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub passport_issue_date: Option<Option<NaiveDate>>,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub passport_expiry_date: Option<Option<NaiveDate>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passport_issuing_country: Option<String>,

    #[serde(default)]
    #[validate(nested)]
    pub contact_info: ContactInfoPatch,

    #[serde(default)]
    #[validate(nested)]
    pub emergency_contact: EmergencyContactPatch,

    #[serde(default)]
    pub file_uploads: FileUploadsPatch,

    #[serde(default)]
    pub agreements: AgreementsPatch,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
pub struct ContactInfoPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100, message = "Full name must be 1-100 characters"))]
    pub full_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number format"))]
    pub phone_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "Invalid email format"))]
    pub email_address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "Current address must be 1-500 characters"))]
    pub current_address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "Vietnam address must be 1-500 characters"))]
    pub vietnam_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
pub struct EmergencyContactPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100, message = "Emergency contact name must be 1-100 characters"))]
    pub full_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number format"))]
    pub phone_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "Invalid email format"))]
    pub email_address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 50, message = "Relationship must be 1-50 characters"))]
    pub relationship: Option<String>,
}

/// Document URLs. Files that are still local never travel in a patch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FileUploadsPatch {
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub passport_scan: Option<Option<String>>,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub portrait_photo: Option<Option<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AgreementsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub information_confirmation: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms_and_conditions: Option<bool>,
}

/// Maps a present-but-null value to `Some(None)`; `#[serde(default)]` covers
/// the missing-key case.
fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn merge<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

fn blank_to_none(value: &mut Option<String>) {
    if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
        *value = None;
    }
}

impl VisaApplicationDraft {
    /// Merge `patch` into this draft.
    pub fn apply(&mut self, patch: DraftPatch) {
        self.service_type.apply(patch.service_type);
        self.personal_info.apply(patch.personal_info);
    }

    /// A new draft built from the default table with `patch` applied.
    pub fn from_patch(patch: DraftPatch) -> Self {
        let mut draft = Self::default();
        draft.apply(patch);
        draft
    }
}

impl ServiceType {
    pub fn apply(&mut self, patch: ServiceTypePatch) {
        merge(&mut self.number_of_applicants, patch.number_of_applicants);
        merge(&mut self.visa_type, patch.visa_type);
        merge(&mut self.visa_duration, patch.visa_duration);
        merge(&mut self.purpose_of_visit, patch.purpose_of_visit);
        merge(&mut self.entry_date, patch.entry_date);
        merge(&mut self.exit_date, patch.exit_date);
        merge(&mut self.processing_time, patch.processing_time);
    }
}

impl PersonalInfo {
    pub fn apply(&mut self, patch: PersonalInfoPatch) {
        merge(&mut self.full_name, patch.full_name);
        merge(&mut self.date_of_birth, patch.date_of_birth);
        merge(&mut self.nationality, patch.nationality);
        merge(&mut self.passport_number, patch.passport_number);
        merge(&mut self.passport_issue_date, patch.passport_issue_date);
        merge(&mut self.passport_expiry_date, patch.passport_expiry_date);
        merge(&mut self.passport_issuing_country, patch.passport_issuing_country);
        self.contact_info.apply(patch.contact_info);
        self.emergency_contact.apply(patch.emergency_contact);
        self.file_uploads.apply(patch.file_uploads);
        self.agreements.apply(patch.agreements);
    }
}

impl ContactInfo {
    pub fn apply(&mut self, patch: ContactInfoPatch) {
        merge(&mut self.full_name, patch.full_name);
        merge(&mut self.phone_number, patch.phone_number);
        merge(&mut self.email_address, patch.email_address);
        merge(&mut self.current_address, patch.current_address);
        merge(&mut self.vietnam_address, patch.vietnam_address);
    }
}

impl EmergencyContact {
    pub fn apply(&mut self, patch: EmergencyContactPatch) {
        merge(&mut self.full_name, patch.full_name);
        merge(&mut self.phone_number, patch.phone_number);
        merge(&mut self.email_address, patch.email_address);
        merge(&mut self.relationship, patch.relationship);
    }
}

impl FileUploads {
    pub fn apply(&mut self, patch: FileUploadsPatch) {
        if let Some(url) = patch.passport_scan {
            self.passport_scan = url.filter(|u| !u.is_empty()).map(FileSlot::Uploaded);
        }
        if let Some(url) = patch.portrait_photo {
            self.portrait_photo = url.filter(|u| !u.is_empty()).map(FileSlot::Uploaded);
        }
    }
}

impl Agreements {
    pub fn apply(&mut self, patch: AgreementsPatch) {
        merge(&mut self.information_confirmation, patch.information_confirmation);
        merge(&mut self.terms_and_conditions, patch.terms_and_conditions);
    }
}

impl DraftPatch {
    /// Copy of this patch with blank strings treated as absent. Partial
    /// validation runs on the normalized form.
    pub fn normalized(&self) -> Self {
        let mut patch = self.clone();
        let st = &mut patch.service_type;
        blank_to_none(&mut st.purpose_of_visit);

        let pi = &mut patch.personal_info;
        for value in [
            &mut pi.full_name,
            &mut pi.nationality,
            &mut pi.passport_number,
            &mut pi.passport_issuing_country,
            &mut pi.contact_info.full_name,
            &mut pi.contact_info.phone_number,
            &mut pi.contact_info.email_address,
            &mut pi.contact_info.current_address,
            &mut pi.contact_info.vietnam_address,
            &mut pi.emergency_contact.full_name,
            &mut pi.emergency_contact.phone_number,
            &mut pi.emergency_contact.email_address,
            &mut pi.emergency_contact.relationship,
        ] {
            blank_to_none(value);
        }

        patch
    }
}

impl From<&VisaApplicationDraft> for DraftPatch {
    /// Full snapshot of the draft as a patch. Every field is set except
    /// document slots holding local files, which are left untouched.
    fn from(draft: &VisaApplicationDraft) -> Self {
        let st = &draft.service_type;
        let pi = &draft.personal_info;

        let slot_url = |slot: &Option<FileSlot>| match slot {
            Some(FileSlot::Local(_)) => None,
            Some(FileSlot::Uploaded(url)) => Some(Some(url.clone())),
            None => Some(None),
        };

        Self {
            service_type: ServiceTypePatch {
                number_of_applicants: Some(st.number_of_applicants),
                visa_type: Some(st.visa_type),
                visa_duration: Some(st.visa_duration),
                purpose_of_visit: Some(st.purpose_of_visit.clone()),
                entry_date: Some(st.entry_date),
                exit_date: Some(st.exit_date),
                processing_time: Some(st.processing_time),
            },
            personal_info: PersonalInfoPatch {
                full_name: Some(pi.full_name.clone()),
                date_of_birth: Some(pi.date_of_birth),
                nationality: Some(pi.nationality.clone()),
                passport_number: Some(pi.passport_number.clone()),
                passport_issue_date: Some(pi.passport_issue_date),
                passport_expiry_date: Some(pi.passport_expiry_date),
                passport_issuing_country: Some(pi.passport_issuing_country.clone()),
                contact_info: ContactInfoPatch {
                    full_name: Some(pi.contact_info.full_name.clone()),
                    phone_number: Some(pi.contact_info.phone_number.clone()),
                    email_address: Some(pi.contact_info.email_address.clone()),
                    current_address: Some(pi.contact_info.current_address.clone()),
                    vietnam_address: Some(pi.contact_info.vietnam_address.clone()),
                },
                emergency_contact: EmergencyContactPatch {
                    full_name: Some(pi.emergency_contact.full_name.clone()),
                    phone_number: Some(pi.emergency_contact.phone_number.clone()),
                    email_address: Some(pi.emergency_contact.email_address.clone()),
                    relationship: Some(pi.emergency_contact.relationship.clone()),
                },
                file_uploads: FileUploadsPatch {
                    passport_scan: slot_url(&pi.file_uploads.passport_scan),
                    portrait_photo: slot_url(&pi.file_uploads.portrait_photo),
                },
                agreements: AgreementsPatch {
                    information_confirmation: Some(pi.agreements.information_confirmation),
                    terms_and_conditions: Some(pi.agreements.terms_and_conditions),
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::LocalFile;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_none_leaves_fields_untouched() {
        let mut draft = VisaApplicationDraft::default();
        draft.service_type.purpose_of_visit = "Holiday".into();

        draft.apply(DraftPatch::default());

        assert_eq!(draft.service_type.purpose_of_visit, "Holiday");
    }

    #[test]
    fn test_nested_fields_merge_individually() {
        let mut draft = VisaApplicationDraft::default();
        draft.personal_info.contact_info.full_name = "Jane Doe".into();
        draft.personal_info.contact_info.email_address = "jane@example.com".into();

        let mut patch = DraftPatch::default();
        patch.personal_info.contact_info.email_address = Some("jane.doe@example.com".into());
        draft.apply(patch);

        assert_eq!(draft.personal_info.contact_info.full_name, "Jane Doe");
        assert_eq!(draft.personal_info.contact_info.email_address, "jane.doe@example.com");
    }

    #[test]
    fn test_explicit_null_clears_nullable_field() {
        let mut draft = VisaApplicationDraft::default();
        draft.service_type.entry_date = NaiveDate::from_ymd_opt(2030, 1, 1);

        let patch: DraftPatch =
            serde_json::from_str(r#"{"service_type": {"entry_date": null}}"#).unwrap();
        assert_eq!(patch.service_type.entry_date, Some(None));
        assert_eq!(patch.service_type.exit_date, None);

        draft.apply(patch);
        assert!(draft.service_type.entry_date.is_none());
    }

    #[test]
    fn test_from_patch_applies_default_table() {
        let mut patch = DraftPatch::default();
        patch.personal_info.full_name = Some("John Smith".into());

        let draft = VisaApplicationDraft::from_patch(patch);

        assert_eq!(draft.service_type.number_of_applicants, 1);
        assert_eq!(draft.service_type.visa_type, VisaType::Tourist);
        assert_eq!(draft.personal_info.full_name, "John Smith");
        assert_eq!(draft.personal_info.nationality, "");
        assert!(!draft.personal_info.agreements.terms_and_conditions);
    }

    #[test]
    fn test_snapshot_patch_roundtrips_draft() {
        let mut draft = VisaApplicationDraft::default();
        draft.service_type.visa_type = VisaType::Business;
        draft.service_type.visa_duration = Some(VisaDuration::MultipleOneYear);
        draft.service_type.exit_date = NaiveDate::from_ymd_opt(2031, 1, 1);
        draft.personal_info.passport_number = "B1234567".into();
        draft.personal_info.file_uploads.portrait_photo = Some(FileSlot::Uploaded("/u/p.png".into()));

        let rebuilt = VisaApplicationDraft::from_patch(DraftPatch::from(&draft));
        assert_eq!(rebuilt, draft);
    }

    #[test]
    fn test_snapshot_patch_skips_local_files() {
        let mut target = VisaApplicationDraft::default();
        target.personal_info.file_uploads.passport_scan =
            Some(FileSlot::Uploaded("/uploads/old.png".into()));

        let mut source = VisaApplicationDraft::default();
        source.personal_info.file_uploads.passport_scan =
            Some(FileSlot::Local(LocalFile::new("new.png", "image/png", vec![1])));

        target.apply(DraftPatch::from(&source));

        assert_eq!(
            target.personal_info.file_uploads.passport_scan,
            Some(FileSlot::Uploaded("/uploads/old.png".into()))
        );
    }

    #[test]
    fn test_normalized_drops_blank_strings() {
        let mut patch = DraftPatch::default();
        patch.personal_info.contact_info.phone_number = Some("  ".into());
        patch.personal_info.full_name = Some("Ana".into());

        let normalized = patch.normalized();

        assert_eq!(normalized.personal_info.contact_info.phone_number, None);
        assert_eq!(normalized.personal_info.full_name, Some("Ana".into()));
    }

    #[test]
    fn test_missing_sections_deserialize_as_empty_patch() {
        let patch: DraftPatch = serde_json::from_str("{}").unwrap();
        assert_eq!(patch, DraftPatch::default());
    }
}
