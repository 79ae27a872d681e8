//! Validation Rules
//!
//! Field rules are declared with `validator` attributes on the draft types
//! (full mode) and on the patch types (partial mode). This module runs them,
//! adds the checks that attributes cannot express (document presence,
//! agreements, catalog membership) and the cross-field rules, and flattens
//! everything into a [`ValidationReport`] of field path → message.
//!
//! Cross-field rules run only when every field they reference is present,
//! in this order:
//!
//! 1. exit date strictly after entry date
//! 2. entry date strictly after today
//! 3. applicant at least 18, by calendar-year difference only
//! 4. passport expiry strictly after issue
//! 5. passport expiry at least 6 months after today, and at least 6 months
//!    after the entry date
//!
//! The age rule compares years and ignores month and day, so an applicant
//! turning 18 later this year already passes.

use std::collections::BTreeMap;

use chrono::{Datelike, Months, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::domain::entities::{
    DraftPatch, PersonalInfo, ServiceType, VisaApplicationDraft,
};
use crate::domain::value_objects::{VisaDuration, VisaType};

/// Phone numbers: optional `+` and `(`, then 10-20 digits, spaces, dashes
/// or parentheses.
pub static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+]?[(]?[\d\s\-\(\)]{10,20}$").expect("phone pattern is valid")
});

/// Passport numbers: upper-case letters and digits only.
pub static PASSPORT_NUMBER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9]+$").expect("passport pattern is valid"));

pub const MIN_APPLICANT_AGE: i32 = 18;
pub const PASSPORT_VALIDITY_MONTHS: u32 = 6;

const SERVICE_TYPE: &str = "service_type";
const PERSONAL_INFO: &str = "personal_info";

/// Whether missing fields are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Every field required; used to gate steps and for submission.
    Full,
    /// Every field optional; used when saving drafts.
    Partial,
}

/// Outcome of a validation pass: field path → first message for that path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationReport {
    errors: BTreeMap<String, String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    /// Message recorded for `path`, if any.
    pub fn message_for(&self, path: &str) -> Option<&str> {
        self.errors.get(path).map(String::as_str)
    }

    /// Record an error. The first message for a path wins.
    pub fn add(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.entry(path.into()).or_insert_with(|| message.into());
    }

    pub fn extend(&mut self, other: ValidationReport) {
        for (path, message) in other.errors {
            self.add(path, message);
        }
    }

    /// Flatten `validator` errors under `prefix` (nested structs become
    /// dotted paths).
    pub fn from_validator(prefix: &str, errors: &ValidationErrors) -> Self {
        let mut report = Self::new();
        report.collect(prefix, errors);
        report
    }

    fn collect(&mut self, prefix: &str, errors: &ValidationErrors) {
        for (field, kind) in errors.errors() {
            let path = if prefix.is_empty() {
                field.to_string()
            } else {
                format!("{}.{}", prefix, field)
            };

            match kind {
                ValidationErrorsKind::Field(errs) => {
                    if let Some(err) = errs.first() {
                        let message = err
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| err.code.to_string());
                        self.add(path, message);
                    }
                }
                ValidationErrorsKind::Struct(inner) => self.collect(&path, inner),
                ValidationErrorsKind::List(items) => {
                    for (index, inner) in items {
                        self.collect(&format!("{}[{}]", path, index), inner);
                    }
                }
            }
        }
    }

    /// `Ok(())` when valid, the report itself otherwise.
    pub fn into_result(self) -> Result<(), ValidationReport> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.errors.iter().next() {
            Some((path, message)) if self.errors.len() > 1 => {
                write!(f, "{}: {} (and {} more)", path, message, self.errors.len() - 1)
            }
            Some((path, message)) => write!(f, "{}: {}", path, message),
            None => write!(f, "valid"),
        }
    }
}

impl std::error::Error for ValidationReport {}

/// Fields referenced by the cross-field rules, each optional.
#[derive(Debug, Default, Clone, Copy)]
struct CrossFieldInputs {
    visa_type: Option<VisaType>,
    visa_duration: Option<VisaDuration>,
    entry_date: Option<NaiveDate>,
    exit_date: Option<NaiveDate>,
    date_of_birth: Option<NaiveDate>,
    passport_issue_date: Option<NaiveDate>,
    passport_expiry_date: Option<NaiveDate>,
}

impl CrossFieldInputs {
    fn from_service_type(st: &ServiceType) -> Self {
        Self {
            visa_type: Some(st.visa_type),
            visa_duration: st.visa_duration,
            entry_date: st.entry_date,
            exit_date: st.exit_date,
            ..Self::default()
        }
    }

    fn from_personal_info(pi: &PersonalInfo) -> Self {
        Self {
            date_of_birth: pi.date_of_birth,
            passport_issue_date: pi.passport_issue_date,
            passport_expiry_date: pi.passport_expiry_date,
            ..Self::default()
        }
    }

    fn from_draft(draft: &VisaApplicationDraft) -> Self {
        Self {
            date_of_birth: draft.personal_info.date_of_birth,
            passport_issue_date: draft.personal_info.passport_issue_date,
            passport_expiry_date: draft.personal_info.passport_expiry_date,
            ..Self::from_service_type(&draft.service_type)
        }
    }

    fn from_patch(patch: &DraftPatch) -> Self {
        let st = &patch.service_type;
        let pi = &patch.personal_info;
        Self {
            visa_type: st.visa_type,
            visa_duration: st.visa_duration.flatten(),
            entry_date: st.entry_date.flatten(),
            exit_date: st.exit_date.flatten(),
            date_of_birth: pi.date_of_birth.flatten(),
            passport_issue_date: pi.passport_issue_date.flatten(),
            passport_expiry_date: pi.passport_expiry_date.flatten(),
        }
    }
}

fn field(section: &str, name: &str) -> String {
    format!("{}.{}", section, name)
}

fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

fn check_cross_fields(inputs: CrossFieldInputs, today: NaiveDate, report: &mut ValidationReport) {
    if let (Some(visa_type), Some(duration)) = (inputs.visa_type, inputs.visa_duration) {
        if !visa_type.offers(duration) {
            report.add(
                field(SERVICE_TYPE, "visa_duration"),
                format!("Selected duration is not available for {}", visa_type.option().label),
            );
        }
    }

    // 1
    if let (Some(entry), Some(exit)) = (inputs.entry_date, inputs.exit_date) {
        if exit <= entry {
            report.add(field(SERVICE_TYPE, "exit_date"), "Exit date must be after entry date");
        }
    }

    // 2
    if let Some(entry) = inputs.entry_date {
        if entry <= today {
            report.add(field(SERVICE_TYPE, "entry_date"), "Entry date must be in the future");
        }
    }

    // 3
    if let Some(dob) = inputs.date_of_birth {
        if today.year() - dob.year() < MIN_APPLICANT_AGE {
            report.add(
                field(PERSONAL_INFO, "date_of_birth"),
                "Applicant must be at least 18 years old",
            );
        }
    }

    // 4
    if let (Some(issue), Some(expiry)) = (inputs.passport_issue_date, inputs.passport_expiry_date) {
        if expiry <= issue {
            report.add(
                field(PERSONAL_INFO, "passport_expiry_date"),
                "Passport expiry date must be after issue date",
            );
        }
    }

    // 5
    if let Some(expiry) = inputs.passport_expiry_date {
        if add_months(today, PASSPORT_VALIDITY_MONTHS).is_some_and(|limit| expiry < limit) {
            report.add(
                field(PERSONAL_INFO, "passport_expiry_date"),
                "Passport must be valid for at least 6 months",
            );
        }
        if let Some(entry) = inputs.entry_date {
            if add_months(entry, PASSPORT_VALIDITY_MONTHS).is_some_and(|limit| expiry < limit) {
                report.add(
                    field(PERSONAL_INFO, "passport_expiry_date"),
                    "Passport must be valid for at least 6 months from entry date",
                );
            }
        }
    }
}

fn service_type_field_rules(st: &ServiceType) -> ValidationReport {
    match st.validate() {
        Ok(()) => ValidationReport::new(),
        Err(errors) => ValidationReport::from_validator(SERVICE_TYPE, &errors),
    }
}

fn personal_info_field_rules(pi: &PersonalInfo) -> ValidationReport {
    let mut report = match pi.validate() {
        Ok(()) => ValidationReport::new(),
        Err(errors) => ValidationReport::from_validator(PERSONAL_INFO, &errors),
    };

    if pi.file_uploads.passport_scan.is_none() {
        report.add(
            "personal_info.file_uploads.passport_scan",
            "Passport scan is required",
        );
    }
    if pi.file_uploads.portrait_photo.is_none() {
        report.add(
            "personal_info.file_uploads.portrait_photo",
            "Portrait photo is required",
        );
    }
    if !pi.agreements.information_confirmation {
        report.add(
            "personal_info.agreements.information_confirmation",
            "You must confirm the accuracy of information",
        );
    }
    if !pi.agreements.terms_and_conditions {
        report.add(
            "personal_info.agreements.terms_and_conditions",
            "You must accept the terms and conditions",
        );
    }

    report
}

/// Full-mode rules for the service-type step.
pub fn validate_service_type(st: &ServiceType, today: NaiveDate) -> ValidationReport {
    let mut report = service_type_field_rules(st);
    check_cross_fields(CrossFieldInputs::from_service_type(st), today, &mut report);
    report
}

/// Full-mode rules for the personal-info step. The passport-versus-entry
/// check needs the entry date and only runs in [`validate_application`].
pub fn validate_personal_info(pi: &PersonalInfo, today: NaiveDate) -> ValidationReport {
    let mut report = personal_info_field_rules(pi);
    check_cross_fields(CrossFieldInputs::from_personal_info(pi), today, &mut report);
    report
}

/// Full-mode rules for a complete application, including the rules that
/// span both steps.
pub fn validate_application(draft: &VisaApplicationDraft, today: NaiveDate) -> ValidationReport {
    let mut report = service_type_field_rules(&draft.service_type);
    report.extend(personal_info_field_rules(&draft.personal_info));
    check_cross_fields(CrossFieldInputs::from_draft(draft), today, &mut report);
    report
}

/// Partial-mode rules for a patch. Blank strings count as absent.
pub fn validate_draft_patch(patch: &DraftPatch, today: NaiveDate) -> ValidationReport {
    let patch = patch.normalized();
    let mut report = match patch.validate() {
        Ok(()) => ValidationReport::new(),
        Err(errors) => ValidationReport::from_validator("", &errors),
    };
    check_cross_fields(CrossFieldInputs::from_patch(&patch), today, &mut report);
    report
}

/// Validate a whole draft in either mode.
pub fn validate_draft(
    draft: &VisaApplicationDraft,
    mode: ValidationMode,
    today: NaiveDate,
) -> ValidationReport {
    match mode {
        ValidationMode::Full => validate_application(draft, today),
        ValidationMode::Partial => validate_draft_patch(&DraftPatch::from(draft), today),
    }
}
