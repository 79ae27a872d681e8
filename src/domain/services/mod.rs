//! # Domain Services
//!
//! Business rules that span more than one entity.
//!
//! ## Services
//!
//! - **validation**: field, cross-field and time-relative rules over the
//!   application draft, in full and partial mode

pub mod validation;

pub use validation::{
    validate_application, validate_draft, validate_draft_patch, validate_personal_info,
    validate_service_type, ValidationMode, ValidationReport,
};
