//! Validation Utilities

use validator::{Validate, ValidationErrors};

use super::error::AppError;
use crate::domain::services::validation::ValidationReport;

/// Convert validation errors to AppError
pub fn validation_error(errors: ValidationErrors) -> AppError {
    AppError::Validation(ValidationReport::from_validator("", &errors))
}

/// Run the `validator` rules of a request body.
pub fn validate_request<T: Validate>(body: &T) -> Result<(), AppError> {
    body.validate().map_err(validation_error)
}
