//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **ApplicationService**: Draft creation, updates and submission of
//!   application records
//! - **FileUploadClient**: Document validation and upload to storage

pub mod application_service;
pub mod upload_service;

// Re-export application service types
pub use application_service::{ApplicationError, ApplicationService, ApplicationServiceImpl};

// Re-export upload service types
pub use upload_service::{
    format_file_size, generate_unique_filename, validate_file, validate_portrait_photo,
    FileUploadClient, UploadError, UploadedFile, ACCEPTED_MIME_TYPES, MAX_FILE_SIZE,
};
