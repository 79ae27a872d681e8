//! File Upload Client
//!
//! Validates document files, names them, hands them to the configured
//! storage backend and reports coarse progress.

use std::io::Cursor;
use std::sync::Arc;

use chrono::Utc;
use image::ImageReader;
use rand::distr::{Alphanumeric, SampleString};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{DocumentSlot, LocalFile};
use crate::infrastructure::storage::{ObjectTarget, StorageBackend, StorageError};
use crate::shared::error::AppError;

/// 5 MiB
pub const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;
pub const ACCEPTED_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/jpg", "image/png"];

pub const PHOTO_MIN_DIMENSION: u32 = 200;
pub const PHOTO_MAX_DIMENSION: u32 = 4000;
const PHOTO_RATIO_TOLERANCE: f64 = 0.3;
const SQUARE_RATIO: f64 = 1.0;
const PORTRAIT_RATIO: f64 = 0.8;

/// Progress milestones reported during an upload.
pub const PROGRESS_STARTED: u8 = 25;
pub const PROGRESS_TRANSFERRED: u8 = 75;
pub const PROGRESS_DONE: u8 = 100;

pub const UPLOAD_DIRECTORY: &str = "uploads";

/// A stored file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedFile {
    pub url: String,
    pub file_name: String,
    pub file_size: u64,
}

/// Upload errors
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("File size must be less than 5MB")]
    FileTooLarge,

    #[error("Only JPG, JPEG, and PNG files are allowed")]
    UnsupportedType,

    #[error("File must be an image")]
    NotAnImage,

    #[error("Invalid image file")]
    InvalidImage,

    #[error("Photo must be at least {min}x{min} pixels for good quality")]
    PhotoTooSmall { min: u32 },

    #[error("Photo must be no larger than {max}x{max} pixels")]
    PhotoTooLarge { max: u32 },

    #[error("Photo should be square (1:1) or portrait (4:5) format for passport photos")]
    AspectRatio,

    #[error("Upload failed: {0}")]
    Storage(#[from] StorageError),
}

impl From<UploadError> for AppError {
    fn from(e: UploadError) -> Self {
        match e {
            UploadError::FileTooLarge => AppError::PayloadTooLarge(e.to_string()),
            UploadError::UnsupportedType => AppError::UnsupportedMediaType(e.to_string()),
            UploadError::Storage(StorageError::InvalidPath(path)) => {
                AppError::BadRequest(format!("Invalid file path: {}", path))
            }
            UploadError::Storage(inner) => AppError::Storage(inner.to_string()),
            other => AppError::BadRequest(other.to_string()),
        }
    }
}

/// Size and MIME type checks shared by every slot.
pub fn validate_file(file: &LocalFile) -> Result<(), UploadError> {
    if file.size() > MAX_FILE_SIZE {
        return Err(UploadError::FileTooLarge);
    }
    if !ACCEPTED_MIME_TYPES.contains(&file.content_type.as_str()) {
        return Err(UploadError::UnsupportedType);
    }
    Ok(())
}

/// Shallow passport-photo heuristics: decodable, bounded dimensions and a
/// roughly square or 4:5 shape.
pub fn validate_portrait_photo(file: &LocalFile) -> Result<(), UploadError> {
    if !file.is_image() {
        return Err(UploadError::NotAnImage);
    }

    let (width, height) = ImageReader::new(Cursor::new(&file.bytes))
        .with_guessed_format()
        .map_err(|_| UploadError::InvalidImage)?
        .into_dimensions()
        .map_err(|_| UploadError::InvalidImage)?;

    if width < PHOTO_MIN_DIMENSION || height < PHOTO_MIN_DIMENSION {
        return Err(UploadError::PhotoTooSmall {
            min: PHOTO_MIN_DIMENSION,
        });
    }
    if width > PHOTO_MAX_DIMENSION || height > PHOTO_MAX_DIMENSION {
        return Err(UploadError::PhotoTooLarge {
            max: PHOTO_MAX_DIMENSION,
        });
    }

    let ratio = f64::from(width) / f64::from(height);
    let squareish = (ratio - SQUARE_RATIO).abs() <= PHOTO_RATIO_TOLERANCE;
    let portraitish = (ratio - PORTRAIT_RATIO).abs() <= PHOTO_RATIO_TOLERANCE;
    if !squareish && !portraitish {
        return Err(UploadError::AspectRatio);
    }

    Ok(())
}

/// `{application_id}_{base}_{timestamp_ms}_{token}.{ext}`, the id prefix
/// only when one is given.
pub fn generate_unique_filename(file: &LocalFile, application_id: Option<Uuid>) -> String {
    let token = Alphanumeric
        .sample_string(&mut rand::rng(), 6)
        .to_lowercase();
    let prefix = application_id
        .map(|id| format!("{}_", id))
        .unwrap_or_default();

    format!(
        "{}{}_{}_{}.{}",
        prefix,
        file.base_name(),
        Utc::now().timestamp_millis(),
        token,
        file.extension()
    )
}

/// Human-readable size, one decimal place: `1.5 MB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;

    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    format!("{:.1} {}", size, UNITS[unit])
}

/// Uploads validated files to a storage backend.
#[derive(Clone)]
pub struct FileUploadClient {
    storage: Arc<dyn StorageBackend>,
}

impl FileUploadClient {
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self { storage }
    }

    /// Validate and store one file. Nothing reaches storage when the file
    /// fails validation.
    pub async fn upload<F>(
        &self,
        file: &LocalFile,
        application_id: Option<Uuid>,
        slot: DocumentSlot,
        mut on_progress: F,
    ) -> Result<UploadedFile, UploadError>
    where
        F: FnMut(u8) + Send,
    {
        validate_file(file)?;
        if slot.requires_photo_checks() {
            validate_portrait_photo(file)?;
        }

        let file_name = generate_unique_filename(file, application_id);
        let directory = match application_id {
            Some(id) => format!("{}/{}", UPLOAD_DIRECTORY, id),
            None => UPLOAD_DIRECTORY.to_string(),
        };
        let target = ObjectTarget::new(directory, file_name.clone());

        on_progress(PROGRESS_STARTED);
        let url = self
            .storage
            .upload_object(file.bytes.clone(), &file.content_type, &target)
            .await
            .map_err(|e| {
                tracing::error!(file = %file.name, slot = %slot, error = %e, "File upload failed");
                e
            })?;
        on_progress(PROGRESS_TRANSFERRED);

        tracing::info!(slot = %slot, url = %url, size = file.size(), "File uploaded");
        on_progress(PROGRESS_DONE);

        Ok(UploadedFile {
            url,
            file_name,
            file_size: file.size(),
        })
    }

    /// Upload files one after another. Stops at the first failure, so the
    /// result is shorter than the input when something fails; the last
    /// entry is then the error. Progress is reported as `(index, percent,
    /// file name)`.
    pub async fn upload_many<F>(
        &self,
        files: &[(DocumentSlot, LocalFile)],
        application_id: Option<Uuid>,
        mut on_progress: F,
    ) -> Vec<Result<UploadedFile, UploadError>>
    where
        F: FnMut(usize, u8, &str) + Send,
    {
        let mut results = Vec::with_capacity(files.len());

        for (index, (slot, file)) in files.iter().enumerate() {
            let result = self
                .upload(file, application_id, *slot, |p| on_progress(index, p, &file.name))
                .await;
            let failed = result.is_err();
            results.push(result);
            if failed {
                break;
            }
        }

        results
    }

    /// Delete a stored file. Path-relative URLs are removed from local
    /// storage; other URLs are left in place and reported as deleted.
    pub async fn delete(&self, url: &str) -> Result<bool, UploadError> {
        if url.starts_with('/') {
            Ok(self.storage.delete_object(url).await?)
        } else {
            tracing::warn!(url = %url, "Deletion of external files is not supported");
            Ok(true)
        }
    }
}
