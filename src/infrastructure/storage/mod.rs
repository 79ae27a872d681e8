//! File Storage Backends
//!
//! Where uploaded documents end up. Two backends:
//!
//! - **LocalFileStorage** - files under a directory on disk, served back by
//!   the HTTP layer; URLs are path-relative (`/uploads/...`)
//! - **BlobStorage** - a remote object store reached over HTTP; URLs are
//!   absolute

mod blob;
mod local;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{StorageBackendKind, StorageSettings};

pub use blob::BlobStorage;
pub use local::LocalFileStorage;

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Storage server returned {status}: {body}")]
    Server { status: u16, body: String },

    #[error("Invalid object path: {0}")]
    InvalidPath(String),

    #[error("Storage is not configured: {0}")]
    Misconfigured(String),
}

/// Where an object should be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectTarget {
    /// Directory relative to the storage root, e.g. `uploads/<application id>`
    pub directory: String,
    pub filename: String,
}

impl ObjectTarget {
    pub fn new(directory: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            filename: filename.into(),
        }
    }

    /// `directory/filename`, without a leading slash.
    pub fn key(&self) -> String {
        let directory = self.directory.trim_matches('/');
        if directory.is_empty() {
            self.filename.clone()
        } else {
            format!("{}/{}", directory, self.filename)
        }
    }
}

/// Object storage for uploaded files.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Store `bytes` and return the public URL of the stored object.
    async fn upload_object(
        &self,
        bytes: Vec<u8>,
        content_type: &str,
        target: &ObjectTarget,
    ) -> Result<String, StorageError>;

    /// Remove the object behind `url`. `Ok(false)` when there was nothing to
    /// remove.
    async fn delete_object(&self, url: &str) -> Result<bool, StorageError>;
}

/// Build the configured backend.
pub fn build_storage(settings: &StorageSettings) -> Result<Arc<dyn StorageBackend>, StorageError> {
    match settings.backend {
        StorageBackendKind::Local => Ok(Arc::new(LocalFileStorage::new(&settings.local_root))),
        StorageBackendKind::Blob => {
            let base_url = settings
                .blob_base_url
                .clone()
                .ok_or_else(|| StorageError::Misconfigured("blob_base_url is not set".into()))?;
            Ok(Arc::new(BlobStorage::new(base_url, settings.blob_token.clone())))
        }
    }
}
