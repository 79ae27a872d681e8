//! Filesystem storage rooted at a public directory.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use super::{ObjectTarget, StorageBackend, StorageError};

/// Stores objects as files under `root`. An object stored at key
/// `uploads/x.png` gets the URL `/uploads/x.png`.
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Map a path-relative URL or key to a file under the root. `..` runs
    /// are stripped and leading slashes trimmed before the path is checked,
    /// and anything that is not a plain relative path is rejected.
    fn resolve(&self, url: &str) -> Result<PathBuf, StorageError> {
        let cleaned = url.replace("..", "");
        let relative = Path::new(cleaned.trim_start_matches('/'));

        if relative.as_os_str().is_empty()
            || !relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(StorageError::InvalidPath(url.to_string()));
        }

        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl StorageBackend for LocalFileStorage {
    async fn upload_object(
        &self,
        bytes: Vec<u8>,
        _content_type: &str,
        target: &ObjectTarget,
    ) -> Result<String, StorageError> {
        let key = target.key();
        let path = self.resolve(&key)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;

        let relative = path
            .strip_prefix(&self.root)
            .map_err(|_| StorageError::InvalidPath(key.clone()))?;
        let url = format!("/{}", relative.to_string_lossy().replace('\\', "/"));

        tracing::debug!(path = %path.display(), url = %url, "Stored file locally");
        Ok(url)
    }

    async fn delete_object(&self, url: &str) -> Result<bool, StorageError> {
        let path = self.resolve(url)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Deleted local file");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
