//! Remote blob storage over HTTP.

use async_trait::async_trait;
use serde::Deserialize;

use super::{ObjectTarget, StorageBackend, StorageError};

/// Objects are `PUT` to `{base_url}/{key}`. The store answers with the
/// public URL of the object.
pub struct BlobStorage {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Deserialize)]
struct PutResponse {
    url: String,
}

impl BlobStorage {
    /// `base_url` should be like `https://blob.example.com` (no trailing
    /// slash needed).
    pub fn new(base_url: String, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn object_url(&self, target: &ObjectTarget) -> String {
        format!("{}/{}", self.base_url, target.key())
    }
}

#[async_trait]
impl StorageBackend for BlobStorage {
    async fn upload_object(
        &self,
        bytes: Vec<u8>,
        content_type: &str,
        target: &ObjectTarget,
    ) -> Result<String, StorageError> {
        let url = self.object_url(target);

        tracing::info!(url = %url, size = bytes.len(), "Uploading object to blob storage");
        let mut request = self
            .client
            .put(&url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(StorageError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let result: PutResponse = resp.json().await?;
        Ok(result.url)
    }

    async fn delete_object(&self, url: &str) -> Result<bool, StorageError> {
        // TODO: issue an authenticated DELETE once the blob store exposes one.
        tracing::warn!(url = %url, "Blob deletion is not supported, leaving object in place");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_url_joins_base_and_key() {
        let storage = BlobStorage::new("https://blob.example.com/".into(), None);
        assert_eq!(
            storage.object_url(&ObjectTarget::new("uploads/1", "a.png")),
            "https://blob.example.com/uploads/1/a.png"
        );
    }

    #[tokio::test]
    async fn test_delete_is_a_reported_success() {
        let storage = BlobStorage::new("https://blob.example.com".into(), None);
        assert!(storage
            .delete_object("https://blob.example.com/uploads/a.png")
            .await
            .unwrap());
    }
}
