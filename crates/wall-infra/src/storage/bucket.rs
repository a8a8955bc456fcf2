//! Storage bucket over the hosted storage API.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;

use wall_core::domain::Attachment;
use wall_core::ports::{ObjectStorage, StorageError};
use wall_shared::StorageErrorBody;

use crate::config::SupabaseConfig;

/// Public storage bucket for post images.
pub struct BucketStorage {
    http: Client,
    config: Arc<SupabaseConfig>,
}

impl BucketStorage {
    pub fn new(config: Arc<SupabaseConfig>) -> Result<Self, StorageError> {
        let headers = config.auth_headers().map_err(StorageError::Connection)?;
        let http = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(Self { http, config })
    }
}

#[async_trait]
impl ObjectStorage for BucketStorage {
    async fn upload(&self, path: &str, attachment: &Attachment) -> Result<(), StorageError> {
        let url = self
            .config
            .object_url(path)
            .map_err(StorageError::Connection)?;

        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, attachment.content_type.as_str())
            .header("cache-control", "max-age=3600")
            .header("x-upsert", "false")
            .body(attachment.bytes.clone())
            .send()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(bucket = %self.config.bucket, path = %path, "Object uploaded");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(StorageError::Rejected {
            status: status.as_u16(),
            message: StorageErrorBody::from_body(&body).summary(),
        })
    }

    fn public_url(&self, path: &str) -> String {
        match self.config.public_object_url(path) {
            Ok(url) => url.to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "Falling back to unencoded public URL");
                format!(
                    "{}/storage/v1/object/public/{}/{}",
                    self.config.url, self.config.bucket, path
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_url_is_deterministic() {
        let storage = BucketStorage::new(Arc::new(SupabaseConfig::new(
            "https://demo.supabase.co",
            "anon-key",
        )))
        .unwrap();

        let first = storage.public_url("1714564800123-photo.png");
        assert_eq!(first, storage.public_url("1714564800123-photo.png"));
        assert_eq!(
            first,
            "https://demo.supabase.co/storage/v1/object/public/post-images/1714564800123-photo.png"
        );
    }
}
