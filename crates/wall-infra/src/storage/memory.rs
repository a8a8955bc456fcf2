//! In-memory object storage - fallback when no bucket is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use wall_core::domain::Attachment;
use wall_core::ports::{ObjectStorage, StorageError};

/// A stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// In-memory bucket. Refuses to overwrite an existing path, like a bucket
/// without upsert.
pub struct InMemoryObjectStorage {
    base_url: String,
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl InMemoryObjectStorage {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, path: &str) -> Option<StoredObject> {
        self.objects.read().await.get(path).cloned()
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

impl Default for InMemoryObjectStorage {
    fn default() -> Self {
        Self::new("memory://post-images")
    }
}

#[async_trait]
impl ObjectStorage for InMemoryObjectStorage {
    async fn upload(&self, path: &str, attachment: &Attachment) -> Result<(), StorageError> {
        let mut objects = self.objects.write().await;

        if objects.contains_key(path) {
            return Err(StorageError::Rejected {
                status: 409,
                message: format!("The resource already exists: {path}"),
            });
        }

        objects.insert(
            path.to_string(),
            StoredObject {
                content_type: attachment.content_type.clone(),
                bytes: attachment.bytes.clone(),
            },
        );
        tracing::debug!(path = %path, bytes = attachment.bytes.len(), "Object stored");
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}
