//! Object storage port - where post images live.

use async_trait::async_trait;

use crate::domain::Attachment;

/// Object storage trait - abstraction over blob buckets.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Upload an attachment under `path`.
    async fn upload(&self, path: &str, attachment: &Attachment) -> Result<(), StorageError>;

    /// Public URL for `path`. Deterministic, never signed or expiring.
    fn public_url(&self, path: &str) -> String;
}

/// Object storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Upload rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
}
