//! Compose-and-publish: upload the attachment, then insert the post.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{Attachment, NewPost, Post};
use crate::error::{DomainError, RepoError};
use crate::ports::{ObjectStorage, PostRepository, StorageError};

/// Compose state. A second submit is refused while `Busy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComposeState {
    #[default]
    Idle,
    Busy,
}

/// Snapshot of a draft taken when a submission starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    pub body: String,
    pub attachment: Option<Attachment>,
}

/// What became of a submit.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Nothing to publish, or a submission was already in flight.
    Skipped,
    Published(Post),
    /// The draft was kept; the cause has been logged.
    Failed,
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Image upload failed: {0}")]
    Upload(#[from] StorageError),

    #[error("Post insert failed: {0}")]
    Insert(#[from] RepoError),

    #[error(transparent)]
    Invalid(#[from] DomainError),
}

/// Object path for an upload: `{unix_millis}-{file_name}`.
pub fn object_path(now: DateTime<Utc>, file_name: &str) -> String {
    format!("{}-{}", now.timestamp_millis(), file_name)
}

/// Runs the upload-then-insert sequence against the backend.
///
/// Cheap to clone so the caller can move it into a spawned task.
#[derive(Clone)]
pub struct Publisher {
    posts: Arc<dyn PostRepository>,
    storage: Arc<dyn ObjectStorage>,
}

impl Publisher {
    pub fn new(posts: Arc<dyn PostRepository>, storage: Arc<dyn ObjectStorage>) -> Self {
        Self { posts, storage }
    }

    pub async fn publish(&self, request: PublishRequest) -> Result<Post, PublishError> {
        let image_url = match &request.attachment {
            Some(attachment) => Some(self.upload(attachment).await?),
            None => None,
        };

        let post = NewPost::new(request.body, image_url)?;
        let stored = self.posts.insert(post).await?;

        tracing::info!(post_id = %stored.id, has_image = stored.image_url.is_some(), "Post published");
        Ok(stored)
    }

    async fn upload(&self, attachment: &Attachment) -> Result<String, StorageError> {
        let path = object_path(Utc::now(), &attachment.file_name);
        tracing::debug!(path = %path, bytes = attachment.bytes.len(), "Uploading image");

        self.storage.upload(&path, attachment).await?;
        Ok(self.storage.public_url(&path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_object_path_uses_millis_and_name() {
        let now = Utc.timestamp_millis_opt(1_714_564_800_123).unwrap();
        assert_eq!(object_path(now, "photo.png"), "1714564800123-photo.png");
    }
}
