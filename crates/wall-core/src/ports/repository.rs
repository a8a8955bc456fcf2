use async_trait::async_trait;

use crate::domain::{NewPost, Post};
use crate::error::RepoError;

/// Record store for posts.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Every post, ordered by creation time, newest first.
    async fn list_newest_first(&self) -> Result<Vec<Post>, RepoError>;

    /// Insert one post and return the stored row with its assigned id and timestamp.
    async fn insert(&self, post: NewPost) -> Result<Post, RepoError>;
}
