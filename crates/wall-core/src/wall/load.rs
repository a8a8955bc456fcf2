//! Feed load and live subscription, as handles the caller can move into a
//! spawned task. Results are handed back to the `Wall` on completion.

use std::sync::Arc;

use crate::domain::Post;
use crate::error::RepoError;
use crate::ports::{ChannelError, PostRepository, PushChannel, Subscription};

/// Fetches every stored post, newest first.
#[derive(Clone)]
pub struct FeedLoader {
    posts: Arc<dyn PostRepository>,
}

impl FeedLoader {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    pub async fn load(&self) -> Result<Vec<Post>, RepoError> {
        self.posts.list_newest_first().await
    }
}

/// Opens the push subscription for one channel.
#[derive(Clone)]
pub struct Subscriber {
    push: Arc<dyn PushChannel>,
    channel: String,
}

impl Subscriber {
    pub fn new(push: Arc<dyn PushChannel>, channel: impl Into<String>) -> Self {
        Self {
            push,
            channel: channel.into(),
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub async fn subscribe(&self) -> Result<Subscription, ChannelError> {
        self.push.subscribe(&self.channel).await
    }
}
