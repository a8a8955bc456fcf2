//! Push channel port - live notifications of new posts.

use std::fmt;

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::BoxStream;

use crate::domain::Post;

/// A post insert delivered by the push channel.
#[derive(Debug, Clone)]
pub struct PostInserted {
    pub channel: String,
    pub record: Post,
}

type Teardown = Box<dyn FnOnce() + Send>;

/// A live subscription to post inserts.
///
/// Yields events until the backend closes the stream. Dropping the
/// subscription or calling [`Subscription::unsubscribe`] tears it down.
pub struct Subscription {
    channel: String,
    events: BoxStream<'static, PostInserted>,
    teardown: Option<Teardown>,
}

impl Subscription {
    pub fn new(
        channel: impl Into<String>,
        events: BoxStream<'static, PostInserted>,
        teardown: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            channel: channel.into(),
            events,
            teardown: Some(Box::new(teardown)),
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Next insert, or `None` once the channel has closed.
    pub async fn next(&mut self) -> Option<PostInserted> {
        self.events.next().await
    }

    pub fn unsubscribe(mut self) {
        self.close();
    }

    fn close(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            tracing::debug!(channel = %self.channel, "Tearing down subscription");
            teardown();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("channel", &self.channel)
            .field("open", &self.teardown.is_some())
            .finish()
    }
}

/// Push channel trait - abstraction over realtime backends.
#[async_trait]
pub trait PushChannel: Send + Sync {
    /// Subscribe to insert events on the posts table under the logical `channel` name.
    async fn subscribe(&self, channel: &str) -> Result<Subscription, ChannelError>;
}

/// Push channel errors.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Failed to subscribe: {0}")]
    SubscribeError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_teardown_runs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let sub = Subscription::new("realtime:posts", futures::stream::empty().boxed(), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        sub.unsubscribe();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_tears_down() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        {
            let _sub = Subscription::new("realtime:posts", futures::stream::empty().boxed(), move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
