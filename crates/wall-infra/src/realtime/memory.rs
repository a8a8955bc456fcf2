//! In-memory push channel.
//!
//! Used when no hosted backend is configured. Works within a single process
//! only: the in-memory record store announces its inserts here.

use async_trait::async_trait;
use futures::StreamExt;
use tokio::sync::broadcast;

use wall_core::domain::Post;
use wall_core::ports::{ChannelError, PostInserted, PushChannel, Subscription};

/// In-memory fan-out of post inserts.
pub struct InMemoryPushChannel {
    sender: broadcast::Sender<Post>,
}

impl InMemoryPushChannel {
    pub fn new(buffer_size: usize) -> Self {
        let (sender, _) = broadcast::channel(buffer_size);
        Self { sender }
    }

    /// Announce an insert to every open subscription.
    pub fn publish(&self, post: Post) {
        // Ignore send errors (no subscribers)
        match self.sender.send(post) {
            Ok(receivers) => tracing::debug!(receivers, "Insert published"),
            Err(_) => tracing::debug!("No subscribers for insert"),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for InMemoryPushChannel {
    fn default() -> Self {
        Self::new(100)
    }
}

#[async_trait]
impl PushChannel for InMemoryPushChannel {
    async fn subscribe(&self, channel: &str) -> Result<Subscription, ChannelError> {
        let receiver = self.sender.subscribe();
        let channel_name = channel.to_string();
        tracing::info!(channel = %channel_name, "Subscribed to channel");

        let events = futures::stream::unfold(
            (receiver, channel_name.clone()),
            |(mut receiver, channel)| async move {
                loop {
                    match receiver.recv().await {
                        Ok(record) => {
                            let event = PostInserted {
                                channel: channel.clone(),
                                record,
                            };
                            return Some((event, (receiver, channel)));
                        }
                        Err(broadcast::error::RecvError::Lagged(count)) => {
                            tracing::warn!(
                                channel = %channel,
                                lagged = count,
                                "Subscriber lagged behind"
                            );
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            tracing::info!(channel = %channel, "Channel closed");
                            return None;
                        }
                    }
                }
            },
        )
        .boxed();

        let teardown_channel = channel_name.clone();
        Ok(Subscription::new(channel_name, events, move || {
            tracing::info!(channel = %teardown_channel, "Unsubscribed from channel");
        }))
    }
}
