//! The wall view model.
//!
//! Owns the draft, the feed and the compose state, and runs the three
//! flows against the backend ports: feed load on mount, compose and
//! publish, and live updates from the push channel. All mutation happens
//! through `&mut self`, so a single event loop drives it without locks.
//! Backend calls are split into a handle that does the I/O (`FeedLoader`,
//! `Subscriber`, `Publisher`) and a `finish_*` step applied on completion,
//! so the loop never waits on the network.

mod compose;
mod load;
pub mod page;
mod relative_time;


use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::{Attachment, Draft, Feed, Identity, PlaceholderFeed, Post};
use crate::error::RepoError;
use crate::ports::{
    ChannelError, ObjectStorage, PostInserted, PostRepository, PushChannel, Subscription,
};

pub use compose::{
    ComposeState, PublishError, PublishRequest, Publisher, SubmitOutcome, object_path,
};
pub use load::{FeedLoader, Subscriber};
pub use page::Page;
pub use relative_time::distance_in_words;

/// Default logical channel for post inserts.
pub const DEFAULT_CHANNEL: &str = "realtime:posts";

/// The three backend services the wall talks to.
#[derive(Clone)]
pub struct WallBackend {
    pub posts: Arc<dyn PostRepository>,
    pub storage: Arc<dyn ObjectStorage>,
    pub push: Arc<dyn PushChannel>,
}

pub struct Wall {
    backend: WallBackend,
    identity: Identity,
    placeholders: PlaceholderFeed,
    channel: String,
    draft: Draft,
    feed: Feed,
    state: ComposeState,
}

impl Wall {
    pub fn new(backend: WallBackend, identity: Identity) -> Self {
        Self {
            backend,
            identity,
            placeholders: PlaceholderFeed::builtin(),
            channel: DEFAULT_CHANNEL.to_string(),
            draft: Draft::new(),
            feed: Feed::empty(),
            state: ComposeState::Idle,
        }
    }

    pub fn with_placeholders(mut self, placeholders: PlaceholderFeed) -> Self {
        self.placeholders = placeholders;
        self
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn feed(&self) -> &Feed {
        &self.feed
    }

    pub fn state(&self) -> ComposeState {
        self.state
    }

    pub fn feed_loader(&self) -> FeedLoader {
        FeedLoader::new(self.backend.posts.clone())
    }

    pub fn subscriber(&self) -> Subscriber {
        Subscriber::new(self.backend.push.clone(), self.channel.clone())
    }

    /// Apply a finished feed load. Rows replace the feed; on failure the
    /// error is logged and the current feed is kept.
    pub fn finish_load(&mut self, result: Result<Vec<Post>, RepoError>) -> Result<usize, RepoError> {
        match result {
            Ok(posts) => {
                let count = posts.len();
                self.feed = Feed::from_newest_first(posts);
                tracing::debug!(count, "Feed loaded");
                Ok(count)
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching posts");
                Err(e)
            }
        }
    }

    /// Apply a finished subscribe. A failure is logged and yields `None`;
    /// the wall keeps working without live updates.
    pub fn finish_subscribe(
        &mut self,
        result: Result<Subscription, ChannelError>,
    ) -> Option<Subscription> {
        match result {
            Ok(subscription) => {
                tracing::info!(channel = %self.channel, "Live updates subscribed");
                Some(subscription)
            }
            Err(e) => {
                tracing::error!(channel = %self.channel, error = %e, "Failed to subscribe to live updates");
                None
            }
        }
    }

    pub fn unmount(&mut self, subscription: Subscription) {
        subscription.unsubscribe();
        tracing::info!(channel = %self.channel, "Live updates unsubscribed");
    }

    /// Load and apply the feed in one go.
    pub async fn load_feed(&mut self) -> Result<usize, RepoError> {
        let result = self.feed_loader().load().await;
        self.finish_load(result)
    }

    /// Subscribe and apply the result in one go.
    pub async fn subscribe(&mut self) -> Option<Subscription> {
        let result = self.subscriber().subscribe().await;
        self.finish_subscribe(result)
    }

    /// Put a pushed post at the head of the feed.
    pub fn apply_insert(&mut self, event: PostInserted) {
        tracing::debug!(channel = %event.channel, post_id = %event.record.id, "Live insert");
        self.feed = self.feed.prepended(event.record);
    }

    /// Replace the draft text; over-long values are rejected.
    pub fn edit_text(&mut self, value: impl Into<String>) -> bool {
        self.draft.set_text(value)
    }

    /// Append one keystroke to the draft.
    pub fn type_char(&mut self, c: char) -> bool {
        self.draft.push_char(c)
    }

    pub fn select_attachment(&mut self, attachment: Attachment, preview: Option<String>) {
        self.draft.select_attachment(attachment, preview);
    }

    pub fn clear_attachment(&mut self) {
        self.draft.clear_attachment();
    }

    pub fn publisher(&self) -> Publisher {
        Publisher::new(self.backend.posts.clone(), self.backend.storage.clone())
    }

    /// Enter the busy state and snapshot the draft for publishing.
    ///
    /// Returns `None` when already busy or when there is nothing to publish.
    pub fn begin_submit(&mut self) -> Option<PublishRequest> {
        if self.state == ComposeState::Busy {
            tracing::debug!("Submit ignored, a post is already in flight");
            return None;
        }
        if !self.draft.has_content() {
            return None;
        }

        self.state = ComposeState::Busy;
        self.draft.set_in_flight(true);

        Some(PublishRequest {
            body: self.draft.text().to_string(),
            attachment: self.draft.attachment().cloned(),
        })
    }

    /// Leave the busy state. Success clears the draft; failure is logged
    /// and the draft is kept for another try.
    pub fn finish_submit(&mut self, result: Result<Post, PublishError>) -> SubmitOutcome {
        self.state = ComposeState::Idle;
        self.draft.set_in_flight(false);

        match result {
            Ok(post) => {
                self.draft.clear();
                SubmitOutcome::Published(post)
            }
            Err(e) => {
                tracing::error!(error = %e, "Error publishing post");
                SubmitOutcome::Failed
            }
        }
    }

    /// Begin, publish and finish in one go.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let Some(request) = self.begin_submit() else {
            return SubmitOutcome::Skipped;
        };
        let result = self.publisher().publish(request).await;
        self.finish_submit(result)
    }

    /// Build the page model as of `now`.
    pub fn page(&self, now: DateTime<Utc>) -> Page {
        page::build(
            page::PageInputs {
                identity: &self.identity,
                draft: &self.draft,
                state: self.state,
                feed: &self.feed,
                placeholders: &self.placeholders,
            },
            now,
        )
    }
}
