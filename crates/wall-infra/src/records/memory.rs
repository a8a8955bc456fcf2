//! In-memory record store - used when no hosted backend is configured.
//! Note: Data is lost on process restart.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use wall_core::domain::{NewPost, Post, PostId};
use wall_core::error::RepoError;
use wall_core::ports::PostRepository;

use crate::realtime::InMemoryPushChannel;

/// In-memory post table.
///
/// Assigns UUID ids and strictly increasing timestamps, and announces every
/// insert on the attached push channel.
pub struct InMemoryPostRepository {
    rows: RwLock<Vec<Post>>,
    push: Option<Arc<InMemoryPushChannel>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            push: None,
        }
    }

    /// Announce inserts on `push`.
    pub fn with_push(mut self, push: Arc<InMemoryPushChannel>) -> Self {
        self.push = Some(push);
        self
    }

    /// Seed rows as if they had been stored earlier.
    pub async fn seed(&self, rows: impl IntoIterator<Item = Post>) {
        self.rows.write().await.extend(rows);
    }

    fn next_timestamp(rows: &[Post]) -> DateTime<Utc> {
        let now = Utc::now();
        match rows.iter().map(|p| p.created_at).max() {
            Some(last) if last >= now => last + Duration::microseconds(1),
            _ => now,
        }
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list_newest_first(&self) -> Result<Vec<Post>, RepoError> {
        let mut rows = self.rows.read().await.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn insert(&self, post: NewPost) -> Result<Post, RepoError> {
        let stored = {
            let mut rows = self.rows.write().await;
            let stored = Post {
                id: PostId::new(Uuid::new_v4().to_string()),
                body: post.body,
                image_url: post.image_url,
                created_at: Self::next_timestamp(&rows),
            };
            rows.push(stored.clone());
            stored
        };

        tracing::debug!(post_id = %stored.id, "Post stored");

        if let Some(push) = &self.push {
            push.publish(stored.clone());
        }

        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wall_core::ports::PushChannel;

    fn new_post(body: &str) -> NewPost {
        NewPost::new(body, None).unwrap()
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let repo = InMemoryPostRepository::new();
        for body in ["one", "two", "three"] {
            repo.insert(new_post(body)).await.unwrap();
        }

        let rows = repo.list_newest_first().await.unwrap();
        let bodies = rows.iter().map(|p| p.body.as_str()).collect::<Vec<_>>();
        assert_eq!(bodies, ["three", "two", "one"]);
        assert!(rows.windows(2).all(|w| w[0].created_at > w[1].created_at));
    }

    #[tokio::test]
    async fn test_seeded_rows_are_sorted() {
        let repo = InMemoryPostRepository::new();
        let now = Utc::now();
        repo.seed([
            Post {
                id: PostId::new("old"),
                body: "old".into(),
                image_url: None,
                created_at: now - Duration::hours(2),
            },
            Post {
                id: PostId::new("new"),
                body: "new".into(),
                image_url: None,
                created_at: now - Duration::minutes(1),
            },
        ])
        .await;

        let rows = repo.list_newest_first().await.unwrap();
        assert_eq!(rows[0].id.as_str(), "new");
        assert_eq!(rows[1].id.as_str(), "old");
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_announces() {
        let push = Arc::new(InMemoryPushChannel::default());
        let repo = InMemoryPostRepository::new().with_push(push.clone());
        let mut sub = push.subscribe("realtime:posts").await.unwrap();

        let stored = repo
            .insert(NewPost::new("", Some("https://cdn/x.png".into())).unwrap())
            .await
            .unwrap();

        assert!(Uuid::parse_str(stored.id.as_str()).is_ok());
        let event = sub.next().await.unwrap();
        assert_eq!(event.record, stored);
    }
}
