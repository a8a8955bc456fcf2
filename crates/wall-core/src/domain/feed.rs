use std::sync::Arc;

use super::post::Post;

/// In-memory feed of posts, newest first.
///
/// Immutable once built: every change produces a new `Feed` that replaces
/// the old one, so a render never observes a half-applied update.
#[derive(Debug, Clone, Default)]
pub struct Feed {
    posts: Arc<[Post]>,
}

impl Feed {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap posts that are already ordered newest first.
    pub fn from_newest_first(posts: Vec<Post>) -> Self {
        Self {
            posts: posts.into(),
        }
    }

    /// A new feed with `post` at the head and the current posts after it.
    pub fn prepended(&self, post: Post) -> Self {
        let posts = std::iter::once(post)
            .chain(self.posts.iter().cloned())
            .collect::<Vec<_>>();
        Self::from_newest_first(posts)
    }

    pub fn head(&self) -> Option<&Post> {
        self.posts.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Post> {
        self.posts.iter()
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PostId;
    use chrono::{Duration, Utc};

    fn post(id: &str, age_secs: i64) -> Post {
        Post {
            id: PostId::new(id),
            body: format!("post {id}"),
            image_url: None,
            created_at: Utc::now() - Duration::seconds(age_secs),
        }
    }

    #[test]
    fn test_prepend_keeps_prior_order() {
        let feed = Feed::from_newest_first(vec![post("2", 10), post("1", 20)]);
        let next = feed.prepended(post("3", 0));

        let ids = next.iter().map(|p| p.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, ["3", "2", "1"]);
        assert_eq!(next.head().map(|p| p.id.as_str()), Some("3"));
    }

    #[test]
    fn test_prepend_leaves_original_untouched() {
        let feed = Feed::from_newest_first(vec![post("1", 5)]);
        let _next = feed.prepended(post("2", 0));
        assert_eq!(feed.len(), 1);
    }

    #[test]
    fn test_prepend_does_not_deduplicate() {
        let feed = Feed::empty().prepended(post("1", 0));
        let feed = feed.prepended(post("1", 0));
        assert_eq!(feed.len(), 2);
    }
}
