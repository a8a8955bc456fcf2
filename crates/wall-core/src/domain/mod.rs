//! Domain entities - the core objects of the wall.

mod draft;
mod feed;
mod identity;
mod placeholder;
mod post;

pub use draft::{Attachment, Draft, MAX_BODY_CHARS};
pub use feed::Feed;
pub use identity::Identity;
pub use placeholder::{PlaceholderFeed, SamplePost};
pub use post::{NewPost, Post, PostId};
