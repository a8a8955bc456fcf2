//! Ports - trait definitions for the hosted backend.
//! These are the "interfaces" that infrastructure must implement.

mod push;
mod repository;
mod storage;

pub use push::{ChannelError, PostInserted, PushChannel, Subscription};
pub use repository::PostRepository;
pub use storage::{ObjectStorage, StorageError};
