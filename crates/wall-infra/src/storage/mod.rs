//! Object storage implementations.

mod memory;

pub use memory::InMemoryObjectStorage;

#[cfg(feature = "supabase")]
mod bucket;
#[cfg(feature = "supabase")]
pub use bucket::BucketStorage;
