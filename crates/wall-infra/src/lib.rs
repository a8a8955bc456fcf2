//! # Wall Infrastructure
//!
//! Concrete implementations of the ports defined in `wall-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory only
//! - `supabase` - Hosted backend: REST records, storage bucket, realtime socket

pub mod realtime;
pub mod records;
pub mod storage;

#[cfg(feature = "supabase")]
pub mod config;

// Re-exports - In-Memory
pub use realtime::InMemoryPushChannel;
pub use records::InMemoryPostRepository;
pub use storage::InMemoryObjectStorage;

// Re-exports - Hosted backend
#[cfg(feature = "supabase")]
pub use config::SupabaseConfig;
#[cfg(feature = "supabase")]
pub use realtime::RealtimeChannel;
#[cfg(feature = "supabase")]
pub use records::RestPostRepository;
#[cfg(feature = "supabase")]
pub use storage::BucketStorage;
