//! Record store implementations.

mod memory;

pub use memory::InMemoryPostRepository;

#[cfg(feature = "supabase")]
mod rest;
#[cfg(feature = "supabase")]
pub use rest::RestPostRepository;
