//! Push channel implementations.

mod memory;

pub use memory::InMemoryPushChannel;

#[cfg(feature = "supabase")]
mod protocol;
#[cfg(feature = "supabase")]
mod socket;
#[cfg(feature = "supabase")]
pub use socket::RealtimeChannel;
