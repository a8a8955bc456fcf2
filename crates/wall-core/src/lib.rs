//! # Wall Core
//!
//! The domain layer of the wall client.
//! Posts, drafts and feeds, the ports the backend must implement, and the
//! wall view model that drives compose, feed load and live updates.
//! Nothing in here talks to the network.

pub mod domain;
pub mod error;
pub mod ports;
pub mod wall;

pub use error::DomainError;
pub use wall::{Wall, WallBackend};
