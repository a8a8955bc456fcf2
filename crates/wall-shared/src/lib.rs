//! # Wall Shared
//!
//! Wire types for the hosted backend: REST and storage error bodies and the
//! realtime socket envelope. Shared by every adapter in `wall-infra`.

pub mod realtime;
pub mod response;

pub use response::{RestError, StorageErrorBody};
