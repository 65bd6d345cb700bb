//! Presence tracking
//!
//! The registry of online users and the broadcaster that republishes it.

mod broadcaster;
mod registry;

pub use broadcaster::PresenceBroadcaster;
pub use registry::{ConnectionRegistry, RegisterOutcome};
