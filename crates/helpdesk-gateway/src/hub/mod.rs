//! Relay hub
//!
//! One task owns the presence registry and handles every connect, announce,
//! relay and close event in arrival order.

mod error;
mod lifecycle;
mod service;

pub use error::HubError;
pub use lifecycle::{LifecycleOutcome, RelayHub};
pub use service::{spawn_hub, HubCommand, HubHandle};
