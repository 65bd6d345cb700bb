//! # helpdesk-core
//!
//! Domain layer containing the identifiers and presence entities shared by the
//! relay gateway. This crate has zero dependencies on infrastructure (web framework,
//! runtime, etc.).

pub mod entities;
pub mod error;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{PresenceEntry, PresenceSnapshot};
pub use error::DomainError;
pub use value_objects::{ConnectionId, UserId};
