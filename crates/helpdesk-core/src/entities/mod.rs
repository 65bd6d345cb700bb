//! Domain entities

mod presence;

pub use presence::{PresenceEntry, PresenceSnapshot};
