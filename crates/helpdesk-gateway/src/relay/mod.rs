//! Point-to-point event relay
//!
//! Forwards chat messages, typing indicators and receipts to exactly one
//! connection, or drops them when the target is offline.

mod event;
mod message_relay;

pub use event::{RelayEvent, RelayKind, RelayTarget};
pub use message_relay::{MessageRelay, RelayOutcome};

#[cfg(test)]
pub(crate) use event::relay_event_from_json;
