//! Socket protocol definitions
//!
//! Defines the event envelope, the inbound and outbound event sets, and their payloads.

mod error;
mod messages;
mod payloads;

pub use error::ProtocolError;
pub use messages::{ClientEvent, GatewayMessage, ServerEvent};
pub use payloads::{AddUserPayload, ChatMessagePayload, ReceiptPayload, TypingPayload};
