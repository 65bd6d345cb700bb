//! Event payloads
//!
//! Relay payloads only type the identifiers the gateway routes on. Every other
//! field lands in `fields` and is forwarded untouched.

use helpdesk_core::UserId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `addUser` payload - announce identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddUserPayload {
    pub user_id: UserId,
    #[serde(default)]
    pub user_info: Value,
}

/// Chat message (`sendMessage` in, `getMessage` out)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessagePayload {
    pub sender_id: UserId,
    pub recipient_id: UserId,
    /// senderName, time, message `{text, image}` and anything else the client sent
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ChatMessagePayload {
    /// Text body, if any
    pub fn text(&self) -> Option<&str> {
        self.body_field("text")
    }

    /// Image reference (uploaded file name or URL), if any
    pub fn image(&self) -> Option<&str> {
        self.body_field("image")
    }

    fn body_field(&self, key: &str) -> Option<&str> {
        self.fields
            .get("message")
            .and_then(|m| m.get(key))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// Typing indicator (`typingMessage` in, `typingMessageGet` out)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingPayload {
    pub sender_id: UserId,
    pub recipient_id: UserId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl TypingPayload {
    /// Whether the sender is currently typing
    ///
    /// Clients send either a boolean or the draft text in `msg`; an empty
    /// draft means typing stopped.
    pub fn is_typing(&self) -> bool {
        match self.fields.get("msg") {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => !s.is_empty(),
            _ => false,
        }
    }
}

/// Delivery/seen receipt for a previously sent message
///
/// `sender_id` is the author of the acknowledged message, which is who the
/// receipt travels back to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptPayload {
    pub sender_id: UserId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ReceiptPayload {
    /// Identity of the acknowledged message (`_id`)
    pub fn message_id(&self) -> Option<&Value> {
        self.fields.get("_id")
    }

    /// Status tag (e.g. `delivered`, `seen`)
    pub fn status(&self) -> Option<&str> {
        self.fields.get("status").and_then(Value::as_str)
    }
}
