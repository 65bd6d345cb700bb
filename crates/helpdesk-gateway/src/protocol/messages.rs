//! Socket message format
//!
//! Every text frame is a JSON envelope `{"event": "<name>", "data": <payload>}`.

use super::{AddUserPayload, ChatMessagePayload, ProtocolError, ReceiptPayload, TypingPayload};
use helpdesk_core::PresenceSnapshot;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

/// Raw envelope, before the payload is interpreted
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayMessage {
    /// Event name
    pub event: String,

    /// Event payload
    #[serde(default)]
    pub data: Value,
}

impl GatewayMessage {
    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    fn payload<T: DeserializeOwned>(self) -> Result<T, ProtocolError> {
        serde_json::from_value(self.data).map_err(|source| ProtocolError::InvalidPayload {
            event: self.event,
            source,
        })
    }
}

/// Events a client may send
///
/// Parsed by event name in [`ClientEvent::from_json`] so each failure can be
/// told apart.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// Bind this connection to a user identity
    AddUser(AddUserPayload),
    SendMessage(ChatMessagePayload),
    TypingMessage(TypingPayload),
    MessageDelivered(ReceiptPayload),
    MessageSeen(ReceiptPayload),
}

impl ClientEvent {
    /// Parse a text frame
    pub fn from_json(text: &str) -> Result<Self, ProtocolError> {
        let message = GatewayMessage::from_json(text).map_err(ProtocolError::Decode)?;

        match message.event.as_str() {
            "addUser" => message.payload().map(Self::AddUser),
            "sendMessage" => message.payload().map(Self::SendMessage),
            "typingMessage" => message.payload().map(Self::TypingMessage),
            "messageDelivered" => message.payload().map(Self::MessageDelivered),
            "messageSeen" => message.payload().map(Self::MessageSeen),
            _ => Err(ProtocolError::UnknownEvent(message.event)),
        }
    }

    /// Event name as it appears on the wire
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AddUser(_) => "addUser",
            Self::SendMessage(_) => "sendMessage",
            Self::TypingMessage(_) => "typingMessage",
            Self::MessageDelivered(_) => "messageDelivered",
            Self::MessageSeen(_) => "messageSeen",
        }
    }
}

/// Events the gateway sends
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Full list of online users
    GetUser(PresenceSnapshot),
    GetMessage(ChatMessagePayload),
    TypingMessageGet(TypingPayload),
    MsgDeliveredResponse(ReceiptPayload),
    MsgSeenResponse(ReceiptPayload),
}

impl ServerEvent {
    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Event name as it appears on the wire
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::GetUser(_) => "getUser",
            Self::GetMessage(_) => "getMessage",
            Self::TypingMessageGet(_) => "typingMessageGet",
            Self::MsgDeliveredResponse(_) => "msgDeliveredResponse",
            Self::MsgSeenResponse(_) => "msgSeenResponse",
        }
    }
}

impl std::fmt::Display for ServerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ServerEvent({})", self.name())
    }
}
