//! Relay events
//!
//! A relay event only lives for the duration of one relay call.

use crate::protocol::{ChatMessagePayload, ReceiptPayload, ServerEvent, TypingPayload};
use helpdesk_core::UserId;

/// Who an event is routed to, and which payload field named them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayTarget<'a> {
    /// `recipientId` - messages and typing indicators
    Recipient(&'a UserId),
    /// `senderId` of the acknowledged message - delivery and seen receipts
    OriginalSender(&'a UserId),
}

impl<'a> RelayTarget<'a> {
    pub fn user(self) -> &'a UserId {
        match self {
            Self::Recipient(user) | Self::OriginalSender(user) => user,
        }
    }

    /// Name of the routing rule, for logs
    #[must_use]
    pub const fn rule(self) -> &'static str {
        match self {
            Self::Recipient(_) => "recipient",
            Self::OriginalSender(_) => "original_sender",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayKind {
    Chat,
    Typing,
    Delivered,
    Seen,
}

impl RelayKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Typing => "typing",
            Self::Delivered => "delivered",
            Self::Seen => "seen",
        }
    }
}

impl std::fmt::Display for RelayKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event routed to a single user
#[derive(Debug, Clone, PartialEq)]
pub enum RelayEvent {
    Chat(ChatMessagePayload),
    Typing(TypingPayload),
    Delivered(ReceiptPayload),
    Seen(ReceiptPayload),
}

impl RelayEvent {
    pub fn kind(&self) -> RelayKind {
        match self {
            Self::Chat(_) => RelayKind::Chat,
            Self::Typing(_) => RelayKind::Typing,
            Self::Delivered(_) => RelayKind::Delivered,
            Self::Seen(_) => RelayKind::Seen,
        }
    }

    /// Routing rule for this event, carrying the user it resolves to
    pub fn target(&self) -> RelayTarget<'_> {
        match self {
            Self::Chat(p) => RelayTarget::Recipient(&p.recipient_id),
            Self::Typing(p) => RelayTarget::Recipient(&p.recipient_id),
            Self::Delivered(p) | Self::Seen(p) => RelayTarget::OriginalSender(&p.sender_id),
        }
    }

    /// Outbound form, carrying the payload unchanged
    pub fn into_server_event(self) -> ServerEvent {
        match self {
            Self::Chat(p) => ServerEvent::GetMessage(p),
            Self::Typing(p) => ServerEvent::TypingMessageGet(p),
            Self::Delivered(p) => ServerEvent::MsgDeliveredResponse(p),
            Self::Seen(p) => ServerEvent::MsgSeenResponse(p),
        }
    }
}

/// Build a relay event from a client frame
#[cfg(test)]
pub(crate) fn relay_event_from_json(frame: &serde_json::Value) -> RelayEvent {
    use crate::protocol::ClientEvent;

    match ClientEvent::from_json(&frame.to_string()).expect("valid frame") {
        ClientEvent::SendMessage(p) => RelayEvent::Chat(p),
        ClientEvent::TypingMessage(p) => RelayEvent::Typing(p),
        ClientEvent::MessageDelivered(p) => RelayEvent::Delivered(p),
        ClientEvent::MessageSeen(p) => RelayEvent::Seen(p),
        ClientEvent::AddUser(_) => panic!("addUser is not a relay event"),
    }
}
