//! Protocol error types

use thiserror::Error;

/// Reasons an inbound frame is discarded
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Frame is not a JSON envelope
    #[error("Failed to decode frame: {0}")]
    Decode(#[source] serde_json::Error),

    /// Envelope names an event the gateway does not handle
    #[error("Unknown event: {0}")]
    UnknownEvent(String),

    /// Payload is missing required fields or has the wrong shape
    #[error("Invalid {event} payload: {source}")]
    InvalidPayload {
        event: String,
        #[source]
        source: serde_json::Error,
    },
}
