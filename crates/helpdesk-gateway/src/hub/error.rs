//! Hub errors

use thiserror::Error;

/// Errors talking to the relay hub task
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HubError {
    /// The hub task has stopped and its queue is closed
    #[error("relay hub is not running")]
    Closed,

    /// The hub dropped a request without answering
    #[error("relay hub did not reply")]
    NoReply,
}
