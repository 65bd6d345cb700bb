//! Individual transport connection
//!
//! Holds the outbound queue and lifecycle state of one socket.

use crate::protocol::ServerEvent;
use helpdesk_core::{ConnectionId, UserId};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Connection lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Socket open, no identity announced yet
    Connecting,
    /// `addUser` received; relay events are accepted
    Identified,
    /// Socket closed
    Closed,
}

/// Result of a non-blocking send to one connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Queued for the socket writer
    Sent,
    /// Outbound queue full; frame dropped
    QueueFull,
    /// Writer has gone away; frame dropped
    Closed,
}

impl Delivery {
    #[must_use]
    pub fn is_sent(self) -> bool {
        matches!(self, Self::Sent)
    }
}

/// A single transport connection
pub struct Connection {
    id: ConnectionId,

    /// Identity announced on this connection (None until `addUser`)
    user_id: RwLock<Option<UserId>>,

    state: RwLock<ConnectionState>,

    /// Channel to the socket writer task
    sender: mpsc::Sender<ServerEvent>,
}

impl Connection {
    /// Create a new connection in the `Connecting` state
    pub fn new(id: ConnectionId, sender: mpsc::Sender<ServerEvent>) -> Arc<Self> {
        Arc::new(Self {
            id,
            user_id: RwLock::new(None),
            state: RwLock::new(ConnectionState::Connecting),
            sender,
        })
    }

    pub fn id(&self) -> &ConnectionId {
        &self.id
    }

    /// Get the announced user ID (if identified)
    pub fn user_id(&self) -> Option<UserId> {
        self.user_id.read().clone()
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.read()
    }

    /// Move `Connecting -> Identified`
    ///
    /// Returns false (and changes nothing) from any other state.
    pub fn identify(&self, user_id: UserId) -> bool {
        let mut state = self.state.write();
        if *state != ConnectionState::Connecting {
            return false;
        }
        *self.user_id.write() = Some(user_id);
        *state = ConnectionState::Identified;
        true
    }

    /// Move to `Closed` from any state
    pub fn close(&self) {
        *self.state.write() = ConnectionState::Closed;
    }

    pub fn is_identified(&self) -> bool {
        self.state() == ConnectionState::Identified
    }

    /// Queue an event without waiting; drops it if the queue is full or closed
    pub fn try_send(&self, event: ServerEvent) -> Delivery {
        match self.sender.try_send(event) {
            Ok(()) => Delivery::Sent,
            Err(mpsc::error::TrySendError::Full(_)) => Delivery::QueueFull,
            Err(mpsc::error::TrySendError::Closed(_)) => Delivery::Closed,
        }
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("user_id", &self.user_id())
            .field("state", &self.state())
            .finish()
    }
}
