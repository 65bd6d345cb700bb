//! Connection manager
//!
//! Tracks every open transport connection using DashMap, so socket tasks can
//! add themselves while the relay hub looks connections up.

use super::{Connection, ConnectionState, Delivery};
use crate::protocol::ServerEvent;
use dashmap::DashMap;
use helpdesk_core::ConnectionId;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Outcome of a fan-out send
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub sent: usize,
    pub dropped: usize,
}

/// Manages all open transport connections
pub struct ConnectionManager {
    /// Open connections by connection ID
    connections: DashMap<ConnectionId, Arc<Connection>>,
}

impl ConnectionManager {
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    /// Create a new connection manager wrapped in Arc
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a newly opened connection
    pub fn add_connection(
        &self,
        id: ConnectionId,
        sender: mpsc::Sender<ServerEvent>,
    ) -> Arc<Connection> {
        let connection = Connection::new(id.clone(), sender);
        self.connections.insert(id.clone(), connection.clone());

        tracing::debug!(connection_id = %id, "Connection added");

        connection
    }

    /// Remove a connection and mark it closed
    ///
    /// Returns None if it was already removed.
    pub fn remove_connection(&self, id: &ConnectionId) -> Option<Arc<Connection>> {
        let (_, connection) = self.connections.remove(id)?;
        connection.close();

        tracing::debug!(connection_id = %id, "Connection removed");

        Some(connection)
    }

    pub fn get_connection(&self, id: &ConnectionId) -> Option<Arc<Connection>> {
        self.connections.get(id).map(|r| r.clone())
    }

    /// Queue an event for one connection without waiting
    ///
    /// Returns None if the connection is not open.
    pub fn try_send_to(&self, id: &ConnectionId, event: ServerEvent) -> Option<Delivery> {
        // Clone the Arc so the shard lock is released before sending
        let connection = self.get_connection(id)?;
        Some(connection.try_send(event))
    }

    /// Queue an event for every open connection without waiting
    pub fn broadcast(&self, event: &ServerEvent) -> BroadcastReport {
        let targets: Vec<Arc<Connection>> =
            self.connections.iter().map(|r| r.value().clone()).collect();

        let mut report = BroadcastReport::default();
        for connection in targets {
            match connection.try_send(event.clone()) {
                Delivery::Sent => report.sent += 1,
                delivery => {
                    report.dropped += 1;
                    tracing::debug!(
                        connection_id = %connection.id(),
                        delivery = ?delivery,
                        event = %event,
                        "Broadcast frame dropped"
                    );
                }
            }
        }

        report
    }

    /// Total number of open connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Number of connections that have announced an identity
    pub fn identified_count(&self) -> usize {
        self.connections
            .iter()
            .filter(|r| r.state() == ConnectionState::Identified)
            .count()
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("connections", &self.connections.len())
            .finish()
    }
}
