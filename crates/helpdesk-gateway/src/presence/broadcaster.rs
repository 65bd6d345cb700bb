//! Presence broadcaster
//!
//! Pushes the full online-user list (`getUser`) to connected clients. Every
//! push replaces the client's view wholesale; there are no diffs.

use crate::connection::{BroadcastReport, ConnectionManager, Delivery};
use crate::protocol::ServerEvent;
use helpdesk_core::{ConnectionId, PresenceSnapshot};
use std::sync::Arc;

/// Sends presence snapshots over the open connections
#[derive(Debug, Clone)]
pub struct PresenceBroadcaster {
    connections: Arc<ConnectionManager>,
}

impl PresenceBroadcaster {
    pub fn new(connections: Arc<ConnectionManager>) -> Self {
        Self { connections }
    }

    /// Send the snapshot to every open connection, identified or not
    ///
    /// Fire-and-forget: full or closed queues drop the frame for that
    /// connection only.
    pub fn broadcast_presence(&self, snapshot: PresenceSnapshot) -> BroadcastReport {
        let online = snapshot.len();
        let report = self.connections.broadcast(&ServerEvent::GetUser(snapshot));

        tracing::debug!(
            online = online,
            sent = report.sent,
            dropped = report.dropped,
            "Presence broadcast"
        );

        report
    }

    /// Send the snapshot to a single connection
    pub fn send_snapshot_to(
        &self,
        connection_id: &ConnectionId,
        snapshot: PresenceSnapshot,
    ) -> Option<Delivery> {
        self.connections
            .try_send_to(connection_id, ServerEvent::GetUser(snapshot))
    }
}
