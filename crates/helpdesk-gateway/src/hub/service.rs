//! Hub task and its handle

use super::{HubError, RelayHub};
use crate::protocol::ClientEvent;
use helpdesk_core::{ConnectionId, PresenceSnapshot};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Work item for the hub task
#[derive(Debug)]
pub enum HubCommand {
    /// Parsed event from a connection
    Inbound {
        connection_id: ConnectionId,
        event: ClientEvent,
    },
    /// Transport reported the connection closed
    Disconnected { connection_id: ConnectionId },
    /// Read-only request for the current snapshot
    Snapshot { reply: oneshot::Sender<PresenceSnapshot> },
}

/// Cloneable sender side of the hub queue
#[derive(Debug, Clone)]
pub struct HubHandle {
    tx: mpsc::Sender<HubCommand>,
}

impl HubHandle {
    /// Queue an inbound event
    ///
    /// Waits for queue space so events from one connection keep their order.
    pub async fn send_event(
        &self,
        connection_id: ConnectionId,
        event: ClientEvent,
    ) -> Result<(), HubError> {
        self.send(HubCommand::Inbound {
            connection_id,
            event,
        })
        .await
    }

    /// Queue a close notification
    pub async fn disconnect(&self, connection_id: ConnectionId) -> Result<(), HubError> {
        self.send(HubCommand::Disconnected { connection_id }).await
    }

    /// Ask the hub for the current presence snapshot
    pub async fn snapshot(&self) -> Result<PresenceSnapshot, HubError> {
        let (reply, rx) = oneshot::channel();
        self.send(HubCommand::Snapshot { reply }).await?;
        rx.await.map_err(|_| HubError::NoReply)
    }

    async fn send(&self, command: HubCommand) -> Result<(), HubError> {
        self.tx.send(command).await.map_err(|_| HubError::Closed)
    }
}

/// Spawn the hub task
///
/// The task exits once every [`HubHandle`] is dropped.
pub fn spawn_hub(mut hub: RelayHub, buffer: usize) -> (HubHandle, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel(buffer);

    let task = tokio::spawn(async move {
        tracing::info!(buffer, "Relay hub started");

        while let Some(command) = rx.recv().await {
            hub.handle_command(command);
        }

        tracing::info!(online = hub.registry().len(), "Relay hub stopped");
    });

    (HubHandle { tx }, task)
}
