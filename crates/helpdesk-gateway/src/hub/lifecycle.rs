//! Connection lifecycle handler
//!
//! Per-connection state machine:
//!
//! ```text
//! Connecting --addUser--> Identified --relay events--> Identified
//!      |                       |
//!      +------- close ---------+--> Closed
//! ```
//!
//! Every inbound event goes through [`RelayHub::handle_event`], which runs to
//! completion before the next event is looked at.

use super::HubCommand;
use crate::connection::{Connection, ConnectionManager, Delivery};
use crate::presence::{ConnectionRegistry, PresenceBroadcaster, RegisterOutcome};
use crate::protocol::{AddUserPayload, ClientEvent};
use crate::relay::{MessageRelay, RelayEvent, RelayOutcome};
use helpdesk_core::{ConnectionId, PresenceEntry, PresenceSnapshot};
use std::sync::Arc;

/// What handling one event did
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleOutcome {
    /// Announce stored a new presence entry; snapshot broadcast
    Registered,
    /// Announce for a user that is already online; registry unchanged
    DuplicateIgnored,
    /// `addUser` for a different user on a connection that already announced
    AlreadyIdentified,
    Relayed(RelayOutcome),
    /// Relay event before `addUser`; dropped
    NotIdentified,
    /// Event for a connection that is not open
    UnknownConnection,
    /// Close removed this entry; snapshot broadcast
    Unregistered(PresenceEntry),
    /// Close of a connection without a presence entry
    DisconnectNoop,
}

/// Single owner of presence state
///
/// Owns the registry outright. Only the hub task calls into it, so commands
/// are serialized without locks.
#[derive(Debug)]
pub struct RelayHub {
    registry: ConnectionRegistry,
    connections: Arc<ConnectionManager>,
    broadcaster: PresenceBroadcaster,
    relay: MessageRelay,
}

impl RelayHub {
    pub fn new(connections: Arc<ConnectionManager>) -> Self {
        Self {
            registry: ConnectionRegistry::new(),
            broadcaster: PresenceBroadcaster::new(connections.clone()),
            relay: MessageRelay::new(connections.clone()),
            connections,
        }
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    /// Current presence snapshot
    pub fn snapshot(&self) -> PresenceSnapshot {
        self.registry.list_all()
    }

    /// Handle one queued command
    pub fn handle_command(&mut self, command: HubCommand) {
        match command {
            HubCommand::Inbound {
                connection_id,
                event,
            } => {
                self.handle_event(&connection_id, event);
            }
            HubCommand::Disconnected { connection_id } => {
                self.handle_disconnect(&connection_id);
            }
            HubCommand::Snapshot { reply } => {
                // Requester may have given up; nothing to do then
                let _ = reply.send(self.snapshot());
            }
        }
    }

    /// Handle an inbound event from a connection
    pub fn handle_event(
        &mut self,
        connection_id: &ConnectionId,
        event: ClientEvent,
    ) -> LifecycleOutcome {
        let Some(connection) = self.connections.get_connection(connection_id) else {
            tracing::debug!(
                connection_id = %connection_id,
                event = event.name(),
                "Event from connection that is not open, ignoring"
            );
            return LifecycleOutcome::UnknownConnection;
        };

        match event {
            ClientEvent::AddUser(payload) => self.on_announce(&connection, payload),
            ClientEvent::SendMessage(p) => self.on_relay(&connection, RelayEvent::Chat(p)),
            ClientEvent::TypingMessage(p) => self.on_relay(&connection, RelayEvent::Typing(p)),
            ClientEvent::MessageDelivered(p) => {
                self.on_relay(&connection, RelayEvent::Delivered(p))
            }
            ClientEvent::MessageSeen(p) => self.on_relay(&connection, RelayEvent::Seen(p)),
        }
    }

    /// Handle the transport closing a connection
    ///
    /// Safe to call more than once for the same connection.
    pub fn handle_disconnect(&mut self, connection_id: &ConnectionId) -> LifecycleOutcome {
        self.connections.remove_connection(connection_id);

        let Some(entry) = self.registry.unregister(connection_id) else {
            tracing::debug!(
                connection_id = %connection_id,
                "Closed connection had no presence entry"
            );
            return LifecycleOutcome::DisconnectNoop;
        };

        tracing::info!(
            connection_id = %connection_id,
            user_id = %entry.user_id,
            online = self.registry.len(),
            "User went offline"
        );
        self.broadcaster.broadcast_presence(self.registry.list_all());
        LifecycleOutcome::Unregistered(entry)
    }

    fn on_announce(
        &mut self,
        connection: &Arc<Connection>,
        payload: AddUserPayload,
    ) -> LifecycleOutcome {
        // A connection binds to one identity. Re-announcing that same identity
        // retries registration, which matters once a first-wins holder is gone.
        if !connection.identify(payload.user_id.clone())
            && connection.user_id().as_ref() != Some(&payload.user_id)
        {
            tracing::warn!(
                connection_id = %connection.id(),
                user_id = %payload.user_id,
                bound_to = ?connection.user_id(),
                "addUser for another identity on an identified connection, ignoring"
            );
            return LifecycleOutcome::AlreadyIdentified;
        }

        let outcome = self.registry.register(
            payload.user_id.clone(),
            connection.id().clone(),
            payload.user_info,
        );

        match outcome {
            RegisterOutcome::Registered => {
                tracing::info!(
                    connection_id = %connection.id(),
                    user_id = %payload.user_id,
                    online = self.registry.len(),
                    identified = self.connections.identified_count(),
                    "User came online"
                );
                self.broadcaster.broadcast_presence(self.registry.list_all());
                LifecycleOutcome::Registered
            }
            RegisterOutcome::AlreadyRegistered => {
                // First registration wins; this connection stays unreachable
                // for relays until the original one closes and it re-announces.
                tracing::warn!(
                    connection_id = %connection.id(),
                    user_id = %payload.user_id,
                    registered_connection = ?self
                        .registry
                        .find_by_user_id(&payload.user_id)
                        .map(|e| e.socket_id.to_string()),
                    "Duplicate announce ignored"
                );
                let delivery = self
                    .broadcaster
                    .send_snapshot_to(connection.id(), self.registry.list_all());
                if delivery != Some(Delivery::Sent) {
                    tracing::debug!(
                        connection_id = %connection.id(),
                        delivery = ?delivery,
                        "Snapshot to duplicate announcer dropped"
                    );
                }
                LifecycleOutcome::DuplicateIgnored
            }
        }
    }

    fn on_relay(&mut self, connection: &Arc<Connection>, event: RelayEvent) -> LifecycleOutcome {
        if !connection.is_identified() {
            tracing::debug!(
                connection_id = %connection.id(),
                kind = %event.kind(),
                "Relay event before addUser, dropping"
            );
            return LifecycleOutcome::NotIdentified;
        }

        LifecycleOutcome::Relayed(self.relay.relay(&self.registry, event))
    }
}
