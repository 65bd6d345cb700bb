//! Message relay
//!
//! Looks the target user up in the registry and forwards the event to that
//! user's connection only. Offline targets are dropped silently: no buffering,
//! no error back to the sender, no persistence.

use super::{RelayEvent, RelayKind};
use crate::connection::{ConnectionManager, Delivery};
use crate::presence::ConnectionRegistry;
use helpdesk_core::{ConnectionId, UserId};
use std::sync::Arc;

/// What happened to a relayed event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Queued on the target's connection
    Forwarded(ConnectionId),
    /// Target has no presence entry
    RecipientOffline(UserId),
    /// Target is online but its queue is full or its socket is gone
    Dropped {
        connection_id: ConnectionId,
        delivery: Delivery,
    },
}

/// Routes relay events to a single connection
#[derive(Debug, Clone)]
pub struct MessageRelay {
    connections: Arc<ConnectionManager>,
}

impl MessageRelay {
    pub fn new(connections: Arc<ConnectionManager>) -> Self {
        Self { connections }
    }

    /// Forward an event to its target user, if online
    pub fn relay(&self, registry: &ConnectionRegistry, event: RelayEvent) -> RelayOutcome {
        let kind = event.kind();
        let rule = event.target();
        let target = rule.user().clone();
        Self::trace_payload(&event);

        let Some(entry) = registry.find_by_user_id(&target) else {
            tracing::trace!(
                kind = %kind,
                rule = rule.rule(),
                target = %target,
                "Relay target offline, dropping"
            );
            return RelayOutcome::RecipientOffline(target);
        };
        let connection_id = entry.socket_id.clone();

        let delivery = self
            .connections
            .try_send_to(&connection_id, event.into_server_event())
            .unwrap_or(Delivery::Closed);

        Self::log_delivery(kind, &target, &connection_id, delivery);

        if delivery.is_sent() {
            RelayOutcome::Forwarded(connection_id)
        } else {
            RelayOutcome::Dropped {
                connection_id,
                delivery,
            }
        }
    }

    fn trace_payload(event: &RelayEvent) {
        match event {
            RelayEvent::Chat(p) => tracing::trace!(
                has_text = p.text().is_some(),
                has_image = p.image().is_some(),
                "Relaying chat message"
            ),
            RelayEvent::Typing(p) => {
                tracing::trace!(typing = p.is_typing(), "Relaying typing indicator");
            }
            RelayEvent::Delivered(p) | RelayEvent::Seen(p) => tracing::trace!(
                message_id = ?p.message_id(),
                status = ?p.status(),
                "Relaying receipt"
            ),
        }
    }

    fn log_delivery(
        kind: RelayKind,
        target: &UserId,
        connection_id: &ConnectionId,
        delivery: Delivery,
    ) {
        if delivery.is_sent() {
            tracing::trace!(
                kind = %kind,
                target = %target,
                connection_id = %connection_id,
                "Event relayed"
            );
        } else {
            tracing::debug!(
                kind = %kind,
                target = %target,
                connection_id = %connection_id,
                delivery = ?delivery,
                "Relay frame dropped"
            );
        }
    }
}
