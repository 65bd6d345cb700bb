//! WebSocket handler
//!
//! Pumps frames between one socket and the relay hub.

use crate::hub::HubError;
use crate::protocol::{ClientEvent, ServerEvent};
use crate::server::GatewayState;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use helpdesk_core::ConnectionId;
use tokio::sync::mpsc;

/// WebSocket upgrade handler
pub async fn socket_handler(
    State(state): State<GatewayState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(state, socket))
}

/// Handle an upgraded WebSocket connection
async fn handle_socket(state: GatewayState, socket: WebSocket) {
    let connection_id = ConnectionId::generate();

    let (tx, mut rx) = mpsc::channel::<ServerEvent>(state.config().relay.outbound_buffer);
    state
        .connection_manager()
        .add_connection(connection_id.clone(), tx);

    tracing::info!(
        connection_id = %connection_id,
        open = state.connection_manager().connection_count(),
        "WebSocket connection established"
    );

    let (mut ws_sink, mut ws_stream) = socket.split();

    let hub = state.hub().clone();
    let connection_id_recv = connection_id.clone();

    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = ws_stream.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    let event = match ClientEvent::from_json(&text) {
                        Ok(event) => event,
                        Err(e) => {
                            // Bad frames are dropped; the connection stays up
                            tracing::warn!(
                                connection_id = %connection_id_recv,
                                error = %e,
                                "Discarding malformed frame"
                            );
                            continue;
                        }
                    };

                    tracing::trace!(
                        connection_id = %connection_id_recv,
                        event = event.name(),
                        "Frame received"
                    );

                    if let Err(HubError::Closed) =
                        hub.send_event(connection_id_recv.clone(), event).await
                    {
                        tracing::warn!(
                            connection_id = %connection_id_recv,
                            "Relay hub stopped, dropping connection"
                        );
                        break;
                    }
                }
                Ok(Message::Binary(_)) => {
                    tracing::debug!(
                        connection_id = %connection_id_recv,
                        "Binary frames not supported, discarding"
                    );
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {
                    // Pong is handled automatically by axum
                }
                Ok(Message::Close(_)) => {
                    tracing::info!(connection_id = %connection_id_recv, "Client closed connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!(
                        connection_id = %connection_id_recv,
                        error = %e,
                        "WebSocket error"
                    );
                    break;
                }
            }
        }
    });

    let connection_id_send = connection_id.clone();

    let mut send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let json = match event.to_json() {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!(
                        connection_id = %connection_id_send,
                        error = %e,
                        event = %event,
                        "Failed to encode outbound event"
                    );
                    continue;
                }
            };

            if ws_sink.send(Message::Text(json)).await.is_err() {
                tracing::warn!(
                    connection_id = %connection_id_send,
                    "Failed to send message to WebSocket"
                );
                break;
            }
        }

        // Outbound queue closed: the hub has dropped this connection
        let _ = ws_sink.close().await;
    });

    // Wait for either side to finish, then stop the other
    tokio::select! {
        _ = &mut recv_task => {
            tracing::debug!(connection_id = %connection_id, "Receive task ended");
            send_task.abort();
        }
        _ = &mut send_task => {
            tracing::debug!(connection_id = %connection_id, "Send task ended");
            recv_task.abort();
        }
    }

    cleanup_connection(&state, connection_id).await;
}

/// Report the close to the hub, which unregisters and rebroadcasts
///
/// Goes through the hub queue so it lands after every event this connection
/// already queued.
async fn cleanup_connection(state: &GatewayState, connection_id: ConnectionId) {
    if state.hub().disconnect(connection_id.clone()).await.is_err() {
        // No hub left to broadcast to anyone; just forget the socket
        state.connection_manager().remove_connection(&connection_id);
    }

    tracing::info!(connection_id = %connection_id, "WebSocket connection closed");
}
