//! Gateway Integration Tests
//!
//! Spawn the gateway on an ephemeral port and drive it with real WebSocket
//! clients. No external services needed.
//!
//! Run with: cargo test -p integration-tests --test gateway_tests

use integration_tests::{assert_status, user_ids, TestServer};
use reqwest::StatusCode;
use serde_json::json;
use tokio_tungstenite::tungstenite::Message;

// ============================================================================
// HTTP Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_presence_endpoint_tracks_announces() {
    let server = TestServer::start().await.expect("Failed to start server");
    assert!(server.presence().await.unwrap().is_empty());

    let mut client = server.connect().await.unwrap();
    client.announce(json!("agent-7"), json!({"name": "Ana"})).await.unwrap();
    client.wait_for_presence(1).await.unwrap();

    let entries = server.presence().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["userId"], "agent-7");
    assert_eq!(entries[0]["userInfo"], json!({"name": "Ana"}));
    assert!(entries[0]["socketId"].is_string());
}

// ============================================================================
// Presence Tests
// ============================================================================

#[tokio::test]
async fn test_every_connection_receives_snapshots() {
    let server = TestServer::start().await.unwrap();
    let mut a = server.connect().await.unwrap();
    let mut watcher = server.connect().await.unwrap();

    a.announce(json!(1), json!({"name": "A"})).await.unwrap();

    // The watcher never announced but still sees presence
    let entries = watcher.wait_for_presence(1).await.unwrap();
    assert_eq!(user_ids(&entries), vec![json!(1)]);
    assert_eq!(entries[0]["userInfo"], json!({"name": "A"}));
    a.wait_for_presence(1).await.unwrap();
}

#[tokio::test]
async fn test_disconnect_broadcasts_updated_snapshot() {
    let server = TestServer::start().await.unwrap();
    let mut a = server.connect().await.unwrap();
    let mut b = server.connect().await.unwrap();

    a.announce(json!(1), json!(null)).await.unwrap();
    a.wait_for_presence(1).await.unwrap();
    b.announce(json!(2), json!(null)).await.unwrap();
    a.wait_for_presence(2).await.unwrap();

    b.close().await.unwrap();

    let entries = a.wait_for_presence(1).await.unwrap();
    assert_eq!(user_ids(&entries), vec![json!(1)]);
}

#[tokio::test]
async fn test_close_before_announce_changes_nothing() {
    let server = TestServer::start().await.unwrap();
    let mut a = server.connect().await.unwrap();
    let lurker = server.connect().await.unwrap();

    a.announce(json!(1), json!(null)).await.unwrap();
    a.wait_for_presence(1).await.unwrap();

    lurker.close().await.unwrap();

    a.expect_no_event("getUser").await.unwrap();
    assert_eq!(server.presence().await.unwrap().len(), 1);
}

// ============================================================================
// Relay Tests
// ============================================================================

#[tokio::test]
async fn test_message_to_online_then_offline_recipient() {
    let server = TestServer::start().await.unwrap();
    let mut a = server.connect().await.unwrap();
    let mut b = server.connect().await.unwrap();

    a.announce(json!(1), json!({"name": "A"})).await.unwrap();
    a.wait_for_presence(1).await.unwrap();
    b.announce(json!(2), json!({"name": "B"})).await.unwrap();
    a.wait_for_presence(2).await.unwrap();

    let message = json!({
        "senderId": 1,
        "senderName": "A",
        "recipientId": 2,
        "time": "2024-05-01T10:00:00Z",
        "message": {"text": "hello", "image": ""}
    });
    a.emit("sendMessage", message.clone()).await.unwrap();

    // Forwarded verbatim, including fields the gateway does not interpret
    let received = b.recv_event("getMessage").await.unwrap();
    assert_eq!(received, message);

    b.close().await.unwrap();
    a.wait_for_presence(1).await.unwrap();

    a.emit("sendMessage", message).await.unwrap();
    a.expect_no_event("getMessage").await.unwrap();
}

#[tokio::test]
async fn test_typing_indicator_reaches_recipient() {
    let server = TestServer::start().await.unwrap();
    let mut a = server.connect().await.unwrap();
    let mut b = server.connect().await.unwrap();

    a.announce(json!(1), json!(null)).await.unwrap();
    a.wait_for_presence(1).await.unwrap();
    b.announce(json!(2), json!(null)).await.unwrap();
    a.wait_for_presence(2).await.unwrap();

    let typing = json!({"senderId": 1, "recipientId": 2, "msg": true});
    a.emit("typingMessage", typing.clone()).await.unwrap();

    assert_eq!(b.recv_event("typingMessageGet").await.unwrap(), typing);
}

#[tokio::test]
async fn test_receipts_go_back_to_sender() {
    let server = TestServer::start().await.unwrap();
    let mut author = server.connect().await.unwrap();
    let mut reader = server.connect().await.unwrap();

    author.announce(json!(1), json!(null)).await.unwrap();
    author.wait_for_presence(1).await.unwrap();
    reader.announce(json!(2), json!(null)).await.unwrap();
    author.wait_for_presence(2).await.unwrap();

    let delivered = json!({"_id": "m1", "senderId": 1, "recipientId": 2, "status": "delivered"});
    let seen = json!({"_id": "m1", "senderId": 1, "recipientId": 2, "status": "seen"});
    reader.emit("messageDelivered", delivered.clone()).await.unwrap();
    reader.emit("messageSeen", seen.clone()).await.unwrap();

    assert_eq!(author.recv_event("msgDeliveredResponse").await.unwrap(), delivered);
    assert_eq!(author.recv_event("msgSeenResponse").await.unwrap(), seen);
    reader.expect_no_event("msgSeenResponse").await.unwrap();
}

#[tokio::test]
async fn test_numeric_and_string_ids_are_distinct() {
    let server = TestServer::start().await.unwrap();
    let mut a = server.connect().await.unwrap();
    let mut b = server.connect().await.unwrap();

    a.announce(json!(1), json!(null)).await.unwrap();
    a.wait_for_presence(1).await.unwrap();
    b.announce(json!("2"), json!(null)).await.unwrap();
    a.wait_for_presence(2).await.unwrap();

    a.emit(
        "sendMessage",
        json!({"senderId": 1, "recipientId": 2, "message": {"text": "x"}}),
    )
    .await
    .unwrap();
    b.expect_no_event("getMessage").await.unwrap();
}

// ============================================================================
// Duplicate Announce Tests
// ============================================================================

#[tokio::test]
async fn test_reannounce_before_disconnect_keeps_first_connection() {
    let server = TestServer::start().await.unwrap();
    let mut first = server.connect().await.unwrap();
    let mut second = server.connect().await.unwrap();
    let mut sender = server.connect().await.unwrap();

    first.announce(json!(1), json!({"device": "laptop"})).await.unwrap();
    let original = first.wait_for_presence(1).await.unwrap();

    second.announce(json!(1), json!({"device": "phone"})).await.unwrap();

    // The duplicate gets a snapshot that still points at the first connection
    let seen_by_second = second.wait_for_presence(1).await.unwrap();
    assert_eq!(seen_by_second[0]["socketId"], original[0]["socketId"]);
    assert_eq!(seen_by_second[0]["userInfo"], json!({"device": "laptop"}));

    sender.announce(json!(9), json!(null)).await.unwrap();
    sender.wait_for_presence(2).await.unwrap();

    let message = json!({"senderId": 9, "recipientId": 1, "message": {"text": "hi"}});
    sender.emit("sendMessage", message.clone()).await.unwrap();

    assert_eq!(first.recv_event("getMessage").await.unwrap(), message);
    second.expect_no_event("getMessage").await.unwrap();
}

// ============================================================================
// Malformed Input Tests
// ============================================================================

#[tokio::test]
async fn test_malformed_frames_keep_connection_open() {
    let server = TestServer::start().await.unwrap();
    let mut a = server.connect().await.unwrap();
    let mut b = server.connect().await.unwrap();

    b.announce(json!(2), json!(null)).await.unwrap();
    b.wait_for_presence(1).await.unwrap();

    a.send_raw(Message::Text("not json".to_string())).await.unwrap();
    a.send_raw(Message::Binary(vec![1, 2, 3])).await.unwrap();
    a.emit("joinRoom", json!({"room": "x"})).await.unwrap();
    a.emit("addUser", json!({"userId": ""})).await.unwrap();
    a.emit("sendMessage", json!({"senderId": 1})).await.unwrap();

    // None of that touched the registry
    b.expect_no_event("getUser").await.unwrap();
    assert_eq!(server.presence().await.unwrap().len(), 1);

    // Same connection still works
    a.announce(json!(1), json!(null)).await.unwrap();
    a.wait_for_presence(2).await.unwrap();
    a.emit("sendMessage", json!({"senderId": 1, "recipientId": 2, "message": {"text": "ok"}}))
        .await
        .unwrap();
    assert_eq!(b.recv_event("getMessage").await.unwrap()["message"]["text"], "ok");
}

#[tokio::test]
async fn test_relay_before_announce_is_dropped() {
    let server = TestServer::start().await.unwrap();
    let mut a = server.connect().await.unwrap();
    let mut b = server.connect().await.unwrap();

    b.announce(json!(2), json!(null)).await.unwrap();
    b.wait_for_presence(1).await.unwrap();

    a.emit("sendMessage", json!({"senderId": 1, "recipientId": 2, "message": {"text": "?"}}))
        .await
        .unwrap();
    b.expect_no_event("getMessage").await.unwrap();
}
