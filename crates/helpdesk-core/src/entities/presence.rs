//! Presence entities
//!
//! A presence entry binds a user to the transport connection it announced on.

use crate::value_objects::{ConnectionId, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One online user
///
/// Serialized as `{ "userId", "socketId", "userInfo" }`, the shape clients
/// receive in `getUser`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceEntry {
    pub user_id: UserId,
    pub socket_id: ConnectionId,
    /// Caller-supplied profile fields, passed through unvalidated
    #[serde(default)]
    pub user_info: Value,
}

impl PresenceEntry {
    /// Create a new presence entry
    pub fn new(user_id: UserId, socket_id: ConnectionId, user_info: Value) -> Self {
        Self {
            user_id,
            socket_id,
            user_info,
        }
    }
}

/// Owned copy of the registry at one point in time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresenceSnapshot(Vec<PresenceEntry>);

impl PresenceSnapshot {
    /// Build a snapshot from a list of entries
    #[must_use]
    pub fn new(entries: Vec<PresenceEntry>) -> Self {
        Self(entries)
    }

    /// Entries in the snapshot (order is not significant)
    pub fn entries(&self) -> &[PresenceEntry] {
        &self.0
    }

    /// Number of online users
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if nobody is online
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<PresenceEntry> {
        self.0
    }
}
