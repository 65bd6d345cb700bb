//! Connection registry
//!
//! In-memory map of who is online and which connection reaches them. Owned by
//! the relay hub; nothing else mutates it.

use helpdesk_core::{ConnectionId, PresenceEntry, PresenceSnapshot, UserId};
use serde_json::Value;
use std::collections::HashMap;

/// Result of [`ConnectionRegistry::register`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// New entry stored
    Registered,
    /// The user already had an entry; it was left untouched
    AlreadyRegistered,
}

/// User ID -> presence entry, at most one entry per user
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    entries: HashMap<UserId, PresenceEntry>,
}

impl ConnectionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry iff the user has none
    ///
    /// First registration wins: a second announce for the same user keeps the
    /// original connection ID and user info.
    pub fn register(
        &mut self,
        user_id: UserId,
        connection_id: ConnectionId,
        user_info: Value,
    ) -> RegisterOutcome {
        if self.entries.contains_key(&user_id) {
            return RegisterOutcome::AlreadyRegistered;
        }

        let entry = PresenceEntry::new(user_id.clone(), connection_id, user_info);
        self.entries.insert(user_id, entry);
        RegisterOutcome::Registered
    }

    /// Remove the entry bound to a connection
    ///
    /// Returns None if no entry uses that connection.
    pub fn unregister(&mut self, connection_id: &ConnectionId) -> Option<PresenceEntry> {
        let user_id = self
            .entries
            .values()
            .find(|e| &e.socket_id == connection_id)
            .map(|e| e.user_id.clone())?;

        self.entries.remove(&user_id)
    }

    pub fn find_by_user_id(&self, user_id: &UserId) -> Option<&PresenceEntry> {
        self.entries.get(user_id)
    }

    /// Owned copy of all entries, in no particular order
    pub fn list_all(&self) -> PresenceSnapshot {
        PresenceSnapshot::new(self.entries.values().cloned().collect())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
