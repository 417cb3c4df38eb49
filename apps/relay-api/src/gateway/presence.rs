//! In-memory session registry: which connection is who, and in which room.
//!
//! Presence is authoritative only within one process. Rooms have no
//! identity of their own — a room is whatever set of connections currently
//! share a `room` value here.

use dashmap::DashMap;

/// Session info recorded at join time.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionInfo {
    pub username: String,
    pub room: String,
}

/// Thread-safe, DashMap-backed presence registry.
///
/// Owned by `AppState`; constructed once at server start. Entries are
/// created on join and removed on disconnect, so its size always equals
/// the number of joined live connections.
pub struct PresenceRegistry {
    inner: DashMap<String, SessionInfo>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self {
            inner: DashMap::new(),
        }
    }

    /// Record a session at join time. Overwrites any existing entry for
    /// the connection.
    pub fn insert(&self, connection_id: &str, info: SessionInfo) {
        self.inner.insert(connection_id.to_string(), info);
    }

    /// Session info for a connection, if it has joined.
    pub fn get(&self, connection_id: &str) -> Option<SessionInfo> {
        self.inner.get(connection_id).map(|e| e.value().clone())
    }

    /// Remove a connection's session. Returns the removed entry, so a
    /// repeat disconnect signal observes `None` and stays a no-op.
    pub fn remove(&self, connection_id: &str) -> Option<SessionInfo> {
        self.inner.remove(connection_id).map(|(_, info)| info)
    }

    /// Usernames currently joined to `room`, by full scan.
    ///
    /// O(total connections), which is fine at single-server chat scale;
    /// no incremental per-room index is maintained.
    pub fn room_members(&self, room: &str) -> Vec<String> {
        let mut members = Vec::new();
        for entry in self.inner.iter() {
            if entry.value().room == room {
                members.push(entry.value().username.clone());
            }
        }
        members
    }

    /// Number of joined connections.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Default for PresenceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
