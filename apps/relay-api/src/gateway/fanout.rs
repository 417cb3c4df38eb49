//! Broadcast hub for delivering events to room members.
//!
//! One `tokio::sync::broadcast` channel for the whole process. Every joined
//! connection subscribes and filters locally by room (and, for
//! sender-excluded events, by connection id). Multi-instance fan-out would
//! need an external pub/sub layer and is out of scope.

use std::sync::Arc;

use tokio::sync::broadcast;

use super::events::ServerEvent;

/// Capacity of the broadcast channel. Receivers that fall behind skip
/// events (`RecvError::Lagged`).
const BROADCAST_CAPACITY: usize = 4096;

/// An event addressed to the members of one room.
#[derive(Debug, Clone)]
pub struct RoomPayload {
    pub room: String,
    /// When set, the one connection that must not receive this event
    /// (typing notifications and join notices skip their originator).
    pub exclude: Option<String>,
    pub event: ServerEvent,
}

/// The process-wide broadcast hub. Cloneable — stored in `AppState`.
#[derive(Clone)]
pub struct RoomBroadcast {
    sender: broadcast::Sender<Arc<RoomPayload>>,
}

impl RoomBroadcast {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self { sender }
    }

    /// Subscribe to the hub. Each connection calls this once, when it joins
    /// a room.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<RoomPayload>> {
        self.sender.subscribe()
    }

    /// Deliver an event to every member of `room`.
    pub fn to_room(&self, room: &str, event: ServerEvent) {
        self.dispatch(RoomPayload {
            room: room.to_string(),
            exclude: None,
            event,
        });
    }

    /// Deliver an event to every member of `room` except `connection_id`.
    pub fn to_room_except(&self, room: &str, connection_id: &str, event: ServerEvent) {
        self.dispatch(RoomPayload {
            room: room.to_string(),
            exclude: Some(connection_id.to_string()),
            event,
        });
    }

    fn dispatch(&self, payload: RoomPayload) {
        // send() errors when there are no receivers — that's fine.
        let _ = self.sender.send(Arc::new(payload));
    }
}

impl Default for RoomBroadcast {
    fn default() -> Self {
        Self::new()
    }
}
