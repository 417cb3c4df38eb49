//! Wire-format events exchanged with clients over the WebSocket.

use serde::{Deserialize, Serialize};

use crate::models::message::Message;

/// An event received from a client.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    Join {
        username: String,
        room: String,
        /// Accepted but never checked.
        #[serde(default)]
        password: Option<String>,
    },
    /// Raw typing flag.
    Typing(bool),
    /// Raw message text; trimming and validation happen in the router.
    Message(String),
}

/// An event sent to a client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Recent room history, oldest first. Sent privately to a joiner.
    History(Vec<Message>),
    /// Room-wide notice ("alice joined lobby").
    System(String),
    /// Usernames currently in the room.
    Presence(Vec<String>),
    /// Forwarded to the room minus the typist.
    Typing { username: String, is_typing: bool },
    /// A chat message, delivered to the whole room including the sender.
    Message(Message),
    /// Sent only when a client frame cannot be parsed. Parseable-but-invalid
    /// input (blank text, events before join) is still dropped silently.
    Error(String),
}
