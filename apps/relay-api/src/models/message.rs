use diesel::prelude::*;
use serde::Serialize;

use crate::db::schema::messages;

/// A persisted chat message. Immutable once written; never deleted.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable, Serialize)]
#[diesel(table_name = messages)]
pub struct Message {
    /// `"{ts}-{connection_id}"`, derived when the router accepts the event.
    pub id: String,
    pub room: String,
    /// Sender's display name at the time of sending.
    pub username: String,
    /// Trimmed, non-empty body.
    pub text: String,
    /// Milliseconds since the Unix epoch. Monotonic per sender, not
    /// globally ordered across senders.
    pub ts: i64,
}
