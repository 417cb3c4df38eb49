//! Message store: an append-only log of chat messages, keyed by id,
//! queryable per room in time order.

use diesel::prelude::*;
use diesel::sql_query;

use crate::db::pool::DbPool;
use crate::db::schema::messages;
use crate::error::StoreError;
use crate::models::message::Message;

/// Number of messages delivered as room history on join.
pub const DEFAULT_HISTORY_LIMIT: i64 = 50;

/// Provision the messages table and its `(room, ts desc)` index.
///
/// `IF NOT EXISTS` throughout, so this is safe on every process start,
/// including concurrent starts against the same database.
pub async fn ensure_schema(pool: &DbPool) -> Result<(), StoreError> {
    let mut conn = pool.get().await?;

    diesel_async::RunQueryDsl::execute(
        sql_query(
            "CREATE TABLE IF NOT EXISTS messages (
                id       text PRIMARY KEY,
                room     text NOT NULL,
                username text NOT NULL,
                text     text NOT NULL,
                ts       bigint NOT NULL
            )",
        ),
        &mut conn,
    )
    .await?;

    diesel_async::RunQueryDsl::execute(
        sql_query("CREATE INDEX IF NOT EXISTS messages_room_ts_idx ON messages (room, ts DESC)"),
        &mut conn,
    )
    .await?;

    Ok(())
}

/// Insert one message. A duplicate `id` is a silent no-op — never an error,
/// never a second row.
pub async fn save_message(pool: &DbPool, message: &Message) -> Result<(), StoreError> {
    let mut conn = pool.get().await?;

    diesel_async::RunQueryDsl::execute(
        diesel::insert_into(messages::table)
            .values(message)
            .on_conflict(messages::id)
            .do_nothing(),
        &mut conn,
    )
    .await?;

    Ok(())
}

/// Up to `limit` most recent messages for `room`, oldest first.
///
/// Fetched newest-first by `ts` and reversed for delivery. Relative order
/// of equal `ts` values is unspecified.
pub async fn recent_messages(
    pool: &DbPool,
    room: &str,
    limit: i64,
) -> Result<Vec<Message>, StoreError> {
    let mut conn = pool.get().await?;

    let mut rows: Vec<Message> = diesel_async::RunQueryDsl::load(
        messages::table
            .filter(messages::room.eq(room))
            .order(messages::ts.desc())
            .limit(limit)
            .select(Message::as_select()),
        &mut conn,
    )
    .await?;

    rows.reverse();
    Ok(rows)
}
