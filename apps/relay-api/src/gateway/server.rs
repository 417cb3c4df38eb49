//! WebSocket upgrade handler and per-connection event loop.

use std::sync::Arc;

use axum::extract::ws::{Message as WsMessage, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use relay_common::id::{prefix, prefixed_ulid};

use crate::AppState;

use super::events::{ClientEvent, ServerEvent};
use super::fanout::RoomPayload;
use super::handler;

pub fn router() -> Router<AppState> {
    Router::new().route("/ws", get(ws_upgrade))
}

async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_connection(socket, state))
}

/// Drive one connection from accept to disconnect.
///
/// States: unjoined → joined → disconnected. Events before `join` are
/// dropped; after the socket closes, the registry entry is removed exactly
/// once and the room is notified.
async fn handle_connection(socket: WebSocket, state: AppState) {
    let connection_id = prefixed_ulid(prefix::CONNECTION);
    let (mut ws_tx, mut ws_rx) = socket.split();

    // Unjoined phase: wait for a join event, dropping everything else.
    let (username, room) = loop {
        let Some(msg) = ws_rx.next().await else {
            // Disconnected before joining — nothing to clean up.
            return;
        };
        match msg {
            Ok(WsMessage::Text(text)) => match parse_event(&text, &mut ws_tx).await {
                Some(ClientEvent::Join { username, room, .. }) => break (username, room),
                Some(_) | None => continue,
            },
            Ok(WsMessage::Close(_)) => return,
            Ok(_) => continue,
            Err(err) => {
                tracing::debug!(?err, %connection_id, "ws read error before join");
                return;
            }
        }
    };

    // Subscribe before the join notices go out so this connection sees its
    // own presence update.
    let broadcast_rx = state.broadcast.subscribe();

    let history = handler::handle_join(&state, &connection_id, &username, &room).await;

    tracing::info!(%connection_id, %username, %room, "session joined");

    if let Some(history) = history {
        let json = serde_json::to_string(&ServerEvent::History(history)).unwrap();
        if ws_tx.send(WsMessage::Text(json.into())).await.is_err() {
            handler::handle_disconnect(&state, &connection_id);
            return;
        }
    }

    run_session(&state, &connection_id, &room, ws_tx, ws_rx, broadcast_rx).await;

    handler::handle_disconnect(&state, &connection_id);

    tracing::info!(%connection_id, %username, "session ended");
}

/// Joined-phase loop: dispatch client events, forward room broadcasts.
async fn run_session(
    state: &AppState,
    connection_id: &str,
    room: &str,
    mut ws_tx: SplitSink<WebSocket, WsMessage>,
    mut ws_rx: SplitStream<WebSocket>,
    mut broadcast_rx: broadcast::Receiver<Arc<RoomPayload>>,
) {
    loop {
        tokio::select! {
            // Client sends us an event.
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(WsMessage::Text(text))) => {
                        match parse_event(&text, &mut ws_tx).await {
                            Some(ClientEvent::Join { .. }) => {
                                // Re-joining without a disconnect is unsupported.
                                tracing::debug!(%connection_id, "join while joined ignored");
                            }
                            Some(ClientEvent::Typing(is_typing)) => {
                                handler::handle_typing(state, connection_id, is_typing);
                            }
                            Some(ClientEvent::Message(text)) => {
                                handler::handle_message(state, connection_id, &text).await;
                            }
                            None => continue,
                        }
                    }
                    Some(Ok(WsMessage::Close(_))) | None => break,
                    Some(Ok(_)) => continue,
                    Some(Err(err)) => {
                        tracing::debug!(?err, %connection_id, "ws read error");
                        break;
                    }
                }
            }

            // Event from the fanout hub.
            result = broadcast_rx.recv() => {
                match result {
                    Ok(payload) => {
                        if payload.room != room
                            || payload.exclude.as_deref() == Some(connection_id)
                        {
                            continue;
                        }
                        let json = serde_json::to_string(&payload.event).unwrap();
                        if ws_tx.send(WsMessage::Text(json.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(%connection_id, skipped, "session lagged behind broadcast");
                        // Continue — the missed events are simply dropped.
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }
}

/// Parse a client frame. On failure, reply with an `error` event and
/// return `None` — the connection stays open.
async fn parse_event(
    text: &str,
    ws_tx: &mut SplitSink<WebSocket, WsMessage>,
) -> Option<ClientEvent> {
    match serde_json::from_str(text) {
        Ok(event) => Some(event),
        Err(err) => {
            let reply = ServerEvent::Error(format!("unrecognized event: {err}"));
            let json = serde_json::to_string(&reply).unwrap();
            let _ = ws_tx.send(WsMessage::Text(json.into())).await;
            None
        }
    }
}
