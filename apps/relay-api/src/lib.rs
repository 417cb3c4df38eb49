pub mod config;
pub mod db;
pub mod error;
pub mod gateway;
pub mod models;
pub mod routes;

use std::sync::Arc;

use config::Config;
use db::pool::DbPool;
use gateway::fanout::RoomBroadcast;
use gateway::presence::PresenceRegistry;

/// Shared application state available to route handlers and gateway sessions.
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Arc<Config>,
    pub presence: Arc<PresenceRegistry>,
    pub broadcast: RoomBroadcast,
}
