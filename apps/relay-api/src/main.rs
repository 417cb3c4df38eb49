use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use relay_api::config::Config;
use relay_api::db;
use relay_api::gateway::fanout::RoomBroadcast;
use relay_api::gateway::presence::PresenceRegistry;
use relay_api::AppState;

#[tokio::main]
async fn main() {
    // Load .env file (silently skip if missing — env vars may be set externally)
    if dotenvy::dotenv().is_err() {
        let env_path = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
        let _ = dotenvy::from_path(env_path);
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let port = config.port;

    // Connect to PostgreSQL and provision the messages table before
    // accepting connections. A failure here halts startup.
    let pool = db::pool::connect(&config.database_url).await;
    db::messages::ensure_schema(&pool)
        .await
        .expect("failed to provision message schema");

    let origin = config
        .client_origin
        .parse::<HeaderValue>()
        .expect("CLIENT_ORIGIN is not a valid origin");

    let state = AppState {
        db: pool.clone(),
        config: Arc::new(config),
        presence: Arc::new(PresenceRegistry::new()),
        broadcast: RoomBroadcast::new(),
    };

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let app = relay_api::routes::router()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, "relay-api listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    // Controlled shutdown — nothing is in flight once serve returns.
    db::pool::close_pool(&pool);
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to listen for shutdown signal");
    tracing::info!("shutdown signal received");
}
