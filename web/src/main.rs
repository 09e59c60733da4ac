//! Arcade Web Server
//!
//! HTTP server hosting one game session at a time and the gameplay log API.
//! Endpoints:
//! - GET    /health           - Health check
//! - GET    /metrics          - Prometheus metrics
//! - GET    /games            - List available games
//! - GET    /game-info/:id    - Get metadata for a specific game
//! - POST   /game/new         - Start a new game
//! - POST   /game/input       - Apply a player input (computer seats reply)
//! - GET    /game/state       - Get current game state
//! - GET    /logs             - Stored logs, most recent first (?type=&severity=&search=)
//! - POST   /logs             - Store one log record
//! - DELETE /logs             - Delete every log
//! - GET    /logs/stats       - Totals by type and severity
//! - GET    /logs/timeline    - 10-minute buckets over the last 24 hours
//! - GET    /logs/categories  - Top error categories

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use engine_config::{load_config, CentralConfig, GamesConfig};
use engine_core::Registry;
use engine_games::{build_registry, GameOptions};
use logbook::{LogEmitter, LogStore, SqliteLogStore};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod error;
mod game;
mod handlers;
mod metrics;
mod types;

use game::GameSession;
use handlers::{
    apply_input, clear_logs, create_log, get_game_info, get_game_state, health, list_games,
    list_logs, log_categories, log_stats, log_timeline, metrics_handler, new_game,
};

/// Shared application state
pub struct AppState {
    /// Every game the server can host
    pub registry: Registry,
    /// Current game session
    pub session: Mutex<GameSession>,
    /// Log persistence gateway
    pub store: Arc<dyn LogStore>,
    /// Stamps and stores events emitted by the session
    pub emitter: LogEmitter,
    /// Session settings (default game, AI pacing, runaway limits)
    pub games: GamesConfig,
}

impl AppState {
    /// Build the registry and the default session around an opened store
    pub fn new(config: &CentralConfig, store: Arc<dyn LogStore>) -> anyhow::Result<Self> {
        let registry = build_registry(&GameOptions {
            dominoes_players: config.games.dominoes_players,
            dominoes_shuffle_seed: config.games.dominoes_shuffle_seed,
        });
        info!(games = ?registry.list(), "Registered games");

        let session =
            GameSession::new(&registry, &config.games.default_game, None, &config.games)?;

        let mut emitter = LogEmitter::new(Arc::clone(&store));
        if let Some(user_agent) = &config.storage.user_agent {
            emitter = emitter.with_user_agent(user_agent.clone());
        }

        Ok(Self {
            registry,
            session: Mutex::new(session),
            store,
            emitter,
            games: config.games.clone(),
        })
    }
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if allowed_origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    cors.allow_origin(AllowOrigin::list(origins))
}

/// Create the application router with the given state.
/// This is separated out for testing purposes.
pub fn create_app(state: Arc<AppState>, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics_handler))
        .route("/games", get(list_games))
        .route("/game-info/:id", get(get_game_info))
        .route("/game/new", post(new_game))
        .route("/game/input", post(apply_input))
        .route("/game/state", get(get_game_state))
        .route("/logs", get(list_logs).post(create_log).delete(clear_logs))
        .route("/logs/stats", get(log_stats))
        .route("/logs/timeline", get(log_timeline))
        .route("/logs/categories", get(log_categories))
        .layer(cors_layer(allowed_origins))
        .with_state(state)
}

/// Creates a future that completes when a shutdown signal is received.
/// Handles Ctrl+C on all platforms.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C; shutting down");
    }
    info!("Shutdown signal received, stopping server...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from config.toml with env var overrides
    let config = load_config();

    // Initialize tracing; RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.common.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    metrics::init_metrics();

    let db_path = config.db_path();
    let store: Arc<dyn LogStore> = Arc::new(SqliteLogStore::open(&db_path)?);
    info!(
        "Configuration: db={}, default_game={}",
        db_path.display(),
        config.games.default_game
    );
    if config.web.allowed_origins.is_empty() {
        warn!("No CORS origins configured; allowing any origin");
    }

    let state = Arc::new(AppState::new(&config, Arc::clone(&store))?);
    let app = create_app(state, &config.web.allowed_origins);

    let addr = format!("{}:{}", config.web.host, config.web.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await?;
    info!("Server shut down gracefully");
    Ok(())
}

#[cfg(test)]
mod tests;
