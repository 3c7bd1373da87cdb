//! HEXCAT Server - HTTP API for the trap-the-cat game
//!
//! This crate provides the web backend:
//! - REST API for game lifecycle and moves
//! - Suggestions, statistics and analysis per game
//! - In-memory or JSON-file game storage

mod routes;
mod state;

use axum::{
    routing::{delete, get, post},
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub use state::ServerState;

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    /// Directory for JSON game files; games stay in memory when unset
    pub data_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8003,
            data_dir: None,
        }
    }
}

/// Create the router with all routes
pub fn create_router(state: Arc<ServerState>) -> Router {
    Router::new()
        // Status endpoint
        .route("/api/status", get(routes::status::status_handler))
        // Game lifecycle
        .route("/api/game/start", post(routes::game::start_game))
        .route("/api/game/block", post(routes::game::block_cell))
        .route("/api/game/difficulty", post(routes::game::set_difficulty))
        .route("/api/game/state/:id", get(routes::game::get_game_state))
        .route("/api/game/:id", delete(routes::game::delete_game))
        // Reports and hints
        .route(
            "/api/game/statistics/:id",
            get(routes::reports::get_statistics),
        )
        .route("/api/game/analysis/:id", get(routes::reports::get_analysis))
        .route(
            "/api/game/suggestion/:id",
            get(routes::reports::get_suggestion),
        )
        // Shared state
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// Start the HTTP server
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = match &config.data_dir {
        Some(dir) => ServerState::with_data_dir(dir)?,
        None => ServerState::new(),
    };
    let router = create_router(Arc::new(state));

    tracing::info!("HEXCAT Server starting on http://0.0.0.0:{}", config.port);
    match &config.data_dir {
        Some(dir) => tracing::info!("Games stored in: {}", dir.display()),
        None => tracing::info!("Games kept in memory"),
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
