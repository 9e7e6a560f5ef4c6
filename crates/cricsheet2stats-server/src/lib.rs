// Query service - read-only HTTP API over the precomputed stats tables
//
// Batch-then-serve: tables are loaded once at startup and never reloaded.
// If they are missing the service stays up and every data-dependent
// endpoint answers 500 until the aggregation pipeline has been run and the
// process restarted.
//
// Features:
// - Axum HTTP server (HTTP/1.1, HTTP/2)
// - Permissive CORS (any origin, method, header)
// - Structured logging with tracing
// - Graceful shutdown

use anyhow::{Context, Result};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use cricsheet2stats_config::RuntimeConfig;
use cricsheet2stats_storage::StatTables;
use serde_json::json;
use std::sync::Arc;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

mod handlers;
mod init;

use handlers::{
    health_check, list_players, player_batting, player_bowling, player_career, root,
    season_batting, season_bowling,
};
use init::{init_tracing, load_tables};

/// Application state shared across all requests
#[derive(Clone)]
pub(crate) struct AppState {
    /// None when the tables could not be loaded at startup.
    pub tables: Option<Arc<StatTables>>,
}

/// Error type that implements IntoResponse
#[derive(Debug)]
pub(crate) struct AppError {
    status: StatusCode,
    error: anyhow::Error,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("Request error: {:?}", self.error);
        (
            self.status,
            Json(json!({
                "error": self.error.to_string(),
            })),
        )
            .into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: err.into(),
        }
    }
}

impl AppError {
    pub fn with_status(status: StatusCode, error: anyhow::Error) -> Self {
        Self { status, error }
    }

    #[cfg(test)]
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

/// Graceful shutdown handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/players", get(list_players))
        .route("/player/:name/batting", get(player_batting))
        .route("/player/:name/bowling", get(player_bowling))
        .route("/player/:name/career", get(player_career))
        .route("/seasons/:year/batting", get(season_batting))
        .route("/seasons/:year/bowling", get(season_bowling))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Entry point for the query service
pub async fn run_with_config(config: RuntimeConfig) -> Result<()> {
    init_tracing(&config);

    let server_config = config.server.clone().unwrap_or_default();
    let addr = server_config.listen_addr.clone();

    let state = AppState {
        tables: load_tables(&config),
    };
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind to {}", addr))?;

    info!("Stats query API listening on http://{}", addr);
    info!("Routes:");
    info!("  GET http://{}/players                - All known players", addr);
    info!("  GET http://{}/player/NAME/batting    - Season batting rows", addr);
    info!("  GET http://{}/player/NAME/bowling    - Season bowling rows", addr);
    info!("  GET http://{}/player/NAME/career     - Career batting + bowling", addr);
    info!("  GET http://{}/seasons/YEAR/batting   - Season batting leaderboard", addr);
    info!("  GET http://{}/seasons/YEAR/bowling   - Season bowling leaderboard", addr);
    info!("Press Ctrl+C or send SIGTERM to stop");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");

    Ok(())
}
