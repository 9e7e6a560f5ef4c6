// HTTP request handlers for the query service
//
// Pure pass-through lookup/filter over the precomputed tables. No handler
// mutates anything.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use cricsheet2stats_core::{BattingRow, BowlingRow};
use cricsheet2stats_storage::StatTables;
use metrics::counter;
use serde_json::{json, Value};

use crate::{AppError, AppState};

const TABLES_UNAVAILABLE: &str =
    "Stats tables not loaded. Run the aggregation pipeline, then restart the service.";

/// GET / - Welcome message
pub(crate) async fn root() -> Json<Value> {
    Json(json!({"message": "Welcome to the cricsheet2stats query API!"}))
}

/// GET /health - Basic health check
pub(crate) async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "healthy"})))
}

fn tables(state: &AppState) -> Result<&StatTables, AppError> {
    state.tables.as_deref().ok_or_else(|| {
        counter!("api.errors.tables_unavailable", 1);
        AppError::with_status(
            StatusCode::INTERNAL_SERVER_ERROR,
            anyhow::anyhow!(TABLES_UNAVAILABLE),
        )
    })
}

fn not_found(message: String) -> AppError {
    counter!("api.errors.not_found", 1);
    AppError::with_status(StatusCode::NOT_FOUND, anyhow::anyhow!(message))
}

/// GET /players - All players known to the career table
pub(crate) async fn list_players(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    counter!("api.requests", 1);
    let tables = tables(&state)?;
    let players: Vec<&str> = tables
        .career_batting
        .iter()
        .map(|row| row.player.as_str())
        .collect();
    Ok(Json(json!({"players": players})))
}

/// GET /player/{name}/batting - Season batting rows for one player
pub(crate) async fn player_batting(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, AppError> {
    counter!("api.requests", 1);
    let tables = tables(&state)?;
    let needle = name.to_lowercase();
    let rows: Vec<&BattingRow> = tables
        .season_batting
        .iter()
        .filter(|row| row.player.to_lowercase() == needle)
        .collect();
    if rows.is_empty() {
        return Err(not_found(format!("Player '{}' not found", name)));
    }
    Ok(Json(json!({"player": name, "batting_stats": rows})))
}

/// GET /player/{name}/bowling - Season bowling rows for one player
pub(crate) async fn player_bowling(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, AppError> {
    counter!("api.requests", 1);
    let tables = tables(&state)?;
    let needle = name.to_lowercase();
    let rows: Vec<&BowlingRow> = tables
        .season_bowling
        .iter()
        .filter(|row| row.player.to_lowercase() == needle)
        .collect();
    if rows.is_empty() {
        return Err(not_found(format!("Player '{}' not found", name)));
    }
    Ok(Json(json!({"player": name, "bowling_stats": rows})))
}

/// GET /player/{name}/career - Career batting and bowling for one player
///
/// Either list may be empty; 404 only when both are.
pub(crate) async fn player_career(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, AppError> {
    counter!("api.requests", 1);
    let tables = tables(&state)?;
    let needle = name.to_lowercase();
    let batting: Vec<_> = tables
        .career_batting
        .iter()
        .filter(|row| row.player.to_lowercase() == needle)
        .collect();
    let bowling: Vec<_> = tables
        .career_bowling
        .iter()
        .filter(|row| row.player.to_lowercase() == needle)
        .collect();
    if batting.is_empty() && bowling.is_empty() {
        return Err(not_found(format!("Player '{}' not found", name)));
    }
    Ok(Json(json!({
        "player": name,
        "career_batting": batting,
        "career_bowling": bowling,
    })))
}

/// GET /seasons/{year}/batting - Batting leaderboard for one season
pub(crate) async fn season_batting(
    State(state): State<AppState>,
    Path(year): Path<String>,
) -> Result<Json<Value>, AppError> {
    counter!("api.requests", 1);
    let tables = tables(&state)?;
    let mut rows: Vec<&BattingRow> = tables
        .season_batting
        .iter()
        .filter(|row| row.season == year)
        .collect();
    if rows.is_empty() {
        return Err(not_found(format!("No data found for season {}", year)));
    }
    rows.sort_by(|a, b| b.runs.cmp(&a.runs));
    Ok(Json(json!({"season": year, "batting_leaderboard": rows})))
}

/// GET /seasons/{year}/bowling - Bowling leaderboard for one season
pub(crate) async fn season_bowling(
    State(state): State<AppState>,
    Path(year): Path<String>,
) -> Result<Json<Value>, AppError> {
    counter!("api.requests", 1);
    let tables = tables(&state)?;
    let mut rows: Vec<&BowlingRow> = tables
        .season_bowling
        .iter()
        .filter(|row| row.season == year)
        .collect();
    if rows.is_empty() {
        return Err(not_found(format!("No data found for season {}", year)));
    }
    rows.sort_by(|a, b| b.wickets.cmp(&a.wickets));
    Ok(Json(json!({"season": year, "bowling_leaderboard": rows})))
}
