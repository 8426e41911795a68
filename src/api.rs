//! HTTP handlers: the thin routing layer in front of the game sessions.
//!
//! Each handler resolves the session for the game id and delegates; all
//! game logic lives in `state`.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::error::GameError;
use crate::protocol::*;
use crate::state::AppState;
use crate::types::{Game, PlayerStats};

/// POST /api/game/create
pub async fn create_game(
    State(state): State<AppState>,
    Json(req): Json<CreateGameRequest>,
) -> Result<Json<Game>, GameError> {
    let game = state.create_game(&req.host_name).await?;
    Ok(Json(game))
}

/// POST /api/game/{game_id}/join
pub async fn join_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    Json(req): Json<JoinGameRequest>,
) -> Result<Json<JoinGameResponse>, GameError> {
    let session = state.session(&game_id).await?;
    let (player, game_state) = session.join(&req.player_name).await?;
    Ok(Json(JoinGameResponse { player, game_state }))
}

/// POST /api/game/{game_id}/start
pub async fn start_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<Game>, GameError> {
    let session = state.session(&game_id).await?;
    Ok(Json(session.start().await?))
}

/// POST /api/game/{game_id}/message
pub async fn post_message(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    Json(req): Json<PostMessageRequest>,
) -> Result<Json<PostMessageResponse>, GameError> {
    let session = state.session(&game_id).await?;
    let (message, ai_response) = session
        .post_message(&req.player_id, &req.message, req.request_ai_response)
        .await?;
    Ok(Json(PostMessageResponse {
        message,
        ai_response,
    }))
}

/// POST /api/game/{game_id}/vote
pub async fn vote(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    Json(req): Json<VoteRequest>,
) -> Result<Json<Game>, GameError> {
    let session = state.session(&game_id).await?;
    Ok(Json(session.vote(&req.player_id, &req.voted_for_id).await?))
}

/// GET /api/game/{game_id}
///
/// Full record including every player's role; see DESIGN.md on why this
/// read stays unredacted.
pub async fn get_state(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<Game>, GameError> {
    let session = state.session(&game_id).await?;
    Ok(Json(session.state().await?))
}

/// GET /api/stats/{player_name}
pub async fn player_stats(
    State(state): State<AppState>,
    Path(player_name): Path<String>,
) -> Result<Json<PlayerStats>, GameError> {
    let stats = state
        .stats_store()
        .player_stats(&player_name)
        .await
        .map_err(|e| GameError::Storage(e.to_string()))?;
    Ok(Json(stats))
}

/// GET /api/health
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
