//! Game API endpoints
//!
//! Start games, block cells, change difficulty, and fetch or delete games.

use crate::routes::error::{ApiError, ApiResult};
use crate::state::ServerState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use hexcat_core::{Difficulty, GameConfig, GameSnapshot, GameState, Hex, MoveRecord};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Game as returned by every game endpoint
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    #[serde(flatten)]
    pub snapshot: GameSnapshot,
    pub score: u32,
    /// Border cell the cat is heading for
    pub target_position: Option<Hex>,
    pub implementation: &'static str,
}

impl GameView {
    pub fn new(state: &GameState, target_position: Option<Hex>) -> Self {
        Self {
            snapshot: state.snapshot(),
            score: state.score(),
            target_position,
            implementation: "rust",
        }
    }
}

fn view(server: &ServerState, state: &GameState) -> GameView {
    GameView::new(state, server.engine.target_for(state))
}

/// Start a new game. Missing fields take their defaults.
pub async fn start_game(
    State(server): State<Arc<ServerState>>,
    body: Option<Json<GameConfig>>,
) -> ApiResult<Json<GameView>> {
    let config = body.map(|Json(config)| config).unwrap_or_default();
    let state = server.engine.start_new_game(config)?;
    Ok(Json(view(&server, &state)))
}

/// Block request
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRequest {
    pub game_id: String,
    pub q: i32,
    pub r: i32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockResponse {
    #[serde(flatten)]
    pub game: GameView,
    /// False when the cell could not be blocked; the game is unchanged
    pub accepted: bool,
    pub cat_move: Option<MoveRecord>,
}

/// Block a cell and let the cat reply
pub async fn block_cell(
    State(server): State<Arc<ServerState>>,
    Json(req): Json<BlockRequest>,
) -> ApiResult<Json<BlockResponse>> {
    let pos = Hex::checked(req.q, req.r)?;
    let outcome = server
        .engine
        .execute_player_move(&req.game_id, pos)?
        .ok_or_else(|| ApiError::game_not_found(&req.game_id))?;

    Ok(Json(BlockResponse {
        game: view(&server, &outcome.state),
        accepted: outcome.accepted,
        cat_move: outcome.record,
    }))
}

/// Get a game by id
pub async fn get_game_state(
    State(server): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<GameView>> {
    let state = server
        .engine
        .game_state(&id)?
        .ok_or_else(|| ApiError::game_not_found(&id))?;
    Ok(Json(view(&server, &state)))
}

/// Difficulty request; unknown labels mean normal
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyRequest {
    pub game_id: String,
    pub difficulty: Difficulty,
}

/// Switch the cat's strategy for the remaining moves
pub async fn set_difficulty(
    State(server): State<Arc<ServerState>>,
    Json(req): Json<DifficultyRequest>,
) -> ApiResult<Json<GameView>> {
    let state = server
        .engine
        .set_difficulty(&req.game_id, req.difficulty)?
        .ok_or_else(|| ApiError::game_not_found(&req.game_id))?;
    Ok(Json(view(&server, &state)))
}

/// Delete a game
pub async fn delete_game(
    State(server): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if server.engine.delete_game(&id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::game_not_found(&id))
    }
}
