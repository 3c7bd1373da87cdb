//! Statistics, analysis and suggestion endpoints

use crate::routes::error::{ApiError, ApiResult};
use crate::state::ServerState;
use axum::{
    extract::{Path, State},
    Json,
};
use hexcat_core::{GameAnalysis, GameStatistics, Hex};
use serde::Serialize;
use std::sync::Arc;

pub async fn get_statistics(
    State(server): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<GameStatistics>> {
    server
        .engine
        .game_statistics(&id)?
        .map(Json)
        .ok_or_else(|| ApiError::game_not_found(&id))
}

pub async fn get_analysis(
    State(server): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<GameAnalysis>> {
    server
        .engine
        .analyze_game(&id)?
        .map(Json)
        .ok_or_else(|| ApiError::game_not_found(&id))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionResponse {
    /// Best block found by simulating the cat's reply
    pub suggestion: Option<Hex>,
    /// Free neighbor of the cat closest to the border
    pub quick_hint: Option<Hex>,
    pub message: &'static str,
}

/// Suggest a cell to block
pub async fn get_suggestion(
    State(server): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<SuggestionResponse>> {
    if server.engine.game_state(&id)?.is_none() {
        return Err(ApiError::game_not_found(&id));
    }

    let suggestion = server.engine.intelligent_suggestion(&id)?;
    let quick_hint = server.engine.suggested_move(&id)?;
    let message = if suggestion.is_some() {
        "Block this cell to cut off the cat's best escape"
    } else {
        "No suggestions available"
    };

    Ok(Json(SuggestionResponse {
        suggestion,
        quick_hint,
        message,
    }))
}
