//! Mapping of core errors to HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hexcat_core::GameError;
use serde_json::json;

/// Error returned by handlers, rendered as `{"error": "..."}`
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    Core(GameError),
}

impl ApiError {
    pub fn game_not_found(game_id: &str) -> Self {
        ApiError::NotFound(format!("game {} not found", game_id))
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Core(
                GameError::InvalidBoardSize { .. }
                | GameError::InvalidCoordinate(_)
                | GameError::InvalidGameId(_),
            ) => StatusCode::BAD_REQUEST,
            ApiError::Core(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<GameError> for ApiError {
    fn from(err: GameError) -> Self {
        ApiError::Core(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::NotFound(msg) => msg.clone(),
            ApiError::Core(err) => err.to_string(),
        };
        if status.is_server_error() {
            tracing::error!(%message, "request failed");
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
