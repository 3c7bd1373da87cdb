//! Error types for the game core

/// Errors surfaced by the core and its repositories.
///
/// Rejected moves, unknown games and missing paths are not errors; they are
/// reported through `MoveOutcome`, `Option` and empty paths respectively.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("board size must be between {min} and {max}, got {got}")]
    InvalidBoardSize { got: i32, min: i32, max: i32 },

    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("invalid game id: {0:?}")]
    InvalidGameId(String),

    #[error("corrupt snapshot for game {game_id}: {reason}")]
    CorruptSnapshot { game_id: String, reason: String },

    #[error("repository lock poisoned")]
    LockPoisoned,

    #[error("storage failure: {0}")]
    Storage(#[from] std::io::Error),

    #[error("serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
