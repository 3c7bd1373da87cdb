//! Game configuration

use serde::{Deserialize, Serialize};

use crate::board::{check_board_size, DEFAULT_BOARD_SIZE};
use crate::error::Result;
use crate::strategy::Difficulty;

/// Settings for a new game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    /// Board radius
    #[serde(default = "default_board_size")]
    pub board_size: i32,
    /// Selects the cat's strategy
    #[serde(default)]
    pub difficulty: Difficulty,
}

fn default_board_size() -> i32 {
    DEFAULT_BOARD_SIZE
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            difficulty: Difficulty::Normal,
        }
    }
}

impl GameConfig {
    pub fn new(board_size: i32, difficulty: Difficulty) -> Self {
        Self {
            board_size,
            difficulty,
        }
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_board_size(self.board_size)
    }
}
