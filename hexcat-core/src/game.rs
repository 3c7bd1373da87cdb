//! Game state, status derivation, scoring and snapshots

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::board::HexBoard;
use crate::error::{GameError, Result};
use crate::hex::Hex;
use crate::strategy::{Difficulty, MovementStrategy};

// ============================================================================
// CONSTANTS
// ============================================================================

const WIN_BASE_SCORE: i64 = 1000;
const WIN_MOVE_PENALTY: i64 = 10;
const WIN_RADIUS_BONUS: i64 = 50;
const LOSS_BASE_SCORE: i64 = 100;
const LOSS_MOVE_PENALTY: i64 = 5;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Game status. `PlayerWon` and `PlayerLost` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    InProgress,
    PlayerWon,
    PlayerLost,
}

impl GameStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            GameStatus::InProgress => "IN_PROGRESS",
            GameStatus::PlayerWon => "PLAYER_WON",
            GameStatus::PlayerLost => "PLAYER_LOST",
        }
    }

    pub fn is_terminal(self) -> bool {
        self != GameStatus::InProgress
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One accepted player move and the cat's reply to it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRecord {
    pub blocked: Hex,
    pub cat_from: Hex,
    /// Equal to `cat_from` when the cat did not move
    pub cat_to: Hex,
}

/// Nearest unblocked goal cell to `cat`; the first one in board enumeration
/// order wins ties
pub fn escape_target(board: &HexBoard, cat: Hex, strategy: &dyn MovementStrategy) -> Option<Hex> {
    let is_goal = strategy.goal_predicate(board);
    board
        .positions_matching(|pos| is_goal(pos) && !board.is_blocked(pos))
        .into_iter()
        .min_by_key(|pos| pos.distance_to(cat))
}

/// Status as a pure function of the board and the cat's cell
pub fn derive_status(board: &HexBoard, cat: Hex) -> GameStatus {
    if board.is_border(cat) {
        GameStatus::PlayerLost
    } else if board.adjacent(cat).is_empty() {
        GameStatus::PlayerWon
    } else {
        GameStatus::InProgress
    }
}

// ============================================================================
// GAME STATE
// ============================================================================

/// One game: a board, the cat, and the move counter
#[derive(Clone, Debug)]
pub struct GameState {
    game_id: String,
    board: HexBoard,
    cat: Hex,
    status: GameStatus,
    move_count: u32,
    created_at: DateTime<Utc>,
    difficulty: Difficulty,
    history: Vec<MoveRecord>,
}

impl GameState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// New game with the cat in the center
    pub fn new(game_id: impl Into<String>, board_size: i32, difficulty: Difficulty) -> Result<Self> {
        let board = HexBoard::new(board_size)?;
        let cat = Hex::ORIGIN;
        Ok(Self {
            game_id: game_id.into(),
            status: derive_status(&board, cat),
            board,
            cat,
            move_count: 0,
            created_at: Utc::now(),
            difficulty,
            history: Vec::new(),
        })
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub fn board(&self) -> &HexBoard {
        &self.board
    }

    pub fn board_size(&self) -> i32 {
        self.board.radius()
    }

    pub fn cat_position(&self) -> Hex {
        self.cat
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn has_player_won(&self) -> bool {
        self.status == GameStatus::PlayerWon
    }

    pub fn is_cat_at_border(&self) -> bool {
        self.board.is_border(self.cat)
    }

    pub fn is_cat_trapped(&self) -> bool {
        self.board.adjacent(self.cat).is_empty()
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    /// Whether the player may block `pos` right now
    pub fn can_block(&self, pos: Hex) -> bool {
        !self.is_finished() && pos != self.cat && self.board.is_valid_move(pos)
    }

    // ========================================================================
    // MOVES
    // ========================================================================

    pub fn escape_target(&self, strategy: &dyn MovementStrategy) -> Option<Hex> {
        escape_target(&self.board, self.cat, strategy)
    }

    /// Board access for speculative evaluation; callers must leave the
    /// blocked set as they found it
    pub(crate) fn board_mut(&mut self) -> &mut HexBoard {
        &mut self.board
    }

    /// Player turn: block `pos`, then let the cat reply if the game goes on.
    /// Returns `None` and leaves the state untouched when the move is rejected.
    pub fn play_turn(&mut self, pos: Hex, strategy: &dyn MovementStrategy) -> Option<MoveRecord> {
        if !self.can_block(pos) {
            return None;
        }

        self.board.block(pos);
        self.move_count += 1;
        self.refresh_status();

        let cat_from = self.cat;
        if !self.is_finished() {
            if let Some(to) = self.cat_reply(strategy) {
                self.relocate_cat(to);
            }
        }

        let record = MoveRecord {
            blocked: pos,
            cat_from,
            cat_to: self.cat,
        };
        self.history.push(record);
        Some(record)
    }

    fn cat_reply(&self, strategy: &dyn MovementStrategy) -> Option<Hex> {
        let target = self.escape_target(strategy).unwrap_or(self.cat);
        strategy
            .next_move(&self.board, self.cat, target)
            .filter(|to| self.board.adjacent(self.cat).contains(to))
    }

    fn relocate_cat(&mut self, to: Hex) {
        self.cat = to;
        self.refresh_status();
    }

    fn refresh_status(&mut self) {
        self.status = derive_status(&self.board, self.cat);
    }

    // ========================================================================
    // SCORING
    // ========================================================================

    /// Whole seconds between creation and `now`
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> i64 {
        (now - self.created_at).num_seconds().max(0)
    }

    /// Score as of `now`
    pub fn score_at(&self, now: DateTime<Utc>) -> u32 {
        let moves = i64::from(self.move_count);
        let raw = if self.has_player_won() {
            WIN_BASE_SCORE - WIN_MOVE_PENALTY * moves
                + WIN_RADIUS_BONUS * i64::from(self.board_size())
                - self.elapsed_seconds(now)
        } else {
            LOSS_BASE_SCORE - LOSS_MOVE_PENALTY * moves
        };
        u32::try_from(raw.max(0)).unwrap_or(u32::MAX)
    }

    pub fn score(&self) -> u32 {
        self.score_at(Utc::now())
    }

    // ========================================================================
    // SERIALIZATION
    // ========================================================================

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            game_id: self.game_id.clone(),
            cat_position: self.cat,
            blocked_cells: self.board.sorted_blocked_cells(),
            status: self.status,
            move_count: self.move_count,
            board_size: self.board_size(),
            created_at: Some(self.created_at),
            difficulty: self.difficulty,
            history: self.history.clone(),
        }
    }

    /// Rebuild a game from its snapshot, rejecting inconsistent data
    pub fn restore(snapshot: GameSnapshot) -> Result<Self> {
        let corrupt = |reason: String| GameError::CorruptSnapshot {
            game_id: snapshot.game_id.clone(),
            reason,
        };

        let mut board = HexBoard::new(snapshot.board_size)?;
        for &cell in &snapshot.blocked_cells {
            if !board.in_bounds(cell) {
                return Err(corrupt(format!("blocked cell {} is off the board", cell)));
            }
            board.block(cell);
        }

        let cat = snapshot.cat_position;
        if !board.in_bounds(cat) {
            return Err(corrupt(format!("cat {} is off the board", cat)));
        }
        if board.is_blocked(cat) {
            return Err(corrupt(format!("cat {} sits on a blocked cell", cat)));
        }

        let status = derive_status(&board, cat);
        if status != snapshot.status {
            return Err(corrupt(format!(
                "stored status {} but position says {}",
                snapshot.status, status
            )));
        }

        Ok(Self {
            game_id: snapshot.game_id,
            board,
            cat,
            status,
            move_count: snapshot.move_count,
            created_at: snapshot.created_at.unwrap_or_else(Utc::now),
            difficulty: snapshot.difficulty,
            history: snapshot.history,
        })
    }
}

/// Serialized game, the shape repositories store and the API returns
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub game_id: String,
    pub cat_position: Hex,
    pub blocked_cells: Vec<Hex>,
    pub status: GameStatus,
    pub move_count: u32,
    pub board_size: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<MoveRecord>,
}

impl TryFrom<GameSnapshot> for GameState {
    type Error = GameError;

    fn try_from(snapshot: GameSnapshot) -> Result<Self> {
        GameState::restore(snapshot)
    }
}

// ============================================================================
// TESTS
// ============================================================================
