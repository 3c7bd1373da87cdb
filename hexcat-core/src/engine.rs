//! Game engine: move transactions, suggestions and reports over a repository
//!
//! Each public operation loads a game, works on it, and saves it back.
//! Callers are expected to serialize operations on the same game id.

use std::sync::Arc;

use chrono::Utc;

use crate::analysis::{analyze_game, game_statistics, GameAnalysis, GameStatistics};
use crate::board::HexBoard;
use crate::config::GameConfig;
use crate::error::Result;
use crate::game::{derive_status, escape_target, GameState, GameStatus, MoveRecord};
use crate::hex::Hex;
use crate::repository::{GameRepository, InMemoryRepository};
use crate::strategy::{Difficulty, MovementStrategy};

/// Result of a player move request
#[derive(Clone, Debug)]
pub struct MoveOutcome {
    /// Game after the move, or unchanged if the move was rejected
    pub state: GameState,
    pub accepted: bool,
    pub record: Option<MoveRecord>,
}

pub struct GameEngine {
    repository: Arc<dyn GameRepository>,
}

impl GameEngine {
    pub fn new(repository: Arc<dyn GameRepository>) -> Self {
        Self { repository }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryRepository::new()))
    }

    pub fn repository(&self) -> &dyn GameRepository {
        self.repository.as_ref()
    }

    // ========================================================================
    // LIFECYCLE
    // ========================================================================

    pub fn start_new_game(&self, config: GameConfig) -> Result<GameState> {
        config.validate()?;
        let game_id = uuid::Uuid::new_v4().to_string();
        let state = GameState::new(game_id, config.board_size, config.difficulty)?;
        let state = self.repository.save(state)?;

        tracing::info!(
            game_id = state.game_id(),
            board_size = config.board_size,
            difficulty = %config.difficulty,
            "game started"
        );
        Ok(state)
    }

    pub fn game_state(&self, game_id: &str) -> Result<Option<GameState>> {
        self.repository.find(game_id)
    }

    pub fn delete_game(&self, game_id: &str) -> Result<bool> {
        let deleted = self.repository.delete(game_id)?;
        if deleted {
            tracing::info!(game_id, "game deleted");
        }
        Ok(deleted)
    }

    /// Switch the cat's strategy for the rest of the game
    pub fn set_difficulty(&self, game_id: &str, difficulty: Difficulty) -> Result<Option<GameState>> {
        let Some(mut state) = self.repository.find(game_id)? else {
            return Ok(None);
        };
        state.set_difficulty(difficulty);
        tracing::info!(game_id, %difficulty, "difficulty changed");
        self.repository.save(state).map(Some)
    }

    // ========================================================================
    // MOVES
    // ========================================================================

    /// `false` for unknown games as well as for illegal cells
    pub fn is_valid_move(&self, game_id: &str, pos: Hex) -> Result<bool> {
        Ok(self
            .repository
            .find(game_id)?
            .map_or(false, |state| state.can_block(pos)))
    }

    /// Block `pos` and let the cat reply. Rejected moves return the unchanged
    /// game with `accepted == false`; unknown games return `None`.
    pub fn execute_player_move(&self, game_id: &str, pos: Hex) -> Result<Option<MoveOutcome>> {
        let Some(mut state) = self.repository.find(game_id)? else {
            return Ok(None);
        };

        if !state.can_block(pos) {
            tracing::debug!(game_id, %pos, status = %state.status(), "move rejected");
            return Ok(Some(MoveOutcome {
                state,
                accepted: false,
                record: None,
            }));
        }

        let strategy = state.difficulty().strategy();
        let record = state.play_turn(pos, strategy.as_ref());
        if let Some(record) = record {
            tracing::debug!(
                game_id,
                blocked = %record.blocked,
                cat_from = %record.cat_from,
                cat_to = %record.cat_to,
                strategy = strategy.name(),
                "move played"
            );
        }
        if state.is_finished() {
            tracing::info!(
                game_id,
                status = %state.status(),
                moves = state.move_count(),
                score = state.score(),
                "game finished"
            );
        }

        let state = self.repository.save(state)?;
        Ok(Some(MoveOutcome {
            state,
            accepted: record.is_some(),
            record,
        }))
    }

    /// Border cell the cat is currently heading for
    pub fn target_for(&self, state: &GameState) -> Option<Hex> {
        state.escape_target(state.difficulty().strategy().as_ref())
    }

    // ========================================================================
    // SUGGESTIONS
    // ========================================================================

    /// Quick hint: the cat's free neighbor nearest to the border
    pub fn suggested_move(&self, game_id: &str) -> Result<Option<Hex>> {
        Ok(self
            .repository
            .find(game_id)?
            .filter(|state| !state.is_finished())
            .and_then(|state| nearest_exit(state.board(), state.cat_position())))
    }

    /// Best block found by simulating every legal move and the cat's reply
    pub fn intelligent_suggestion(&self, game_id: &str) -> Result<Option<Hex>> {
        // Scratch copy for the speculative scan; never saved back
        let Some(mut state) = self.repository.find(game_id)? else {
            return Ok(None);
        };
        let strategy = state.difficulty().strategy();
        Ok(best_block(&mut state, strategy.as_ref()))
    }

    // ========================================================================
    // REPORTS
    // ========================================================================

    pub fn game_statistics(&self, game_id: &str) -> Result<Option<GameStatistics>> {
        Ok(self.repository.find(game_id)?.map(|state| {
            let strategy = state.difficulty().strategy();
            game_statistics(&state, strategy.as_ref(), Utc::now())
        }))
    }

    pub fn analyze_game(&self, game_id: &str) -> Result<Option<GameAnalysis>> {
        Ok(self
            .repository
            .find(game_id)?
            .map(|state| analyze_game(&state, Utc::now())))
    }
}

// ============================================================================
// SUGGESTION HELPERS
// ============================================================================

/// Outcome of a candidate block, worst first
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum BlockRating {
    /// Cat reaches the border with its reply
    Escapes,
    /// Cat still has a route of this many steps
    Route(usize),
    /// Cat can move but can no longer reach the border
    Enclosed,
    /// Cat cannot move at all
    Trapped,
}

fn nearest_exit(board: &HexBoard, cat: Hex) -> Option<Hex> {
    board
        .adjacent(cat)
        .into_iter()
        .min_by_key(|&pos| board.distance_to_border(pos))
}

fn rate_block(board: &HexBoard, cat: Hex, strategy: &dyn MovementStrategy) -> BlockRating {
    if derive_status(board, cat) == GameStatus::PlayerWon {
        return BlockRating::Trapped;
    }
    let target = escape_target(board, cat, strategy).unwrap_or(cat);
    let predicted = strategy.next_move(board, cat, target).unwrap_or(cat);
    if board.is_border(predicted) {
        return BlockRating::Escapes;
    }
    match strategy.escape_path(board, predicted).len() {
        0 => BlockRating::Enclosed,
        nodes => BlockRating::Route(nodes - 1),
    }
}

/// Try every legal block on a scratch copy of the blocked set and keep the
/// one that leaves the cat worst off. The board is restored after each try.
pub fn best_block(state: &mut GameState, strategy: &dyn MovementStrategy) -> Option<Hex> {
    if state.is_finished() {
        return None;
    }

    let cat = state.cat_position();
    let candidates = state.board().positions_matching(|pos| state.can_block(pos));
    let mut best: Option<(Hex, BlockRating)> = None;

    for cell in candidates {
        let rating = {
            let sim = state.board_mut().simulate_block(cell);
            rate_block(sim.board(), cat, strategy)
        };
        if best.map_or(true, |(_, best_rating)| rating > best_rating) {
            best = Some((cell, rating));
        }
        if rating == BlockRating::Trapped {
            break;
        }
    }

    best.map(|(cell, _)| cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameSnapshot;
    use crate::strategy::BfsStrategy;

    fn engine_with_game(board_size: i32) -> (GameEngine, String) {
        let engine = GameEngine::in_memory();
        let state = engine
            .start_new_game(GameConfig::new(board_size, Difficulty::Normal))
            .unwrap();
        let id = state.game_id().to_string();
        (engine, id)
    }

    #[test]
    fn test_start_new_game() {
        let (engine, id) = engine_with_game(7);
        let state = engine.game_state(&id).unwrap().unwrap();
        assert_eq!(state.board_size(), 7);
        assert_eq!(state.cat_position(), Hex::ORIGIN);
        assert_eq!(state.status(), GameStatus::InProgress);
    }

    #[test]
    fn test_start_rejects_small_board() {
        let engine = GameEngine::in_memory();
        assert!(engine.start_new_game(GameConfig::new(2, Difficulty::Normal)).is_err());
    }

    #[test]
    fn test_unknown_game_is_not_an_error() {
        let engine = GameEngine::in_memory();
        assert!(engine.game_state("nope").unwrap().is_none());
        assert!(engine.execute_player_move("nope", Hex::ORIGIN).unwrap().is_none());
        assert!(!engine.is_valid_move("nope", Hex::ORIGIN).unwrap());
        assert!(engine.suggested_move("nope").unwrap().is_none());
        assert!(engine.game_statistics("nope").unwrap().is_none());
        assert!(!engine.delete_game("nope").unwrap());
    }

    #[test]
    fn test_execute_move_persists() {
        let (engine, id) = engine_with_game(6);
        let outcome = engine.execute_player_move(&id, Hex::new(2, 1)).unwrap().unwrap();
        assert!(outcome.accepted);
        assert_eq!(outcome.state.move_count(), 1);

        let stored = engine.game_state(&id).unwrap().unwrap();
        assert_eq!(stored.move_count(), 1);
        assert!(stored.board().is_blocked(Hex::new(2, 1)));
        assert_eq!(stored.cat_position(), outcome.state.cat_position());
    }

    #[test]
    fn test_rejected_move_leaves_state_unchanged() {
        let (engine, id) = engine_with_game(5);
        engine.execute_player_move(&id, Hex::new(3, 0)).unwrap();
        let before = engine.game_state(&id).unwrap().unwrap().snapshot();

        let outcome = engine.execute_player_move(&id, Hex::new(3, 0)).unwrap().unwrap();
        assert!(!outcome.accepted);
        assert!(outcome.record.is_none());
        assert_eq!(outcome.state.snapshot(), before);

        let outside = engine.execute_player_move(&id, Hex::new(20, 0)).unwrap().unwrap();
        assert!(!outside.accepted);
        assert!(!engine.is_valid_move(&id, Hex::new(20, 0)).unwrap());
    }

    #[test]
    fn test_extreme_coordinates_are_rejected() {
        let (engine, id) = engine_with_game(5);
        let extremes = [
            Hex::new(i32::MIN, 0),
            Hex::new(i32::MAX, i32::MAX),
            Hex::new(i32::MIN, i32::MIN),
            Hex::new(0, i32::MAX),
        ];
        for pos in extremes {
            assert!(!engine.is_valid_move(&id, pos).unwrap());
            let outcome = engine.execute_player_move(&id, pos).unwrap().unwrap();
            assert!(!outcome.accepted, "{:?}", pos);
        }
        let stored = engine.game_state(&id).unwrap().unwrap();
        assert_eq!(stored.move_count(), 0);
        assert_eq!(stored.board().blocked_count(), 0);
    }

    #[test]
    fn test_start_rejects_huge_board() {
        let engine = GameEngine::in_memory();
        assert!(engine.start_new_game(GameConfig::new(50_000, Difficulty::Normal)).is_err());
        assert!(engine.start_new_game(GameConfig::new(i32::MAX, Difficulty::Normal)).is_err());
    }

    #[test]
    fn test_set_difficulty() {
        let (engine, id) = engine_with_game(5);
        let state = engine.set_difficulty(&id, Difficulty::Hard).unwrap().unwrap();
        assert_eq!(state.difficulty(), Difficulty::Hard);
        assert_eq!(engine.game_state(&id).unwrap().unwrap().difficulty(), Difficulty::Hard);
        assert!(engine.set_difficulty("nope", Difficulty::Hard).unwrap().is_none());
    }

    #[test]
    fn test_suggested_move_is_next_to_cat() {
        let (engine, id) = engine_with_game(5);
        let hint = engine.suggested_move(&id).unwrap().unwrap();
        assert_eq!(hint.distance_to(Hex::ORIGIN), 1);
    }

    #[test]
    fn test_best_block_restores_board() {
        let mut state = GameState::new("g", 4, Difficulty::Normal).unwrap();
        state.play_turn(Hex::new(-1, 0), &BfsStrategy).unwrap();
        let before = state.board().sorted_blocked_cells();

        let suggestion = best_block(&mut state, &BfsStrategy).unwrap();
        assert!(state.can_block(suggestion));
        assert_eq!(state.board().sorted_blocked_cells(), before);
    }

    #[test]
    fn test_best_block_finishes_the_trap() {
        let mut state = GameState::new("g", 5, Difficulty::Normal).unwrap();
        // Leave exactly one free neighbor around the cat
        let neighbors: Vec<Hex> = Hex::ORIGIN.neighbors().collect();
        for &n in &neighbors[..5] {
            state.board_mut().block(n);
        }
        assert_eq!(best_block(&mut state, &BfsStrategy), Some(neighbors[5]));
    }

    #[test]
    fn test_best_block_closes_the_open_exit() {
        // Cat next to the border with one exit onto it and one back inward
        let cat = Hex::new(2, 0);
        let snapshot = GameSnapshot {
            game_id: "g".to_string(),
            cat_position: cat,
            blocked_cells: vec![Hex::new(3, -1), Hex::new(2, -1), Hex::new(1, 1), Hex::new(2, 1)],
            status: GameStatus::InProgress,
            move_count: 4,
            board_size: 4,
            created_at: None,
            difficulty: Difficulty::Normal,
            history: Vec::new(),
        };
        let mut state = GameState::restore(snapshot).unwrap();
        assert_eq!(best_block(&mut state, &BfsStrategy), Some(Hex::new(3, 0)));
    }

    #[test]
    fn test_intelligent_suggestion() {
        let (engine, id) = engine_with_game(5);
        let before = engine.game_state(&id).unwrap().unwrap().snapshot();
        let suggestion = engine.intelligent_suggestion(&id).unwrap().unwrap();
        assert!(engine.is_valid_move(&id, suggestion).unwrap());
        assert_eq!(engine.game_state(&id).unwrap().unwrap().snapshot(), before);
    }

    #[test]
    fn test_block_rating_order() {
        assert!(BlockRating::Trapped > BlockRating::Enclosed);
        assert!(BlockRating::Enclosed > BlockRating::Route(10));
        assert!(BlockRating::Route(4) > BlockRating::Route(3));
        assert!(BlockRating::Route(0) > BlockRating::Escapes);
    }

    #[test]
    fn test_reports() {
        let (engine, id) = engine_with_game(5);
        engine.execute_player_move(&id, Hex::new(0, 3)).unwrap();
        let stats = engine.game_statistics(&id).unwrap().unwrap();
        assert_eq!(stats.move_count, 1);
        let analysis = engine.analyze_game(&id).unwrap().unwrap();
        assert_eq!(analysis.key_moments.first_move.unwrap().blocked, Hex::new(0, 3));
    }
}
