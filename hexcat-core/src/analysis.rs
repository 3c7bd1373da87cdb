//! Per-game statistics and post-game analysis

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::game::{GameState, GameStatus, MoveRecord};
use crate::hex::Hex;
use crate::strategy::MovementStrategy;

/// Snapshot of where a game stands
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStatistics {
    pub game_id: String,
    pub status: GameStatus,
    pub move_count: u32,
    pub blocked_cells: usize,
    pub free_cells: usize,
    pub cat_position: Hex,
    pub cat_distance_to_border: i32,
    pub cat_can_escape: bool,
    /// Steps on the cat's shortest escape route, if it has one
    pub escape_route_length: Option<usize>,
    pub is_game_over: bool,
    pub score: u32,
}

/// How close to the center the cat was kept
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Good,
    Fair,
    Poor,
}

impl Rating {
    fn from_cat_distance(distance: i32) -> Self {
        match distance {
            d if d <= 2 => Rating::Good,
            d if d <= 4 => Rating::Fair,
            _ => Rating::Poor,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyMoments {
    pub first_move: Option<MoveRecord>,
    pub last_move: Option<MoveRecord>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameAnalysis {
    pub game_id: String,
    pub score: u32,
    /// Score per move, 0 before the first move
    pub efficiency: u32,
    pub rating: Rating,
    pub cat_distance_from_center: i32,
    pub key_moments: KeyMoments,
    pub advice: &'static str,
}

pub fn game_statistics(
    state: &GameState,
    strategy: &dyn MovementStrategy,
    now: DateTime<Utc>,
) -> GameStatistics {
    let board = state.board();
    let cat = state.cat_position();
    let free_cells = board
        .positions_matching(|pos| board.is_valid_move(pos) && pos != cat)
        .len();
    let route = strategy.escape_path(board, cat);

    GameStatistics {
        game_id: state.game_id().to_string(),
        status: state.status(),
        move_count: state.move_count(),
        blocked_cells: board.blocked_count(),
        free_cells,
        cat_position: cat,
        cat_distance_to_border: board.distance_to_border(cat),
        cat_can_escape: !route.is_empty(),
        escape_route_length: (!route.is_empty()).then(|| route.len() - 1),
        is_game_over: state.is_finished(),
        score: state.score_at(now),
    }
}

pub fn analyze_game(state: &GameState, now: DateTime<Utc>) -> GameAnalysis {
    let score = state.score_at(now);
    let efficiency = match state.move_count() {
        0 => 0,
        moves => score / moves,
    };
    let distance = state.cat_position().distance_to(Hex::ORIGIN);

    let advice = if efficiency < 10 {
        "Block the cells closest to the cat to trap it sooner."
    } else if efficiency < 30 {
        "Good work. Try to anticipate where the cat heads next."
    } else {
        "Excellent strategy."
    };

    GameAnalysis {
        game_id: state.game_id().to_string(),
        score,
        efficiency,
        rating: Rating::from_cat_distance(distance),
        cat_distance_from_center: distance,
        key_moments: KeyMoments {
            first_move: state.history().first().copied(),
            last_move: state.history().last().copied(),
        },
        advice,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{BfsStrategy, Difficulty};

    #[test]
    fn test_statistics_on_new_game() {
        let game = GameState::new("g", 3, Difficulty::Normal).unwrap();
        let stats = game_statistics(&game, &BfsStrategy, game.created_at());

        assert_eq!(stats.move_count, 0);
        assert_eq!(stats.blocked_cells, 0);
        // 23 enumerated cells minus the cat's
        assert_eq!(stats.free_cells, 22);
        assert_eq!(stats.cat_distance_to_border, 2);
        assert!(stats.cat_can_escape);
        assert_eq!(stats.escape_route_length, Some(2));
        assert!(!stats.is_game_over);
        assert_eq!(stats.score, 100);
    }

    #[test]
    fn test_statistics_after_moves() {
        let mut game = GameState::new("g", 5, Difficulty::Normal).unwrap();
        game.play_turn(Hex::new(-4, 2), &BfsStrategy).unwrap();
        let stats = game_statistics(&game, &BfsStrategy, game.created_at());
        assert_eq!(stats.blocked_cells, 1);
        assert_eq!(stats.move_count, 1);
        assert_eq!(stats.escape_route_length, Some(3));
    }

    #[test]
    fn test_analysis_without_moves() {
        let game = GameState::new("g", 5, Difficulty::Normal).unwrap();
        let analysis = analyze_game(&game, game.created_at());
        assert_eq!(analysis.efficiency, 0);
        assert_eq!(analysis.rating, Rating::Good);
        assert_eq!(analysis.key_moments.first_move, None);
    }

    #[test]
    fn test_analysis_tracks_key_moments() {
        let mut game = GameState::new("g", 6, Difficulty::Normal).unwrap();
        game.play_turn(Hex::new(-5, 0), &BfsStrategy).unwrap();
        game.play_turn(Hex::new(-5, 1), &BfsStrategy).unwrap();
        let analysis = analyze_game(&game, game.created_at());

        assert_eq!(analysis.key_moments.first_move.unwrap().blocked, Hex::new(-5, 0));
        assert_eq!(analysis.key_moments.last_move.unwrap().blocked, Hex::new(-5, 1));
        // 100 - 10 = 90 over two moves
        assert_eq!(analysis.efficiency, 45);
        assert_eq!(analysis.rating, Rating::Good);
    }

    #[test]
    fn test_rating_thresholds() {
        assert_eq!(Rating::from_cat_distance(2), Rating::Good);
        assert_eq!(Rating::from_cat_distance(3), Rating::Fair);
        assert_eq!(Rating::from_cat_distance(5), Rating::Poor);
    }
}
