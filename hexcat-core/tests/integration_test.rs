//! Integration tests for the HEXCAT core
//!
//! Randomized agreement checks between the two strategies, full game
//! playthroughs, and engine persistence through both repositories.

use hexcat_core::{
    AStarStrategy, BfsStrategy, Blocker, Difficulty, GameConfig, GameEngine, GameState,
    GameStatus, Hex, HexBoard, JsonFileRepository, MovementStrategy,
};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;

// ============================================================================
// TEST FIXTURES
// ============================================================================

/// Board of a random radius with roughly `density` of its cells blocked.
/// The origin is never blocked.
fn random_board(rng: &mut ChaCha8Rng, density: f64) -> HexBoard {
    let radius = rng.gen_range(3..=8);
    let mut board = HexBoard::new(radius).unwrap();
    for cell in board.positions_matching(|pos| pos != Hex::ORIGIN) {
        if rng.gen_bool(density) {
            board.block(cell);
        }
    }
    board
}

fn assert_walkable(board: &HexBoard, path: &[Hex]) {
    for &cell in path {
        assert!(board.in_bounds(cell), "{} is off the board", cell);
        assert!(!board.is_blocked(cell), "{} is blocked", cell);
    }
    for pair in path.windows(2) {
        assert_eq!(pair[0].distance_to(pair[1]), 1, "{} -> {} is not a step", pair[0], pair[1]);
    }
}

// ============================================================================
// STRATEGY PROPERTIES
// ============================================================================

#[test]
fn test_strategies_agree_on_reachability() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    for _ in 0..200 {
        let board = random_board(&mut rng, 0.35);
        let bfs = BfsStrategy.has_path_to_goal(&board, Hex::ORIGIN);
        let astar = AStarStrategy.has_path_to_goal(&board, Hex::ORIGIN);
        assert_eq!(bfs, astar);

        let bfs_path = BfsStrategy.escape_path(&board, Hex::ORIGIN);
        let astar_path = AStarStrategy.escape_path(&board, Hex::ORIGIN);
        assert_eq!(bfs_path.is_empty(), !bfs);
        // Both searches are optimal on a uniform-cost grid
        assert_eq!(bfs_path.len(), astar_path.len());

        for path in [&bfs_path, &astar_path] {
            if let Some(&last) = path.last() {
                assert_eq!(path[0], Hex::ORIGIN);
                assert!(board.is_border(last));
                assert_walkable(&board, path);
            }
        }
    }
}

#[test]
fn test_full_paths_are_contiguous_and_optimal() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    for _ in 0..100 {
        let board = random_board(&mut rng, 0.25);
        let free = board.positions_matching(|pos| board.is_valid_move(pos) && pos != Hex::ORIGIN);
        let Some(&target) = free.choose(&mut rng) else {
            continue;
        };

        let bfs_path = BfsStrategy.full_path(&board, Hex::ORIGIN, target);
        let astar_path = AStarStrategy.full_path(&board, Hex::ORIGIN, target);
        assert_eq!(bfs_path.len(), astar_path.len());

        if !bfs_path.is_empty() {
            assert_eq!(bfs_path.first(), Some(&Hex::ORIGIN));
            assert_eq!(bfs_path.last(), Some(&target));
            assert_eq!(astar_path.last(), Some(&target));
            assert!(bfs_path.len() as i32 > target.distance_to(Hex::ORIGIN));
            assert_walkable(&board, &bfs_path);
            assert_walkable(&board, &astar_path);
        }
    }
}

#[test]
fn test_next_move_is_always_a_free_neighbor() {
    let mut rng = ChaCha8Rng::seed_from_u64(1234);

    for _ in 0..100 {
        let board = random_board(&mut rng, 0.4);
        let target = board
            .border_cells()
            .into_iter()
            .find(|&pos| !board.is_blocked(pos))
            .unwrap_or(Hex::ORIGIN);

        for strategy in [&BfsStrategy as &dyn MovementStrategy, &AStarStrategy] {
            let free = board.adjacent(Hex::ORIGIN);
            match strategy.next_move(&board, Hex::ORIGIN, target) {
                Some(next) => assert!(free.contains(&next), "{} picked {}", strategy.name(), next),
                None => assert!(
                    free.is_empty() || !strategy.has_path_to_goal(&board, Hex::ORIGIN),
                    "{} stood still with an open route",
                    strategy.name()
                ),
            }
        }
    }
}

// ============================================================================
// PLAYTHROUGHS
// ============================================================================

#[test]
fn test_random_games_end_consistently() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);

    for seed in 0..30 {
        let radius = rng.gen_range(3..=7);
        let difficulty = if seed % 2 == 0 { Difficulty::Normal } else { Difficulty::Hard };
        let game = GameState::new(format!("game-{}", seed), radius, difficulty).unwrap();

        let (end, history) = Blocker::random(seed).play_game(game, 500);
        assert!(end.is_finished());
        assert_eq!(history.len() as u32, end.move_count());

        match end.status() {
            GameStatus::PlayerLost => assert!(end.is_cat_at_border()),
            GameStatus::PlayerWon => assert!(end.is_cat_trapped()),
            GameStatus::InProgress => unreachable!(),
        }

        // Every recorded cat step is a single hex
        for record in &history {
            assert!(record.cat_from.distance_to(record.cat_to) <= 1);
            assert!(end.board().is_blocked(record.blocked));
        }
        assert_eq!(history.last().map(|r| r.cat_to), Some(end.cat_position()));
    }
}

#[test]
fn test_greedy_blocker_beats_random_blocker() {
    let games = 10;
    let mut greedy_wins = 0;
    let mut random_wins = 0;

    for seed in 0..games {
        let game = GameState::new("g", 5, Difficulty::Normal).unwrap();
        if Blocker::Greedy.play_game(game.clone(), 200).0.has_player_won() {
            greedy_wins += 1;
        }
        if Blocker::random(seed).play_game(game, 200).0.has_player_won() {
            random_wins += 1;
        }
    }

    println!("greedy {}/{} vs random {}/{}", greedy_wins, games, random_wins, games);
    assert!(greedy_wins >= random_wins);
}

// ============================================================================
// ENGINE + REPOSITORY
// ============================================================================

#[test]
fn test_engine_with_json_repository() {
    let dir = std::env::temp_dir().join(format!("hexcat-it-{}", uuid::Uuid::new_v4()));
    let repository = Arc::new(JsonFileRepository::open(&dir).unwrap());
    let engine = GameEngine::new(repository);

    let state = engine
        .start_new_game(GameConfig::new(6, Difficulty::Hard))
        .unwrap();
    let id = state.game_id().to_string();
    assert!(dir.join(format!("{}.json", id)).exists());

    let outcome = engine.execute_player_move(&id, Hex::new(1, 1)).unwrap().unwrap();
    assert!(outcome.accepted);

    // A fresh engine over the same directory sees the same game
    let reopened = GameEngine::new(Arc::new(JsonFileRepository::open(&dir).unwrap()));
    let stored = reopened.game_state(&id).unwrap().unwrap();
    assert_eq!(stored.snapshot(), outcome.state.snapshot());
    assert_eq!(stored.difficulty(), Difficulty::Hard);

    assert!(reopened.delete_game(&id).unwrap());
    assert!(engine.game_state(&id).unwrap().is_none());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_engine_game_to_completion() {
    let engine = GameEngine::in_memory();
    let id = engine
        .start_new_game(GameConfig::new(4, Difficulty::Normal))
        .unwrap()
        .game_id()
        .to_string();

    let mut moves = 0;
    while let Some(cell) = engine.intelligent_suggestion(&id).unwrap() {
        let outcome = engine.execute_player_move(&id, cell).unwrap().unwrap();
        assert!(outcome.accepted);
        moves += 1;
        assert!(moves < 100);
    }

    let state = engine.game_state(&id).unwrap().unwrap();
    assert!(state.is_finished());
    assert_eq!(state.move_count(), moves);

    let analysis = engine.analyze_game(&id).unwrap().unwrap();
    assert_eq!(analysis.key_moments.last_move, state.history().last().copied());
}
