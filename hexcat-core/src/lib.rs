//! HEXCAT Core - Trap-the-cat game engine
//!
//! This crate provides the core game logic for HEXCAT:
//! - Hex geometry (axial storage, cube math)
//! - Bounded board with blocked cells and speculative blocking
//! - Cat movement strategies (BFS and A*)
//! - Game state machine, scoring and snapshots
//! - Engine orchestration over a pluggable game repository
//! - Statistics, post-game analysis and automated blockers

pub mod hex;
pub mod board;
pub mod error;
pub mod strategy;
pub mod game;
pub mod analysis;
pub mod repository;
pub mod config;
pub mod engine;
pub mod autoplay;

// Re-exports for convenient access
pub use hex::{Hex, DIRECTIONS, MAX_COORDINATE};
pub use board::{
    check_board_size, HexBoard, SimulatedBlock, DEFAULT_BOARD_SIZE, MAX_BOARD_SIZE, MIN_BOARD_SIZE,
};
pub use error::{GameError, Result};
pub use strategy::{AStarStrategy, BfsStrategy, Difficulty, MovementStrategy};
pub use game::{derive_status, GameSnapshot, GameState, GameStatus, MoveRecord};
pub use analysis::{GameAnalysis, GameStatistics, KeyMoments, Rating};
pub use repository::{GameRepository, InMemoryRepository, JsonFileRepository};
pub use config::GameConfig;
pub use engine::{best_block, GameEngine, MoveOutcome};
pub use autoplay::Blocker;
