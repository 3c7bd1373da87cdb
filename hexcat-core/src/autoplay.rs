//! Automated blockers for simulations and demos

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::engine::best_block;
use crate::game::{GameState, MoveRecord};
use crate::hex::Hex;

/// A policy choosing which cell to block next
pub enum Blocker {
    /// Always take the best simulated block
    Greedy,
    /// Block a uniformly random legal cell
    Random(ChaCha8Rng),
}

impl Blocker {
    pub fn random(seed: u64) -> Self {
        Blocker::Random(ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Blocker::Greedy => "greedy",
            Blocker::Random(_) => "random",
        }
    }

    /// Pick a legal cell, or `None` if the game is over
    pub fn choose(&mut self, state: &mut GameState) -> Option<Hex> {
        match self {
            Blocker::Greedy => {
                let strategy = state.difficulty().strategy();
                best_block(state, strategy.as_ref())
            }
            Blocker::Random(rng) => {
                let board = state.board();
                let cells = board.positions_matching(|pos| state.can_block(pos));
                cells.choose(rng).copied()
            }
        }
    }

    /// Play until the game ends or `max_moves` blocks have been placed
    pub fn play_game(&mut self, initial: GameState, max_moves: u32) -> (GameState, Vec<MoveRecord>) {
        let mut state = initial;
        let mut history = Vec::new();
        let strategy = state.difficulty().strategy();

        while !state.is_finished() && state.move_count() < max_moves {
            let Some(cell) = self.choose(&mut state) else {
                break;
            };
            match state.play_turn(cell, strategy.as_ref()) {
                Some(record) => history.push(record),
                None => break,
            }
        }

        (state, history)
    }
}
