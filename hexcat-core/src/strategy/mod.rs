//! Cat movement strategies
//!
//! Both strategies borrow the board for the duration of a single query and
//! never mutate it. Path results are plain `Vec<Hex>` from start to end, with
//! an empty vector meaning "no path".

mod astar;
mod bfs;

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::HexBoard;
use crate::hex::Hex;

pub use astar::AStarStrategy;
pub use bfs::BfsStrategy;

/// Capability shared by every cat movement strategy
pub trait MovementStrategy: Send + Sync {
    /// Short label used in logs and responses
    fn name(&self) -> &'static str;

    /// Cells the cat can step to from `pos`
    fn possible_moves(&self, board: &HexBoard, pos: Hex) -> Vec<Hex> {
        board.adjacent(pos)
    }

    /// The grid is unweighted, every step costs the same
    fn move_cost(&self, _from: Hex, _to: Hex) -> f64 {
        1.0
    }

    /// Cells the cat is trying to reach
    fn is_goal(&self, board: &HexBoard, pos: Hex) -> bool {
        board.is_border(pos)
    }

    fn goal_predicate<'a>(&'a self, board: &'a HexBoard) -> Box<dyn Fn(Hex) -> bool + 'a> {
        Box::new(move |pos| self.is_goal(board, pos))
    }

    /// Admissible estimate of the remaining steps from `pos` to `target`
    fn heuristic(&self, pos: Hex, target: Hex) -> f64 {
        pos.distance_to(target) as f64
    }

    /// Pick one of `candidates` as the cat's next cell. `None` keeps the
    /// cat on `current`.
    fn select_best_move(
        &self,
        board: &HexBoard,
        candidates: &[Hex],
        current: Hex,
        target: Hex,
    ) -> Option<Hex>;

    /// Whether any goal cell is reachable from `pos`
    fn has_path_to_goal(&self, board: &HexBoard, pos: Hex) -> bool;

    /// Path from `start` to exactly `target`, both included
    fn full_path(&self, board: &HexBoard, start: Hex, target: Hex) -> Vec<Hex>;

    /// Shortest path from `start` to any goal cell, both included
    fn escape_path(&self, board: &HexBoard, start: Hex) -> Vec<Hex>;

    fn before_move(&self, _current: Hex) {}

    fn after_move(&self, _selected: Option<Hex>) {}

    /// Compute the cat's next cell, running the hooks around the selection
    fn next_move(&self, board: &HexBoard, current: Hex, target: Hex) -> Option<Hex> {
        self.before_move(current);
        let candidates = self.possible_moves(board, current);
        let selected = self.select_best_move(board, &candidates, current, target);
        self.after_move(selected);
        selected
    }
}

/// Follow parent links back from `end` and return the path in travel order
pub(crate) fn reconstruct_path(
    parents: &rustc_hash::FxHashMap<Hex, Hex>,
    start: Hex,
    end: Hex,
) -> Vec<Hex> {
    let mut path = vec![end];
    let mut current = end;
    while current != start {
        match parents.get(&current) {
            Some(&prev) => {
                path.push(prev);
                current = prev;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

// ============================================================================
// DIFFICULTY
// ============================================================================

/// Difficulty label; selects the cat's strategy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }

    /// Strategy the cat plays with at this difficulty
    pub fn strategy(self) -> Box<dyn MovementStrategy> {
        match self {
            Difficulty::Easy | Difficulty::Normal => Box::new(BfsStrategy),
            Difficulty::Hard => Box::new(AStarStrategy),
        }
    }
}

impl FromStr for Difficulty {
    type Err = Infallible;

    /// Unrecognized labels fall back to `Normal`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "facil" | "fácil" | "easy" => Difficulty::Easy,
            "dificil" | "difícil" | "hard" => Difficulty::Hard,
            _ => Difficulty::Normal,
        })
    }
}

impl From<String> for Difficulty {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(difficulty) => difficulty,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
