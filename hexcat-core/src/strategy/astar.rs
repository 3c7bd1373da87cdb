//! A* cat

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rustc_hash::{FxHashMap, FxHashSet};

use super::{reconstruct_path, MovementStrategy};
use crate::board::HexBoard;
use crate::hex::Hex;

/// Greedy f = g + h step selection, with full A* searches for paths
#[derive(Clone, Copy, Debug, Default)]
pub struct AStarStrategy;

/// Open-set entry. Ordered so that `BinaryHeap` pops the lowest f-score
/// first and, among equal scores, the earliest inserted node.
#[derive(Clone, Copy, Debug)]
struct OpenNode {
    f: f64,
    g: f64,
    seq: u64,
    pos: Hex,
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl AStarStrategy {
    /// Core A* loop. Stops at the first popped node satisfying `is_done`.
    fn search<D, H>(&self, board: &HexBoard, start: Hex, is_done: D, h: H) -> Option<Vec<Hex>>
    where
        D: Fn(Hex) -> bool,
        H: Fn(Hex) -> f64,
    {
        let mut open = BinaryHeap::new();
        let mut closed: FxHashSet<Hex> = FxHashSet::default();
        let mut g_score: FxHashMap<Hex, f64> = FxHashMap::default();
        let mut parents: FxHashMap<Hex, Hex> = FxHashMap::default();
        let mut seq = 0u64;

        g_score.insert(start, 0.0);
        open.push(OpenNode {
            f: h(start),
            g: 0.0,
            seq,
            pos: start,
        });

        while let Some(node) = open.pop() {
            if !closed.insert(node.pos) {
                continue; // stale entry
            }
            if is_done(node.pos) {
                return Some(reconstruct_path(&parents, start, node.pos));
            }

            for next in self.possible_moves(board, node.pos) {
                if closed.contains(&next) {
                    continue;
                }
                let tentative = node.g + self.move_cost(node.pos, next);
                let improved = g_score
                    .get(&next)
                    .map_or(true, |&known| tentative < known);
                if improved {
                    g_score.insert(next, tentative);
                    parents.insert(next, node.pos);
                    seq += 1;
                    open.push(OpenNode {
                        f: tentative + h(next),
                        g: tentative,
                        seq,
                        pos: next,
                    });
                }
            }
        }

        None
    }
}

impl MovementStrategy for AStarStrategy {
    fn name(&self) -> &'static str {
        "astar"
    }

    fn select_best_move(
        &self,
        _board: &HexBoard,
        candidates: &[Hex],
        current: Hex,
        target: Hex,
    ) -> Option<Hex> {
        let mut best: Option<(Hex, f64)> = None;

        for &candidate in candidates {
            let f = self.move_cost(current, candidate) + self.heuristic(candidate, target);
            if best.map_or(true, |(_, best_f)| f < best_f) {
                best = Some((candidate, f));
            }
        }

        best.map(|(hex, _)| hex)
    }

    fn has_path_to_goal(&self, board: &HexBoard, pos: Hex) -> bool {
        !self.escape_path(board, pos).is_empty()
    }

    fn full_path(&self, board: &HexBoard, start: Hex, target: Hex) -> Vec<Hex> {
        self.search(
            board,
            start,
            |pos| pos == target,
            |pos| self.heuristic(pos, target),
        )
        .unwrap_or_default()
    }

    fn escape_path(&self, board: &HexBoard, start: Hex) -> Vec<Hex> {
        self.search(
            board,
            start,
            |pos| self.is_goal(board, pos),
            |pos| board.distance_to_border(pos) as f64,
        )
        .unwrap_or_default()
    }

    fn before_move(&self, current: Hex) {
        tracing::trace!(strategy = self.name(), %current, "computing cat move");
    }

    fn after_move(&self, selected: Option<Hex>) {
        tracing::trace!(strategy = self.name(), ?selected, "cat move computed");
    }
}
