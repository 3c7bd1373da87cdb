//! Breadth-first cat

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};

use super::{reconstruct_path, MovementStrategy};
use crate::board::HexBoard;
use crate::hex::Hex;

/// Moves to the neighbor with the shortest escape route, found by an
/// unweighted breadth-first search from every candidate
#[derive(Clone, Copy, Debug, Default)]
pub struct BfsStrategy;

impl BfsStrategy {
    /// Shortest route from `start` to a goal cell, or `None` if walled in
    fn route_to_goal(&self, board: &HexBoard, start: Hex) -> Option<Vec<Hex>> {
        let mut parents: FxHashMap<Hex, Hex> = FxHashMap::default();
        let mut visited: FxHashSet<Hex> = FxHashSet::default();
        let mut queue = VecDeque::new();

        visited.insert(start);
        queue.push_back(start);

        while let Some(pos) = queue.pop_front() {
            if self.is_goal(board, pos) {
                return Some(reconstruct_path(&parents, start, pos));
            }
            for next in self.possible_moves(board, pos) {
                if visited.insert(next) {
                    parents.insert(next, pos);
                    queue.push_back(next);
                }
            }
        }

        None
    }
}

impl MovementStrategy for BfsStrategy {
    fn name(&self) -> &'static str {
        "bfs"
    }

    fn select_best_move(
        &self,
        board: &HexBoard,
        candidates: &[Hex],
        _current: Hex,
        _target: Hex,
    ) -> Option<Hex> {
        let mut best: Option<(Hex, usize)> = None;

        for &candidate in candidates {
            let Some(route) = self.route_to_goal(board, candidate) else {
                continue;
            };
            // Strict comparison keeps the first candidate on ties
            if best.map_or(true, |(_, steps)| route.len() < steps) {
                best = Some((candidate, route.len()));
            }
        }

        // Walled in: no candidate reaches the border, so the cat stays put
        best.map(|(hex, _)| hex)
    }

    fn has_path_to_goal(&self, board: &HexBoard, pos: Hex) -> bool {
        let mut visited: FxHashSet<Hex> = FxHashSet::default();
        let mut queue = VecDeque::new();

        visited.insert(pos);
        queue.push_back(pos);

        while let Some(current) = queue.pop_front() {
            if self.is_goal(board, current) {
                return true;
            }
            for next in self.possible_moves(board, current) {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        false
    }

    fn full_path(&self, board: &HexBoard, start: Hex, target: Hex) -> Vec<Hex> {
        let mut visited: FxHashSet<Hex> = FxHashSet::default();
        let mut queue: VecDeque<Vec<Hex>> = VecDeque::new();

        visited.insert(start);
        queue.push_back(vec![start]);

        while let Some(path) = queue.pop_front() {
            let last = path[path.len() - 1];
            if last == target {
                return path;
            }
            for next in self.possible_moves(board, last) {
                if visited.insert(next) {
                    let mut extended = path.clone();
                    extended.push(next);
                    queue.push_back(extended);
                }
            }
        }

        Vec::new()
    }

    fn escape_path(&self, board: &HexBoard, start: Hex) -> Vec<Hex> {
        self.route_to_goal(board, start).unwrap_or_default()
    }

    fn before_move(&self, current: Hex) {
        tracing::trace!(strategy = self.name(), %current, "computing cat move");
    }

    fn after_move(&self, selected: Option<Hex>) {
        tracing::trace!(strategy = self.name(), ?selected, "cat move computed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(radius: i32) -> HexBoard {
        HexBoard::new(radius).unwrap()
    }

    #[test]
    fn test_has_path_on_empty_board() {
        let b = board(5);
        assert!(BfsStrategy.has_path_to_goal(&b, Hex::ORIGIN));
    }

    #[test]
    fn test_no_path_when_enclosed() {
        let mut b = board(5);
        for n in Hex::ORIGIN.neighbors() {
            b.block(n);
        }
        assert!(!BfsStrategy.has_path_to_goal(&b, Hex::ORIGIN));
        assert!(BfsStrategy.escape_path(&b, Hex::ORIGIN).is_empty());
    }

    #[test]
    fn test_escape_path_is_shortest() {
        let b = board(5);
        let path = BfsStrategy.escape_path(&b, Hex::ORIGIN);
        // Border ring is at distance 4 from the center
        assert_eq!(path.len(), 5);
        assert_eq!(path[0], Hex::ORIGIN);
        assert!(b.is_border(path[4]));
        for pair in path.windows(2) {
            assert_eq!(pair[0].distance_to(pair[1]), 1);
        }
    }

    #[test]
    fn test_full_path_reaches_target() {
        let mut b = board(5);
        b.block(Hex::new(1, 0));
        let target = Hex::new(3, 0);
        let path = BfsStrategy.full_path(&b, Hex::ORIGIN, target);
        assert_eq!(path.first(), Some(&Hex::ORIGIN));
        assert_eq!(path.last(), Some(&target));
        // Detour around the blocked cell costs one extra step
        assert_eq!(path.len(), 5);
        assert!(!path.contains(&Hex::new(1, 0)));
    }

    #[test]
    fn test_full_path_to_blocked_target_is_empty() {
        let mut b = board(4);
        b.block(Hex::new(2, 0));
        assert!(BfsStrategy.full_path(&b, Hex::ORIGIN, Hex::new(2, 0)).is_empty());
    }

    #[test]
    fn test_select_prefers_shortest_escape() {
        let b = board(5);
        let current = Hex::new(2, 0);
        let candidates = b.adjacent(current);
        let best = BfsStrategy
            .select_best_move(&b, &candidates, current, Hex::new(4, 0))
            .unwrap();
        assert_eq!(b.distance_to_border(best), 1);
        // E is first in direction order and is one step from the border
        assert_eq!(best, Hex::new(3, 0));
    }

    #[test]
    fn test_select_avoids_dead_ends() {
        let mut b = board(4);
        // Wall off the east side so the short route is a dead end
        let cat = Hex::new(1, 0);
        for hex in [Hex::new(3, -1), Hex::new(3, 0), Hex::new(2, 1), Hex::new(2, -1), Hex::new(1, 1)] {
            b.block(hex);
        }
        let candidates = b.adjacent(cat);
        let best = BfsStrategy
            .select_best_move(&b, &candidates, cat, Hex::new(3, 0))
            .unwrap();
        assert!(BfsStrategy.has_path_to_goal(&b, best));
        assert_ne!(best, Hex::new(2, 0));
    }

    #[test]
    fn test_select_without_candidates() {
        let b = board(3);
        assert_eq!(BfsStrategy.select_best_move(&b, &[], Hex::ORIGIN, Hex::ORIGIN), None);
    }

    #[test]
    fn test_select_stays_put_when_walled_in() {
        let mut b = board(4);
        // Ring of radius 2 fully blocked keeps the cat inside
        for pos in b.positions_matching(|p| p.ring() == 2) {
            b.block(pos);
        }
        let candidates = b.adjacent(Hex::ORIGIN);
        assert_eq!(candidates.len(), 6);
        let best = BfsStrategy.select_best_move(&b, &candidates, Hex::ORIGIN, Hex::new(3, 0));
        assert_eq!(best, None);
        assert_eq!(BfsStrategy.next_move(&b, Hex::ORIGIN, Hex::new(3, 0)), None);
    }
}
