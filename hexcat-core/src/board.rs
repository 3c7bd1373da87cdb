//! Hex board: bounds, adjacency and blocked cells

use rustc_hash::FxHashSet;

use crate::error::{GameError, Result};
use crate::hex::Hex;

/// Smallest playable board radius
pub const MIN_BOARD_SIZE: i32 = 3;

/// Largest board radius; suggestion search grows with the square of the cell count
pub const MAX_BOARD_SIZE: i32 = 25;

/// Board radius used when none is configured
pub const DEFAULT_BOARD_SIZE: i32 = 11;

/// Reject radii outside `MIN_BOARD_SIZE..=MAX_BOARD_SIZE`
pub fn check_board_size(radius: i32) -> Result<()> {
    if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&radius) {
        return Err(GameError::InvalidBoardSize {
            got: radius,
            min: MIN_BOARD_SIZE,
            max: MAX_BOARD_SIZE,
        });
    }
    Ok(())
}

/// Hexagonal board of a fixed radius with a growing set of blocked cells
#[derive(Clone, Debug)]
pub struct HexBoard {
    radius: i32,
    blocked: FxHashSet<Hex>,
}

impl HexBoard {
    pub fn new(radius: i32) -> Result<Self> {
        check_board_size(radius)?;
        Ok(Self {
            radius,
            blocked: FxHashSet::default(),
        })
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn in_bounds(&self, pos: Hex) -> bool {
        pos.ring() <= self.radius
    }

    pub fn is_blocked(&self, pos: Hex) -> bool {
        self.blocked.contains(&pos)
    }

    /// A cell the player may block
    pub fn is_valid_move(&self, pos: Hex) -> bool {
        self.in_bounds(pos) && !self.is_blocked(pos)
    }

    /// Border ring: every in-bounds cell at distance `radius - 1` or more
    /// from the center. Reaching one lets the cat escape.
    pub fn is_border(&self, pos: Hex) -> bool {
        self.in_bounds(pos) && pos.ring() >= self.radius - 1
    }

    /// Steps from `pos` to the nearest border cell on an empty board
    pub fn distance_to_border(&self, pos: Hex) -> i32 {
        (self.radius - 1 - pos.ring()).max(0)
    }

    /// Neighbors that are on the board and not blocked
    pub fn adjacent(&self, pos: Hex) -> Vec<Hex> {
        pos.neighbors()
            .filter(|&n| self.in_bounds(n) && !self.is_blocked(n))
            .collect()
    }

    /// Enumerate board cells (q, r in `-radius+1..radius`, |s| <= radius)
    /// that satisfy `predicate`
    pub fn positions_matching<F>(&self, predicate: F) -> Vec<Hex>
    where
        F: Fn(Hex) -> bool,
    {
        let span = self.radius - 1;
        let mut positions = Vec::new();
        for q in -span..=span {
            for r in -span..=span {
                let hex = Hex::new(q, r);
                if hex.s().abs() <= self.radius && predicate(hex) {
                    positions.push(hex);
                }
            }
        }
        positions
    }

    /// All border cells, in enumeration order
    pub fn border_cells(&self) -> Vec<Hex> {
        self.positions_matching(|pos| self.is_border(pos))
    }

    pub fn blocked_cells(&self) -> impl Iterator<Item = Hex> + '_ {
        self.blocked.iter().copied()
    }

    /// Blocked cells in (q, r) order
    pub fn sorted_blocked_cells(&self) -> Vec<Hex> {
        let mut cells: Vec<Hex> = self.blocked_cells().collect();
        cells.sort_unstable();
        cells
    }

    pub fn blocked_count(&self) -> usize {
        self.blocked.len()
    }

    // ========================================================================
    // MUTATION
    // ========================================================================

    /// Block a cell. Idempotent and unchecked; validate with `is_valid_move`.
    pub fn block(&mut self, pos: Hex) {
        self.blocked.insert(pos);
    }

    /// Temporarily block `pos` for evaluation. The cell is released again
    /// when the returned guard is dropped, including during unwinding.
    pub fn simulate_block(&mut self, pos: Hex) -> SimulatedBlock<'_> {
        let inserted = self.blocked.insert(pos);
        SimulatedBlock {
            board: self,
            pos,
            inserted,
        }
    }
}

/// Guard returned by [`HexBoard::simulate_block`]
pub struct SimulatedBlock<'a> {
    board: &'a mut HexBoard,
    pos: Hex,
    inserted: bool,
}

impl SimulatedBlock<'_> {
    pub fn board(&self) -> &HexBoard {
        self.board
    }
}

impl Drop for SimulatedBlock<'_> {
    fn drop(&mut self) {
        // Only undo what this guard added
        if self.inserted {
            self.board.blocked.remove(&self.pos);
        }
    }
}
