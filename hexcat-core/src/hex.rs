//! Hex coordinates (axial storage, cube math)

use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// Axial hex coordinate. The cube component `s` is derived so that
/// `q + r + s == 0` always holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hex {
    pub q: i32,
    pub r: i32,
}

/// Direction vectors in axial coordinates (dq, dr)
/// Index: 0=E, 1=NE, 2=NW, 3=W, 4=SW, 5=SE
pub const DIRECTIONS: [Hex; 6] = [
    Hex::new(1, 0),  // E
    Hex::new(1, -1), // NE
    Hex::new(0, -1), // NW
    Hex::new(-1, 0), // W
    Hex::new(-1, 1), // SW
    Hex::new(0, 1),  // SE
];

/// Largest |q|, |r| or |s| accepted from untrusted input
pub const MAX_COORDINATE: i32 = 1 << 20;

/// Cube distance of an axial delta, widened so no input can overflow
fn cube_length(dq: i64, dr: i64) -> i32 {
    let ds = -dq - dr;
    let len = dq.abs().max(dr.abs()).max(ds.abs());
    i32::try_from(len).unwrap_or(i32::MAX)
}

impl Hex {
    pub const ORIGIN: Hex = Hex::new(0, 0);

    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Build from request input, rejecting components beyond `MAX_COORDINATE`
    pub fn checked(q: i32, r: i32) -> Result<Self> {
        let hex = Self::new(q, r);
        if hex.ring() > MAX_COORDINATE {
            return Err(GameError::InvalidCoordinate(format!(
                "({}, {}) is out of range, components are limited to {}",
                q, r, MAX_COORDINATE
            )));
        }
        Ok(hex)
    }

    /// Build from cube components, rejecting triples that do not sum to zero
    pub fn from_cube(q: i32, r: i32, s: i32) -> Result<Self> {
        if i64::from(q) + i64::from(r) + i64::from(s) != 0 {
            return Err(GameError::InvalidCoordinate(format!(
                "cube components ({}, {}, {}) do not sum to zero",
                q, r, s
            )));
        }
        Self::checked(q, r)
    }

    /// Third cube component. Saturates outside `MAX_COORDINATE`.
    pub const fn s(&self) -> i32 {
        self.q.saturating_neg().saturating_sub(self.r)
    }

    /// Distance from the origin, i.e. max(|q|, |r|, |s|)
    pub fn ring(&self) -> i32 {
        cube_length(i64::from(self.q), i64::from(self.r))
    }

    /// Distance between two hexes
    pub fn distance_to(&self, other: Hex) -> i32 {
        cube_length(
            i64::from(self.q) - i64::from(other.q),
            i64::from(self.r) - i64::from(other.r),
        )
    }

    /// Neighbor in direction (0-5)
    pub fn neighbor(&self, direction: usize) -> Hex {
        *self + DIRECTIONS[direction % 6]
    }

    /// All six neighbors, in `DIRECTIONS` order, without any bounds check
    pub fn neighbors(&self) -> impl Iterator<Item = Hex> + '_ {
        DIRECTIONS.iter().map(move |&dir| *self + dir)
    }
}

impl Add for Hex {
    type Output = Hex;

    fn add(self, other: Hex) -> Hex {
        Hex::new(self.q.saturating_add(other.q), self.r.saturating_add(other.r))
    }
}

impl fmt::Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.q, self.r, self.s())
    }
}
