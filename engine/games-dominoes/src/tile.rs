//! Double-six tile set and the deterministic shuffle

use std::fmt;

use serde::{Deserialize, Serialize};

/// Highest pip value on a double-six set
pub const MAX_PIPS: u8 = 6;
/// Number of tiles in a double-six set
pub const SET_SIZE: usize = 28;
/// Seed used when dealing unless a session overrides it
pub const DEFAULT_SHUFFLE_SEED: u64 = 12345;

/// A domino; `left`/`right` are as oriented when laid on the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tile {
    pub left: u8,
    pub right: u8,
}

impl Tile {
    pub const fn new(left: u8, right: u8) -> Self {
        Self { left, right }
    }

    /// Stable identifier, independent of orientation
    pub fn id(&self) -> String {
        let n = self.normalized();
        format!("tile-{}-{}", n.left, n.right)
    }

    pub fn is_double(&self) -> bool {
        self.left == self.right
    }

    pub fn pips(&self) -> u32 {
        u32::from(self.left) + u32::from(self.right)
    }

    pub fn has(&self, value: u8) -> bool {
        self.left == value || self.right == value
    }

    /// Same tile with the lower value on the left
    pub fn normalized(&self) -> Self {
        if self.left <= self.right {
            *self
        } else {
            self.flipped()
        }
    }

    pub fn flipped(&self) -> Self {
        Self::new(self.right, self.left)
    }

    /// Whether both describe the same physical tile
    pub fn same_as(&self, other: &Tile) -> bool {
        self.normalized() == other.normalized()
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.left, self.right)
    }
}

/// Every tile of a double-six set, `(i, j)` with `i <= j`, in ascending order
pub fn all_tiles() -> Vec<Tile> {
    (0..=MAX_PIPS)
        .flat_map(|i| (i..=MAX_PIPS).map(move |j| Tile::new(i, j)))
        .collect()
}

/// Deterministic in-place shuffle
///
/// Walks the slice from the back, swapping each position with an index drawn
/// from `frac(sin(seed + n) * 10000)` where `n` is the count of positions not
/// yet fixed. The same seed always yields the same permutation.
pub fn shuffle<T>(items: &mut [T], seed: u64) {
    let mut remaining = items.len();
    while remaining != 0 {
        let x = (seed as f64 + remaining as f64).sin() * 10000.0;
        let fraction = x - x.floor();
        let pick = ((fraction * remaining as f64).floor() as usize).min(remaining - 1);
        remaining -= 1;
        items.swap(remaining, pick);
    }
}

/// A full set shuffled with `seed`
pub fn shuffled_set(seed: u64) -> Vec<Tile> {
    let mut tiles = all_tiles();
    shuffle(&mut tiles, seed);
    tiles
}
