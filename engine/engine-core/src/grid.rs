//! Shared cell helpers for board games
//!
//! Every grid game checks a cell against its fixed board size before reading
//! or writing it; these helpers keep that check in one place.

use serde::{Deserialize, Serialize};

/// A board cell, column `x` and row `y`, origin at the top-left
///
/// Coordinates are signed so that a move off the left/top edge is
/// representable and can be rejected by `in_bounds`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell shifted by `(dx, dy)`
    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Whether the cell lies on a `width` × `height` board
    #[inline]
    pub fn in_bounds(self, width: usize, height: usize) -> bool {
        self.x >= 0 && self.y >= 0 && (self.x as usize) < width && (self.y as usize) < height
    }

    /// Row-major index on a `width` × `height` board, `None` when off the board
    ///
    /// # Example
    /// ```
    /// use engine_core::Point;
    ///
    /// assert_eq!(Point::new(2, 1).index(10, 20), Some(12));
    /// assert_eq!(Point::new(-1, 0).index(10, 20), None);
    /// ```
    #[inline]
    pub fn index(self, width: usize, height: usize) -> Option<usize> {
        self.in_bounds(width, height)
            .then(|| self.y as usize * width + self.x as usize)
    }
}

/// Every cell of a `width` × `height` board in row-major order
pub fn cells(width: usize, height: usize) -> impl Iterator<Item = Point> {
    (0..height as i32).flat_map(move |y| (0..width as i32).map(move |x| Point::new(x, y)))
}
