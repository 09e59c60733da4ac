//! Tetromino shapes and the falling piece

use engine_core::Point;
use rand::Rng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

/// The seven tetromino kinds; also the color tag of a settled cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Spawn orientation, rows top to bottom
    pub fn shape(self) -> Vec<Vec<u8>> {
        let rows: &[&[u8]] = match self {
            PieceKind::I => &[&[1, 1, 1, 1]],
            PieceKind::O => &[&[1, 1], &[1, 1]],
            PieceKind::T => &[&[0, 1, 0], &[1, 1, 1]],
            PieceKind::S => &[&[0, 1, 1], &[1, 1, 0]],
            PieceKind::Z => &[&[1, 1, 0], &[0, 1, 1]],
            PieceKind::J => &[&[1, 0, 0], &[1, 1, 1]],
            PieceKind::L => &[&[0, 0, 1], &[1, 1, 1]],
        };
        rows.iter().map(|row| row.to_vec()).collect()
    }

    pub fn color(self) -> &'static str {
        match self {
            PieceKind::I => "cyan",
            PieceKind::O => "yellow",
            PieceKind::T => "purple",
            PieceKind::S => "green",
            PieceKind::Z => "red",
            PieceKind::J => "blue",
            PieceKind::L => "orange",
        }
    }

    pub fn random(rng: &mut ChaCha20Rng) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// The falling piece: a shape matrix anchored at its top-left corner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub shape: Vec<Vec<u8>>,
    pub position: Point,
}

impl Piece {
    pub fn spawn(kind: PieceKind, at: Point) -> Self {
        Self {
            kind,
            shape: kind.shape(),
            position: at,
        }
    }

    /// Board cells covered by the piece if it were moved by `(dx, dy)`
    pub fn cells_at(&self, dx: i32, dy: i32) -> impl Iterator<Item = Point> + '_ {
        let origin = self.position.offset(dx, dy);
        self.shape.iter().enumerate().flat_map(move |(y, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, &filled)| filled != 0)
                .map(move |(x, _)| origin.offset(x as i32, y as i32))
        })
    }

    /// Copy of the piece rotated a quarter turn clockwise
    ///
    /// Column `i` of the old shape, read bottom to top, becomes row `i`.
    pub fn rotated(&self) -> Self {
        let width = self.shape.first().map_or(0, Vec::len);
        let shape = (0..width)
            .map(|i| self.shape.iter().rev().map(|row| row[i]).collect())
            .collect();
        Self {
            kind: self.kind,
            shape,
            position: self.position,
        }
    }

    pub fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            kind: self.kind,
            shape: self.shape.clone(),
            position: self.position.offset(dx, dy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_shape_has_four_cells() {
        for kind in PieceKind::ALL {
            let piece = Piece::spawn(kind, Point::new(0, 0));
            assert_eq!(piece.cells_at(0, 0).count(), 4, "{:?}", kind);
        }
    }

    #[test]
    fn test_rotate_t_clockwise() {
        let piece = Piece::spawn(PieceKind::T, Point::new(4, 0));
        let rotated = piece.rotated();
        assert_eq!(rotated.shape, vec![vec![1, 0], vec![1, 1], vec![1, 0]]);
    }

    #[test]
    fn test_rotate_i_turns_vertical() {
        let piece = Piece::spawn(PieceKind::I, Point::new(4, 0));
        let rotated = piece.rotated();
        assert_eq!(rotated.shape, vec![vec![1]; 4]);
        assert_eq!(rotated.rotated().shape, piece.shape);
    }

    #[test]
    fn test_four_rotations_identity() {
        for kind in PieceKind::ALL {
            let piece = Piece::spawn(kind, Point::new(3, 3));
            let back = piece.rotated().rotated().rotated().rotated();
            assert_eq!(back, piece);
        }
    }

    #[test]
    fn test_cells_follow_position() {
        let piece = Piece::spawn(PieceKind::O, Point::new(4, 0));
        let cells: Vec<_> = piece.cells_at(0, 1).collect();
        assert_eq!(
            cells,
            vec![
                Point::new(4, 1),
                Point::new(5, 1),
                Point::new(4, 2),
                Point::new(5, 2)
            ]
        );
    }

    #[test]
    fn test_colors() {
        assert_eq!(PieceKind::I.color(), "cyan");
        assert_eq!(PieceKind::L.color(), "orange");
    }
}
