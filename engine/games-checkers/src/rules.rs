//! Board model and move generation

use std::fmt;

use engine_core::{Point, RuleError};
use serde::{Deserialize, Serialize};

/// Board width and height
pub const BOARD_SIZE: usize = 8;

/// Who owns a piece; also whose turn it is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Player,
    Computer,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Player => Side::Computer,
            Side::Computer => Side::Player,
        }
    }

    /// Row step of an unpromoted piece
    pub fn forward(self) -> i32 {
        match self {
            Side::Player => -1,
            Side::Computer => 1,
        }
    }

    /// The row where a piece of this side is crowned
    pub fn promotion_row(self) -> i32 {
        match self {
            Side::Player => 0,
            Side::Computer => BOARD_SIZE as i32 - 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Player => "player",
            Side::Computer => "computer",
        }
    }

    /// Capitalized form used in event messages
    pub fn label(self) -> &'static str {
        match self {
            Side::Player => "Player",
            Side::Computer => "Computer",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checker {
    pub owner: Side,
    pub is_king: bool,
}

impl Checker {
    pub fn man(owner: Side) -> Self {
        Self {
            owner,
            is_king: false,
        }
    }
}

/// A board square addressed by row (top to bottom) and column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    pub row: i32,
    pub col: i32,
}

impl Square {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn offset(self, drow: i32, dcol: i32) -> Self {
        Self::new(self.row + drow, self.col + dcol)
    }

    pub fn on_board(self) -> bool {
        Point::new(self.col, self.row).in_bounds(BOARD_SIZE, BOARD_SIZE)
    }

    /// Reject squares off the board
    pub fn check(self) -> Result<Self, RuleError> {
        if self.on_board() {
            Ok(self)
        } else {
            Err(RuleError::OutOfBounds {
                x: self.col,
                y: self.row,
            })
        }
    }
}

/// One diagonal step or jump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured: Option<Square>,
}

impl Move {
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

/// 8×8 grid of optional pieces, rows top to bottom
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    squares: [[Option<Checker>; BOARD_SIZE]; BOARD_SIZE],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Standard opening: computer on rows 0-2, player on rows 5-7, dark squares only
    pub fn new() -> Self {
        let mut board = Self::empty();
        for row in 0..BOARD_SIZE as i32 {
            for col in 0..BOARD_SIZE as i32 {
                if (row + col) % 2 == 0 {
                    continue;
                }
                let owner = match row {
                    0..=2 => Side::Computer,
                    5..=7 => Side::Player,
                    _ => continue,
                };
                board.set(Square::new(row, col), Some(Checker::man(owner)));
            }
        }
        board
    }

    pub fn empty() -> Self {
        Self {
            squares: [[None; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    pub fn get(&self, at: Square) -> Option<Checker> {
        if !at.on_board() {
            return None;
        }
        self.squares[at.row as usize][at.col as usize]
    }

    pub fn set(&mut self, at: Square, piece: Option<Checker>) {
        if at.on_board() {
            self.squares[at.row as usize][at.col as usize] = piece;
        }
    }

    pub fn count(&self, side: Side) -> usize {
        self.squares
            .iter()
            .flatten()
            .flatten()
            .filter(|piece| piece.owner == side)
            .count()
    }

    /// Squares holding a piece of `side`, row-major
    pub fn pieces_of(&self, side: Side) -> impl Iterator<Item = Square> + '_ {
        (0..BOARD_SIZE as i32)
            .flat_map(|row| (0..BOARD_SIZE as i32).map(move |col| Square::new(row, col)))
            .filter(move |&sq| self.get(sq).is_some_and(|piece| piece.owner == side))
    }

    /// Every step and jump available to the piece on `from`
    ///
    /// Men move forward only, kings both ways. A jump needs an opposing piece
    /// on the diagonal neighbour and an empty landing square on the board.
    pub fn moves_from(&self, from: Square) -> Vec<Move> {
        let Some(piece) = self.get(from) else {
            return Vec::new();
        };
        let row_dirs: &[i32] = if piece.is_king {
            &[-1, 1]
        } else if piece.owner == Side::Player {
            &[-1]
        } else {
            &[1]
        };

        let mut moves = Vec::new();
        for &drow in row_dirs {
            for dcol in [-1, 1] {
                let step = from.offset(drow, dcol);
                if step.on_board() && self.get(step).is_none() {
                    moves.push(Move {
                        from,
                        to: step,
                        captured: None,
                    });
                }

                let landing = from.offset(drow * 2, dcol * 2);
                let jumped = self.get(step);
                if landing.on_board()
                    && self.get(landing).is_none()
                    && jumped.is_some_and(|other| other.owner != piece.owner)
                {
                    moves.push(Move {
                        from,
                        to: landing,
                        captured: Some(step),
                    });
                }
            }
        }
        moves
    }

    /// Every move available to `side`, pieces scanned row-major
    pub fn moves_for(&self, side: Side) -> Vec<Move> {
        self.pieces_of(side)
            .flat_map(|sq| self.moves_from(sq))
            .collect()
    }

    /// Carry out a move generated by `moves_from`; returns whether it crowned the piece
    pub fn perform(&mut self, mv: &Move) -> bool {
        let Some(mut piece) = self.get(mv.from) else {
            return false;
        };
        self.set(mv.from, None);
        if let Some(captured) = mv.captured {
            self.set(captured, None);
        }
        let crowned = !piece.is_king && mv.to.row == piece.owner.promotion_row();
        piece.is_king |= crowned;
        self.set(mv.to, Some(piece));
        crowned
    }
}
