//! Settled cells of the Tetris well

use engine_core::Point;
use serde::{Deserialize, Serialize};

use crate::piece::{Piece, PieceKind};

/// Well width in cells
pub const BOARD_WIDTH: usize = 10;
/// Well height in cells
pub const BOARD_HEIGHT: usize = 20;

pub type Row = [Option<PieceKind>; BOARD_WIDTH];

/// Rows top to bottom; a filled cell keeps the kind of the piece that left it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    rows: Vec<Row>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            rows: vec![[None; BOARD_WIDTH]; BOARD_HEIGHT],
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn get(&self, at: Point) -> Option<PieceKind> {
        if !at.in_bounds(BOARD_WIDTH, BOARD_HEIGHT) {
            return None;
        }
        self.rows[at.y as usize][at.x as usize]
    }

    pub fn set(&mut self, at: Point, kind: PieceKind) {
        if at.in_bounds(BOARD_WIDTH, BOARD_HEIGHT) {
            self.rows[at.y as usize][at.x as usize] = Some(kind);
        }
    }

    /// Whether `piece` fits where it stands
    ///
    /// Cells above the top edge are allowed so a piece can start partly
    /// hidden; the sides and the floor are hard limits.
    pub fn fits(&self, piece: &Piece) -> bool {
        piece.cells_at(0, 0).all(|cell| {
            let inside = cell.x >= 0 && (cell.x as usize) < BOARD_WIDTH;
            let above_floor = cell.y < BOARD_HEIGHT as i32;
            inside && above_floor && (cell.y < 0 || self.get(cell).is_none())
        })
    }

    /// Write the piece into the settled cells; parts above the top edge are dropped
    pub fn lock(&mut self, piece: &Piece) {
        for cell in piece.cells_at(0, 0) {
            if cell.y >= 0 {
                self.set(cell, piece.kind);
            }
        }
    }

    /// Remove every full row, shifting the rest down; returns how many went
    pub fn clear_full_rows(&mut self) -> usize {
        let before = self.rows.len();
        self.rows.retain(|row| row.iter().any(Option::is_none));
        let cleared = before - self.rows.len();
        for _ in 0..cleared {
            self.rows.insert(0, [None; BOARD_WIDTH]);
        }
        cleared
    }

    pub fn filled_cells(&self) -> usize {
        self.rows.iter().flatten().filter(|c| c.is_some()).count()
    }
}
