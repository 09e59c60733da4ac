//! Computer opponent

use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;

use crate::rules::{Board, Move, Side};

/// Pick the computer's next move
///
/// Captures take priority: when any jump is available one is chosen
/// uniformly at random among the jumps, otherwise among all moves.
/// Returns `None` when the computer has no legal move.
pub fn select_move(board: &Board, rng: &mut ChaCha20Rng) -> Option<Move> {
    let moves = board.moves_for(Side::Computer);
    let captures: Vec<Move> = moves.iter().copied().filter(Move::is_capture).collect();
    if captures.is_empty() {
        moves.choose(rng).copied()
    } else {
        captures.choose(rng).copied()
    }
}
