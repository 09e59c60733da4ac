//! Computer opponents

use serde::{Deserialize, Serialize};

use crate::tile::Tile;
use crate::{End, Table};

/// What a seat does on its turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Action {
    Play { tile: Tile, end: End },
    Draw,
    Pass,
}

/// First tile in `hand` that fits the table
///
/// An empty table takes any tile on the right. Otherwise the left end is
/// tried before the right one for each tile in hand order.
pub fn select_move(hand: &[Tile], table: &Table) -> Option<(Tile, End)> {
    let Some((left, right)) = table.endpoints() else {
        return hand.first().map(|&tile| (tile, End::Right));
    };
    hand.iter().find_map(|&tile| {
        if tile.has(left) {
            Some((tile, End::Left))
        } else if tile.has(right) {
            Some((tile, End::Right))
        } else {
            None
        }
    })
}

/// Play when possible, else draw while the boneyard lasts, else pass
pub fn choose_action(hand: &[Tile], table: &Table, boneyard_len: usize) -> Action {
    match select_move(hand, table) {
        Some((tile, end)) => Action::Play { tile, end },
        None if boneyard_len > 0 => Action::Draw,
        None => Action::Pass,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with(left: u8, right: u8) -> Table {
        let mut table = Table::default();
        table.place(Tile::new(left, right), End::Right);
        table
    }

    #[test]
    fn test_empty_table_takes_first_tile_on_right() {
        let hand = [Tile::new(3, 4), Tile::new(6, 6)];
        assert_eq!(
            select_move(&hand, &Table::default()),
            Some((Tile::new(3, 4), End::Right))
        );
    }

    #[test]
    fn test_left_checked_before_right() {
        let table = table_with(2, 5);
        let hand = [Tile::new(5, 2)];
        assert_eq!(select_move(&hand, &table), Some((Tile::new(5, 2), End::Left)));
    }

    #[test]
    fn test_hand_order_wins_over_end_order() {
        let table = table_with(2, 5);
        let hand = [Tile::new(0, 1), Tile::new(5, 6), Tile::new(2, 3)];
        assert_eq!(select_move(&hand, &table), Some((Tile::new(5, 6), End::Right)));
    }

    #[test]
    fn test_draw_then_pass() {
        let table = table_with(2, 5);
        let hand = [Tile::new(0, 1)];
        assert_eq!(choose_action(&hand, &table, 3), Action::Draw);
        assert_eq!(choose_action(&hand, &table, 0), Action::Pass);
    }

    #[test]
    fn test_empty_hand_on_empty_table_passes() {
        assert_eq!(choose_action(&[], &Table::default(), 0), Action::Pass);
    }
}
