// src/attacks.rs
// Attack maps: which squares a side's pieces threaten, regardless of whose
// turn it is.

use crate::board::Board;
use crate::movegen::captures_possible;
use crate::types::{Color, Square};

/// Squares threatened by the opponents of `color`, one entry per attacking
/// piece, so a square hit by two pieces appears twice.
pub fn find_attacked_spots(board: &Board, color: Color) -> Vec<Square> {
    attacked_by(board, color.opponent())
}

/// Squares threatened by the pieces of `attacker`.
pub fn attacked_by(board: &Board, attacker: Color) -> Vec<Square> {
    board
        .pieces_of(attacker)
        .flat_map(|(from, _)| captures_possible(board, from).squares().collect::<Vec<_>>())
        .collect()
}

pub fn is_checked(board: &Board, color: Color) -> bool {
    match board.find_king(color) {
        Some(king_sq) => find_attacked_spots(board, color).contains(&king_sq),
        None => {
            log::error!("no {:?} king on the board:\n{}", color, board);
            true
        }
    }
}

/// Squares of the enemy pieces currently giving check to `color`.
pub fn attackers(board: &Board, color: Color) -> Vec<Square> {
    let Some(king_sq) = board.find_king(color) else {
        return Vec::new();
    };
    board
        .pieces_of(color.opponent())
        .filter(|(from, _)| captures_possible(board, *from).contains(king_sq))
        .map(|(from, _)| from)
        .collect()
}

/// How many attack-map entries land on the king of `color`; 2 means double check.
pub fn calculate_attackers_number(board: &Board, color: Color) -> usize {
    match board.find_king(color) {
        Some(king_sq) => find_attacked_spots(board, color).iter().filter(|&&sq| sq == king_sq).count(),
        None => 0,
    }
}
