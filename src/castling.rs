// src/castling.rs
use crate::attacks::find_attacked_spots;
use crate::board::Board;
use crate::types::{Color, PieceKind, Square};

pub const QUEENSIDE: usize = 0;
pub const KINGSIDE: usize = 1;
const KING_FILE: u8 = 4;

/// Castling options for one side. Index 0 is queenside, index 1 kingside;
/// `dx` is the king's file displacement for each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Castling {
    pub possible: [bool; 2],
    pub dx: [i8; 2],
}

impl Castling {
    pub fn none() -> Self {
        Castling { possible: [false, false], dx: [-2, 2] }
    }

    /// King destinations that are currently legal.
    pub fn destinations(&self, king_sq: Square) -> Vec<Square> {
        (0..2)
            .filter(|&side| self.possible[side])
            .filter_map(|side| king_sq.offset(self.dx[side], 0))
            .collect()
    }
}

/// Rook origin and destination for a king move of `dx` files from `king_sq`.
pub fn rook_relocation(king_sq: Square, dx: i8) -> (Square, Square) {
    let rank = king_sq.rank();
    if dx > 0 {
        (Square::new(7, rank), Square::new(5, rank))
    } else {
        (Square::new(0, rank), Square::new(3, rank))
    }
}

pub fn castling_possible(board: &Board, color: Color) -> Castling {
    let mut castling = Castling::none();
    let Some(king_sq) = board.find_king(color) else {
        return castling;
    };
    // Only an unmoved king on its e-file start square may castle.
    let king_ready = board.get(king_sq).is_some_and(|k| !k.has_moved)
        && king_sq.rank() == color.home_rank()
        && king_sq.file() == KING_FILE;
    if !king_ready {
        return castling;
    }

    let attacked = find_attacked_spots(board, color);
    if attacked.contains(&king_sq) {
        return castling;
    }

    for (side, rook_file) in [(QUEENSIDE, 0u8), (KINGSIDE, 7u8)] {
        let rook_sq = Square::new(rook_file, king_sq.rank());
        let rook_ready = board
            .get(rook_sq)
            .is_some_and(|r| r.kind == PieceKind::Rook && r.color == color && !r.has_moved);
        if !rook_ready {
            continue;
        }

        let step: i8 = if rook_file > king_sq.file() { 1 } else { -1 };
        let mut between = Vec::new();
        let mut sq = king_sq;
        while let Some(next) = sq.offset(step, 0) {
            if next == rook_sq { break; }
            between.push(next);
            sq = next;
        }

        // every square between king and rook empty and unattacked, destination included
        let path_clear = between.iter().all(|&s| board.is_empty(s));
        let path_safe = between.iter().all(|s| !attacked.contains(s));
        let landing_safe = king_sq
            .offset(castling.dx[side], 0)
            .is_some_and(|dest| !attacked.contains(&dest));

        castling.possible[side] = path_clear && path_safe && landing_safe;
    }
    castling
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Piece;

    fn sq(name: &str) -> Square { name.parse().unwrap() }

    #[test]
    fn both_sides_open() {
        let board = Board::from_rows([
            "r...k..r",
            "pppppppp",
            "........",
            "........",
            "........",
            "........",
            "PPPPPPPP",
            "R...K..R",
        ]);
        let castling = castling_possible(&board, Color::White);
        assert_eq!(castling.possible, [true, true]);
        assert_eq!(castling.destinations(sq("e1")), vec![sq("c1"), sq("g1")]);
        assert_eq!(castling_possible(&board, Color::Black).possible, [true, true]);
    }

    #[test]
    fn starting_position_is_blocked() {
        assert_eq!(castling_possible(&Board::standard(), Color::White).possible, [false, false]);
    }

    #[test]
    fn attacked_transit_square_forbids_that_side() {
        let board = Board::from_rows([
            "....k...",
            "........",
            "........",
            "........",
            "........",
            "........",
            "........",
            "R...K..R",
        ]);
        let mut attacked = board.clone();
        attacked.place(sq("f8"), Piece::new(PieceKind::Rook, Color::Black));
        assert_eq!(castling_possible(&attacked, Color::White).possible, [true, false]);
    }

    #[test]
    fn attacked_destination_forbids_that_side() {
        let mut board = Board::from_rows([
            "....k...",
            "........",
            "........",
            "........",
            "........",
            "........",
            "........",
            "R...K..R",
        ]);
        board.place(sq("g8"), Piece::new(PieceKind::Rook, Color::Black));
        assert_eq!(castling_possible(&board, Color::White).possible, [true, false]);
    }

    #[test]
    fn attacked_rook_side_square_forbids_queenside() {
        let board = Board::from_rows([
            ".r..k...",
            "........",
            "........",
            "........",
            "........",
            "........",
            "........",
            "R...K..R",
        ]);
        assert_eq!(castling_possible(&board, Color::White).possible, [false, true]);
    }

    #[test]
    fn king_off_its_start_file_cannot_castle() {
        let board = Board::from_rows([
            "....k...",
            "........",
            "........",
            "........",
            "........",
            "........",
            "........",
            "R....K.R",
        ]);
        assert_eq!(castling_possible(&board, Color::White).possible, [false, false]);
    }

    #[test]
    fn king_in_check_cannot_castle() {
        let mut board = Board::from_rows([
            "....k...",
            "........",
            "........",
            "........",
            "........",
            "........",
            "........",
            "R...K..R",
        ]);
        board.place(sq("e5"), Piece::new(PieceKind::Rook, Color::Black));
        assert_eq!(castling_possible(&board, Color::White).possible, [false, false]);
    }

    #[test]
    fn moved_rook_or_king_loses_the_right() {
        let mut board = Board::from_rows([
            "....k...",
            "........",
            "........",
            "........",
            "........",
            "........",
            "........",
            "R...K..R",
        ]);
        let mut rook = board.get(sq("h1")).unwrap();
        rook.has_moved = true;
        board.place(sq("h1"), rook);
        assert_eq!(castling_possible(&board, Color::White).possible, [true, false]);

        let mut king = board.get(sq("e1")).unwrap();
        king.has_moved = true;
        board.place(sq("e1"), king);
        assert_eq!(castling_possible(&board, Color::White).possible, [false, false]);
    }

    #[test]
    fn rook_relocation_targets() {
        assert_eq!(rook_relocation(sq("e1"), 2), (sq("h1"), sq("f1")));
        assert_eq!(rook_relocation(sq("e8"), -2), (sq("a8"), sq("d8")));
    }
}
