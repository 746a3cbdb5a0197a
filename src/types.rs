// src/types.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Color { White, Black }

impl Color {
    pub fn opponent(&self) -> Color {
        match self { Color::White => Color::Black, Color::Black => Color::White }
    }

    pub fn index(&self) -> usize {
        match self { Color::White => 0, Color::Black => 1 }
    }

    /// Rank step a pawn of this color advances by.
    pub fn forward(&self) -> i8 {
        match self { Color::White => 1, Color::Black => -1 }
    }

    pub fn home_rank(&self) -> u8 {
        match self { Color::White => 0, Color::Black => 7 }
    }

    pub fn pawn_rank(&self) -> u8 {
        match self { Color::White => 1, Color::Black => 6 }
    }

    pub fn promotion_rank(&self) -> u8 {
        match self { Color::White => 7, Color::Black => 0 }
    }
}

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PieceKind { Pawn, Knight, Bishop, Rook, Queen, King }

impl PieceKind {
    pub fn is_slider(&self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)
    }
}

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub has_moved: bool,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color) -> Self { Piece { kind, color, has_moved: false } }

    pub fn symbol(&self) -> char {
        let symbol = match self.kind {
            PieceKind::Pawn => 'p', PieceKind::Knight => 'n', PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r', PieceKind::Queen => 'q', PieceKind::King => 'k',
        };
        match self.color {
            Color::White => symbol.to_ascii_uppercase(),
            Color::Black => symbol,
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        let color = if c.is_uppercase() { Color::White } else { Color::Black };
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn, 'n' => PieceKind::Knight, 'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook, 'q' => PieceKind::Queen, 'k' => PieceKind::King,
            _ => return None,
        };
        Some(Piece::new(kind, color))
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A board coordinate. File 0 is the a-file, rank 0 is White's back rank.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    rank: u8,
    file: u8,
}

impl Square {
    /// Panics on coordinates outside the board; callers hand in trusted input.
    pub fn new(file: u8, rank: u8) -> Self {
        assert!(file < 8 && rank < 8, "square ({}, {}) is off the board", file, rank);
        Square { file, rank }
    }

    pub fn try_new(file: i8, rank: i8) -> Option<Self> {
        if (0..8).contains(&file) && (0..8).contains(&rank) {
            Some(Square { file: file as u8, rank: rank as u8 })
        } else {
            None
        }
    }

    pub fn from_index(index: usize) -> Self {
        assert!(index < 64, "square index {} is off the board", index);
        Square { file: (index % 8) as u8, rank: (index / 8) as u8 }
    }

    pub fn file(&self) -> u8 { self.file }
    pub fn rank(&self) -> u8 { self.rank }
    pub fn index(&self) -> usize { self.rank as usize * 8 + self.file as usize }

    pub fn offset(&self, df: i8, dr: i8) -> Option<Square> {
        Square::try_new(self.file as i8 + df, self.rank as i8 + dr)
    }

    /// Chebyshev distance, i.e. the number of king steps between two squares.
    pub fn distance(&self, other: Square) -> u8 {
        self.file.abs_diff(other.file).max(self.rank.abs_diff(other.rank))
    }

    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).map(Square::from_index)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file) as char, (b'1' + self.rank) as char)
    }
}

impl FromStr for Square {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.trim().as_bytes();
        match bytes {
            [f @ b'a'..=b'h', r @ b'1'..=b'8'] => Ok(Square::new(f - b'a', r - b'1')),
            _ => Err(format!("'{}' is not a square name like 'e2'", s.trim())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_names_round_trip_through_display() {
        let sq: Square = "e2".parse().unwrap();
        assert_eq!((sq.file(), sq.rank()), (4, 1));
        assert_eq!(sq.to_string(), "e2");
        assert!("i9".parse::<Square>().is_err());
        assert!("e".parse::<Square>().is_err());
    }

    #[test]
    fn offset_stays_on_board() {
        let a1 = Square::new(0, 0);
        assert_eq!(a1.offset(-1, 0), None);
        assert_eq!(a1.offset(1, 2), Some(Square::new(1, 2)));
        assert_eq!(Square::new(7, 7).offset(0, 1), None);
    }

    #[test]
    #[should_panic]
    fn out_of_bounds_square_fails_fast() {
        let _ = Square::new(8, 0);
    }

    #[test]
    fn distance_counts_king_steps() {
        assert_eq!(Square::new(4, 0).distance(Square::new(4, 7)), 7);
        assert_eq!(Square::new(4, 0).distance(Square::new(5, 1)), 1);
    }
}
