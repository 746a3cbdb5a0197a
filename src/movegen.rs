// src/movegen.rs
// --- Pseudo-legal destinations per piece ---
// Every piece kind is served by one of three geometry generators: a
// fixed-offset leaper (knight, king), a ray walker (bishop, rook, queen) and
// the pawn's directional generator. `moves_possible` lists quiet
// destinations only; `captures_possible` lists every threatened square and
// doubles as the piece's contribution to the attack map.

use crate::board::Board;
use crate::types::{Color, Piece, PieceKind, Square};
use lazy_static::lazy_static;
use serde::Serialize;

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2), (2, 1), (2, -1), (1, -2), (-1, -2), (-2, -1), (-2, 1), (-1, 2),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (0, 1), (1, 1), (1, 0), (1, -1), (0, -1), (-1, -1), (-1, 0), (-1, 1),
];

// (df, dr, is_diagonal)
const DIRECTIONS: &[(i8, i8, bool)] = &[
    ( 0,  1, false), ( 1,  0, false), ( 0, -1, false), (-1,  0, false),
    ( 1,  1, true),  ( 1, -1, true),  (-1, -1, true),  (-1,  1, true),
];

lazy_static! {
    static ref KNIGHT_TARGETS: Vec<Vec<Square>> = compute_leaper_targets(&KNIGHT_OFFSETS);
    static ref KING_TARGETS: Vec<Vec<Square>> = compute_leaper_targets(&KING_OFFSETS);
}

fn compute_leaper_targets(offsets: &[(i8, i8)]) -> Vec<Vec<Square>> {
    Square::all()
        .map(|from| offsets.iter().filter_map(|&(df, dr)| from.offset(df, dr)).collect())
        .collect()
}

/// One candidate destination. `allowed` is false for squares that are
/// reachable or threatened but cannot be executed right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Target {
    pub square: Square,
    pub allowed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveSet {
    targets: Vec<Target>,
}

impl MoveSet {
    pub fn new() -> Self { MoveSet { targets: Vec::new() } }

    pub fn push(&mut self, square: Square, allowed: bool) {
        self.targets.push(Target { square, allowed });
    }

    pub fn extend(&mut self, other: MoveSet) {
        self.targets.extend(other.targets);
    }

    pub fn len(&self) -> usize { self.targets.len() }
    pub fn is_empty(&self) -> bool { self.targets.is_empty() }

    /// Every listed square, allowed or not.
    pub fn squares(&self) -> impl Iterator<Item = Square> + '_ {
        self.targets.iter().map(|t| t.square)
    }

    /// Executable destinations, deduplicated, in first-seen order.
    pub fn allowed(&self) -> Vec<Square> {
        let mut out: Vec<Square> = Vec::with_capacity(self.targets.len());
        for t in self.targets.iter().filter(|t| t.allowed) {
            if !out.contains(&t.square) {
                out.push(t.square);
            }
        }
        out
    }

    pub fn is_allowed(&self, sq: Square) -> bool {
        self.targets.iter().any(|t| t.allowed && t.square == sq)
    }

    pub fn contains(&self, sq: Square) -> bool {
        self.targets.iter().any(|t| t.square == sq)
    }

    /// Keeps the entries for `sq` but marks them as not executable.
    pub fn disallow(&mut self, sq: Square) {
        for t in self.targets.iter_mut().filter(|t| t.square == sq) {
            t.allowed = false;
        }
    }

    /// Drops every entry that is not allowed.
    pub fn retain_allowed(&mut self) {
        self.targets.retain(|t| t.allowed);
    }
}

impl FromIterator<Target> for MoveSet {
    fn from_iter<I: IntoIterator<Item = Target>>(iter: I) -> Self {
        MoveSet { targets: iter.into_iter().collect() }
    }
}

fn piece_at(board: &Board, from: Square) -> Piece {
    board
        .get(from)
        .unwrap_or_else(|| panic!("move generation called on empty square {}", from))
}

/// Quiet destinations of the piece on `from`. Panics if `from` is empty.
pub fn moves_possible(board: &Board, from: Square) -> MoveSet {
    let piece = piece_at(board, from);
    match piece.kind {
        PieceKind::Pawn => pawn_moves(board, from, piece),
        PieceKind::Knight => leaper_moves(board, &KNIGHT_TARGETS[from.index()]),
        PieceKind::King => leaper_moves(board, &KING_TARGETS[from.index()]),
        PieceKind::Bishop => slider_moves(board, from, true, false),
        PieceKind::Rook => slider_moves(board, from, false, true),
        PieceKind::Queen => slider_moves(board, from, true, true),
    }
}

/// Squares the piece on `from` threatens. Allowed only where an enemy stands.
pub fn captures_possible(board: &Board, from: Square) -> MoveSet {
    let piece = piece_at(board, from);
    match piece.kind {
        PieceKind::Pawn => pawn_captures(board, from, piece.color),
        PieceKind::Knight => leaper_captures(board, &KNIGHT_TARGETS[from.index()], piece.color),
        PieceKind::King => leaper_captures(board, &KING_TARGETS[from.index()], piece.color),
        PieceKind::Bishop => slider_captures(board, from, piece.color, true, false),
        PieceKind::Rook => slider_captures(board, from, piece.color, false, true),
        PieceKind::Queen => slider_captures(board, from, piece.color, true, true),
    }
}

/// Quiet moves and captures together, both with their `allowed` flags.
pub fn actions_possible(board: &Board, from: Square) -> MoveSet {
    let mut actions = moves_possible(board, from);
    actions.extend(captures_possible(board, from));
    actions
}

fn pawn_moves(board: &Board, from: Square, pawn: Piece) -> MoveSet {
    let mut moves = MoveSet::new();
    let step = pawn.color.forward();
    if let Some(one) = from.offset(0, step) {
        if board.is_empty(one) {
            moves.push(one, true);
            let double_step_ready = !pawn.has_moved && from.rank() == pawn.color.pawn_rank();
            if double_step_ready {
                if let Some(two) = from.offset(0, 2 * step) {
                    if board.is_empty(two) {
                        moves.push(two, true);
                    }
                }
            }
        }
    }
    moves
}

fn pawn_captures(board: &Board, from: Square, color: Color) -> MoveSet {
    [-1, 1]
        .iter()
        .filter_map(|&df| from.offset(df, color.forward()))
        .map(|sq| Target { square: sq, allowed: board.color_at(sq) == Some(color.opponent()) })
        .collect()
}

fn leaper_moves(board: &Board, targets: &[Square]) -> MoveSet {
    targets
        .iter()
        .filter(|&&sq| board.is_empty(sq))
        .map(|&sq| Target { square: sq, allowed: true })
        .collect()
}

fn leaper_captures(board: &Board, targets: &[Square], color: Color) -> MoveSet {
    targets
        .iter()
        .map(|&sq| Target { square: sq, allowed: board.color_at(sq) == Some(color.opponent()) })
        .collect()
}

fn rays(diagonals: bool, orthogonals: bool) -> impl Iterator<Item = (i8, i8)> {
    DIRECTIONS
        .iter()
        .filter(move |&&(_, _, is_diagonal)| (diagonals && is_diagonal) || (orthogonals && !is_diagonal))
        .map(|&(df, dr, _)| (df, dr))
}

fn slider_moves(board: &Board, from: Square, diagonals: bool, orthogonals: bool) -> MoveSet {
    let mut moves = MoveSet::new();
    for (df, dr) in rays(diagonals, orthogonals) {
        let mut current = from;
        while let Some(next) = current.offset(df, dr) {
            if !board.is_empty(next) { break; }
            moves.push(next, true);
            current = next;
        }
    }
    moves
}

fn slider_captures(board: &Board, from: Square, color: Color, diagonals: bool, orthogonals: bool) -> MoveSet {
    let mut captures = MoveSet::new();
    for (df, dr) in rays(diagonals, orthogonals) {
        let mut current = from;
        while let Some(next) = current.offset(df, dr) {
            match board.get(next) {
                None => captures.push(next, false),
                Some(blocker) if blocker.color == color => {
                    captures.push(next, false);
                    break;
                }
                Some(blocker) => {
                    captures.push(next, true);
                    // The king cannot escape by stepping back along the ray it is attacked on.
                    if blocker.kind == PieceKind::King {
                        if let Some(beyond) = next.offset(df, dr) {
                            captures.push(beyond, false);
                        }
                    }
                    break;
                }
            }
            current = next;
        }
    }
    captures
}
