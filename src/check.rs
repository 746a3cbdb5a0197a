// src/check.rs
// --- Check versus checkmate ---
// Capture and block escapes only make sense against a single attacker;
// double check leaves the king move alone.

use crate::attacks::{attackers, calculate_attackers_number, find_attacked_spots, is_checked};
use crate::game::GameState;
use crate::handler::{legal_targets, leaves_king_in_check};
use crate::movegen::actions_possible;
use crate::types::{Color, PieceKind, Square};

// Outcome of the three escape tests for a side that is in check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscapeAnalysis {
    pub attackers_number: usize,
    pub capture: bool,
    pub block: bool,
    pub king_move: bool,
}

impl EscapeAnalysis {
    pub fn is_checkmate(&self) -> bool {
        !self.capture && !self.block && !self.king_move
    }
}

// Can some piece of `defender` legally take the piece on `attacker_sq`?
pub fn capture_escape_possible(state: &GameState, defender: Color, attacker_sq: Square) -> bool {
    // A checking pawn that just double-stepped can also be taken en passant.
    let en_passant_square = state
        .en_passant
        .filter(|w| w.pawn_square == attacker_sq)
        .map(|w| w.capture_square);

    state.board.pieces_of(defender).any(|(from, piece)| {
        let targets = legal_targets(state, from);
        targets.is_allowed(attacker_sq)
            || (piece.kind == PieceKind::Pawn && en_passant_square.is_some_and(|sq| targets.is_allowed(sq)))
    })
}

// Squares strictly between the king of `defender` and a sliding attacker.
// Empty when the attacker is not a slider or stands next to the king.
pub fn blocking_squares(state: &GameState, defender: Color, attacker_sq: Square) -> Vec<Square> {
    let board = &state.board;
    let slider = board.get(attacker_sq).is_some_and(|p| p.kind.is_slider());
    let Some(king_sq) = board.find_king(defender) else {
        return Vec::new();
    };
    if !slider || king_sq.distance(attacker_sq) <= 1 {
        return Vec::new();
    }

    let df = (attacker_sq.file() as i8 - king_sq.file() as i8).signum();
    let dr = (attacker_sq.rank() as i8 - king_sq.rank() as i8).signum();
    let mut line = Vec::new();
    let mut current = king_sq;
    while let Some(next) = current.offset(df, dr) {
        if next == attacker_sq { break; }
        line.push(next);
        current = next;
    }
    line
}

// Can a non-king piece of `defender` legally step onto the attacker's line?
pub fn block_escape_possible(state: &GameState, defender: Color, attacker_sq: Square) -> bool {
    let line = blocking_squares(state, defender, attacker_sq);
    if line.is_empty() {
        return false;
    }
    state
        .board
        .pieces_of(defender)
        .filter(|(_, p)| p.kind != PieceKind::King)
        .any(|(from, _)| {
            let targets = legal_targets(state, from);
            line.iter().any(|&sq| targets.is_allowed(sq))
        })
}

// Does the king of `defender` have a square to step to?
pub fn king_move_escape_possible(state: &GameState, defender: Color) -> bool {
    let board = &state.board;
    let Some(king_sq) = board.find_king(defender) else {
        return false;
    };
    let attacked = find_attacked_spots(board, defender);
    let mut actions = actions_possible(board, king_sq);
    actions.retain_allowed();
    actions
        .allowed()
        .into_iter()
        .filter(|sq| !attacked.contains(sq))
        .any(|to| !leaves_king_in_check(board, state.en_passant, king_sq, to))
}

// Runs all three escape tests. `None` if `defender` is not in check.
pub fn analyze_check(state: &GameState, defender: Color) -> Option<EscapeAnalysis> {
    if !is_checked(&state.board, defender) {
        return None;
    }
    let attackers_number = calculate_attackers_number(&state.board, defender);
    let attacker_sq = attackers(&state.board, defender).first().copied();

    let capture = attacker_sq.is_some_and(|a| capture_escape_possible(state, defender, a));
    let block = attacker_sq.is_some_and(|a| block_escape_possible(state, defender, a));
    let king_move = king_move_escape_possible(state, defender);

    let single_attacker = attackers_number == 1;
    Some(EscapeAnalysis {
        attackers_number,
        capture: single_attacker && capture,
        block: single_attacker && block,
        king_move,
    })
}

pub fn has_legal_move(state: &GameState, color: Color) -> bool {
    state
        .board
        .pieces_of(color)
        .any(|(from, _)| !legal_targets(state, from).allowed().is_empty())
}

// Updates check, checkmate and stalemate flags after the side to move has
// played, before the turn passes.
pub fn resolve_after_move(state: &mut GameState) {
    let mover = state.active_color();
    let defender = mover.opponent();

    match analyze_check(state, defender) {
        Some(analysis) if analysis.is_checkmate() => {
            log::info!("{:?} is checkmated ({} attacker(s))", defender, analysis.attackers_number);
            let player = state.player_mut(defender);
            player.checkmate = true;
            player.check = false;
        }
        Some(analysis) => {
            log::info!("{:?} is in check ({:?})", defender, analysis);
            state.player_mut(defender).check = true;
        }
        None => {
            state.player_mut(defender).check = false;
            if !has_legal_move(state, defender) {
                log::info!("{:?} has no legal move: stalemate", defender);
                state.stalemate = true;
            }
        }
    }

    state.player_mut(mover).check = false;
    if is_checked(&state.board, mover) {
        log::warn!("{:?} finished a move with its own king attacked", mover);
        state.player_mut(mover).checkmate = true;
    }
}
