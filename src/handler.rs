// src/handler.rs
// --- Two-click move protocol ---
// The first click on a friendly piece computes its legal destinations; the
// second click either cancels (same square) or plays the move. Legality
// probes always run on a scratch copy of the board, so nothing a probe does
// can leak into the visible game.

use crate::attacks::{find_attacked_spots, is_checked};
use crate::board::Board;
use crate::castling::{castling_possible, rook_relocation};
use crate::check::resolve_after_move;
use crate::error::ClickError;
use crate::game::{ClickPhase, EnPassantWindow, GameState, MoveRecord};
use crate::movegen::{actions_possible, MoveSet};
use crate::types::{Piece, PieceKind, Square};

// What the collaborator should show after a click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    // A piece was picked up. `selectable` is the piece's own square plus its
    // legal destinations.
    Selected { from: Square, targets: MoveSet, selectable: Vec<Square> },
    // The selection was dropped; every piece of the side to move is selectable again.
    Cancelled { selectable: Vec<Square> },
    // A move was played. `selectable` holds the new side's pieces, or nothing
    // once the game is over.
    Moved { record: MoveRecord, selectable: Vec<Square> },
}

impl ClickOutcome {
    pub fn selectable(&self) -> &[Square] {
        match self {
            ClickOutcome::Selected { selectable, .. }
            | ClickOutcome::Cancelled { selectable }
            | ClickOutcome::Moved { selectable, .. } => selectable,
        }
    }
}

// Board-level effects of one move, before counters and flags are updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Applied {
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub en_passant: bool,
    pub castled_rook: Option<(Square, Square)>,
    pub promoted: bool,
    // Window armed by a pawn double step, if this move was one.
    pub window: Option<EnPassantWindow>,
}

// Plays `from -> to` on `board`, honouring the en passant window that was live
// before the move. Returns `None` if `from` is empty.
pub fn apply_to_board(board: &mut Board, en_passant: Option<EnPassantWindow>, from: Square, to: Square) -> Option<Applied> {
    let moving = board.take(from)?;
    let mut piece = moving;
    let mut applied = Applied {
        piece: moving,
        captured: None,
        en_passant: false,
        castled_rook: None,
        promoted: false,
        window: None,
    };

    if piece.kind == PieceKind::Pawn {
        if let Some(window) = en_passant {
            let passed_pawn_is_enemy = board.color_at(window.pawn_square) == Some(piece.color.opponent());
            if to == window.capture_square && board.is_empty(to) && passed_pawn_is_enemy {
                applied.captured = board.take(window.pawn_square);
                applied.en_passant = true;
            }
        }
        if from.rank().abs_diff(to.rank()) == 2 {
            applied.window = Some(EnPassantWindow {
                capture_square: Square::new(from.file(), (from.rank() + to.rank()) / 2),
                pawn_square: to,
            });
        }
    }

    if piece.kind == PieceKind::King && from.file().abs_diff(to.file()) == 2 {
        let (rook_from, rook_to) = rook_relocation(from, to.file() as i8 - from.file() as i8);
        match board.take(rook_from) {
            Some(mut rook) => {
                rook.has_moved = true;
                board.place(rook_to, rook);
                applied.castled_rook = Some((rook_from, rook_to));
            }
            None => log::warn!("castling {} -> {} found no rook on {}", from, to, rook_from),
        }
    }

    piece.has_moved = true;

    if let Some(victim) = board.take(to) {
        if applied.captured.is_some() {
            log::warn!("en passant onto occupied square {}", to);
        }
        applied.captured = Some(victim);
    }

    if piece.kind == PieceKind::Pawn && to.rank() == piece.color.promotion_rank() {
        piece = Piece { kind: PieceKind::Queen, color: piece.color, has_moved: true };
        applied.promoted = true;
    }

    board.place(to, piece);
    Some(applied)
}

// True if playing `from -> to` would leave the mover's own king attacked.
// Runs on a copy; `board` is never modified.
pub fn leaves_king_in_check(board: &Board, en_passant: Option<EnPassantWindow>, from: Square, to: Square) -> bool {
    let Some(piece) = board.get(from) else {
        return false;
    };
    let mut scratch = board.clone();
    apply_to_board(&mut scratch, en_passant, from, to);
    is_checked(&scratch, piece.color)
}

// The en passant destination available to the pawn on `from`, if any.
pub fn en_passant_target(window: Option<EnPassantWindow>, board: &Board, from: Square) -> Option<Square> {
    let window = window?;
    let pawn = board.get(from).filter(|p| p.kind == PieceKind::Pawn)?;
    if board.color_at(window.pawn_square) != Some(pawn.color.opponent()) {
        return None;
    }
    if from.rank() != window.pawn_square.rank() || from.file().abs_diff(window.pawn_square.file()) != 1 {
        return None;
    }
    let df = window.pawn_square.file() as i8 - from.file() as i8;
    from.offset(df, pawn.color.forward()).filter(|&sq| sq == window.capture_square)
}

// Every destination of the piece on `from`. Entries that would leave the
// mover's king in check stay in the set with `allowed = false`.
pub fn legal_targets(state: &GameState, from: Square) -> MoveSet {
    let board = &state.board;
    let Some(piece) = board.get(from) else {
        return MoveSet::new();
    };

    let mut targets = actions_possible(board, from);
    targets.retain_allowed();

    match piece.kind {
        PieceKind::King => {
            for sq in find_attacked_spots(board, piece.color) {
                targets.disallow(sq);
            }
            for dest in castling_possible(board, piece.color).destinations(from) {
                targets.push(dest, true);
            }
        }
        PieceKind::Pawn => {
            if let Some(dest) = en_passant_target(state.en_passant, board, from) {
                targets.push(dest, true);
            }
        }
        _ => {}
    }

    for to in targets.allowed() {
        if leaves_king_in_check(board, state.en_passant, from, to) {
            targets.disallow(to);
        }
    }
    targets
}

// Single entry point for the collaborator: routes the click by the active
// player's phase.
pub fn handle_click(state: &mut GameState, sq: Square) -> Result<ClickOutcome, ClickError> {
    if state.is_over() {
        return Err(ClickError::GameOver);
    }
    match state.active_player().phase.clone() {
        ClickPhase::AwaitingFirstClick => handle_first_click(state, sq),
        ClickPhase::AwaitingSecondClick { from, targets } => handle_second_click(state, from, &targets, sq),
    }
}

pub fn handle_first_click(state: &mut GameState, sq: Square) -> Result<ClickOutcome, ClickError> {
    if state.board.color_at(sq) != Some(state.active_color()) {
        return Err(ClickError::NotYourPiece(sq));
    }
    let targets = legal_targets(state, sq);
    let mut selectable = vec![sq];
    selectable.extend(targets.allowed());
    log::debug!("{:?} selected {} ({} legal destinations)", state.active_color(), sq, selectable.len() - 1);

    state.active_player_mut().phase = ClickPhase::AwaitingSecondClick { from: sq, targets: targets.clone() };
    Ok(ClickOutcome::Selected { from: sq, targets, selectable })
}

fn handle_second_click(state: &mut GameState, from: Square, targets: &MoveSet, sq: Square) -> Result<ClickOutcome, ClickError> {
    if sq == from {
        state.active_player_mut().phase = ClickPhase::AwaitingFirstClick;
        return Ok(ClickOutcome::Cancelled { selectable: state.selectable_pieces() });
    }
    if !targets.is_allowed(sq) {
        return Err(ClickError::NotSelectable(sq));
    }
    let record = make_move(state, from, sq)?;
    Ok(ClickOutcome::Moved { record, selectable: state.selectable_pieces() })
}

// Commits `from -> to` for the side to move, resolves check and checkmate
// for both sides and hands the turn over. Legality is the caller's job.
pub fn make_move(state: &mut GameState, from: Square, to: Square) -> Result<MoveRecord, ClickError> {
    let mover = state.active_color();
    if state.board.color_at(from) != Some(mover) {
        return Err(ClickError::NotYourPiece(from));
    }

    // The previous window only ever covers this one reply.
    let window = state.en_passant.take();
    let applied = apply_to_board(&mut state.board, window, from, to).ok_or(ClickError::NotYourPiece(from))?;
    state.en_passant = applied.window;
    state.active_player_mut().phase = ClickPhase::AwaitingFirstClick;

    if applied.captured.is_some() {
        let opponent = state.inactive_player_mut();
        opponent.pieces = opponent.pieces.saturating_sub(1);
    }

    resolve_after_move(state);

    let defender = state.inactive_player();
    let record = MoveRecord {
        player: mover,
        piece: applied.piece.kind,
        from,
        to,
        captured: applied.captured.map(|p| p.kind),
        en_passant: applied.en_passant,
        castled: applied.castled_rook.is_some(),
        promoted: applied.promoted,
        gives_check: defender.check,
        gives_checkmate: defender.checkmate,
    };
    log::debug!("{:?} played {}", mover, record.to_algebraic_string());

    state.history.push(record.clone());
    state.switch_players();
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Color;

    fn sq(name: &str) -> Square { name.parse().unwrap() }

    fn click(state: &mut GameState, name: &str) -> ClickOutcome {
        handle_click(state, sq(name)).unwrap()
    }

    #[test]
    fn first_click_highlights_piece_and_destinations() {
        let mut game = GameState::new();
        let outcome = click(&mut game, "g1");
        assert_eq!(outcome.selectable(), &[sq("g1"), sq("h3"), sq("f3")]);
        assert!(matches!(game.active_player().phase, ClickPhase::AwaitingSecondClick { .. }));
    }

    #[test]
    fn clicking_the_same_square_cancels() {
        let mut game = GameState::new();
        click(&mut game, "e2");
        let outcome = click(&mut game, "e2");
        assert!(matches!(outcome, ClickOutcome::Cancelled { .. }));
        assert_eq!(outcome.selectable().len(), 16);
        assert_eq!(game.active_player().phase, ClickPhase::AwaitingFirstClick);
        assert_eq!(game.active_color(), Color::White);
    }

    #[test]
    fn clicks_outside_the_protocol_are_rejected_without_side_effects() {
        let mut game = GameState::new();
        assert_eq!(handle_click(&mut game, sq("e7")), Err(ClickError::NotYourPiece(sq("e7"))));
        assert_eq!(handle_click(&mut game, sq("e4")), Err(ClickError::NotYourPiece(sq("e4"))));
        click(&mut game, "e2");
        assert_eq!(handle_click(&mut game, sq("e5")), Err(ClickError::NotSelectable(sq("e5"))));
        assert_eq!(game.board, Board::standard());
        assert!(game.active_player().selection().is_some());
    }

    #[test]
    fn second_click_moves_and_passes_the_turn() {
        let mut game = GameState::new();
        click(&mut game, "e2");
        let outcome = click(&mut game, "e4");
        let ClickOutcome::Moved { record, selectable } = outcome else {
            panic!("expected a move");
        };
        assert_eq!((record.from, record.to), (sq("e2"), sq("e4")));
        assert_eq!(selectable.len(), 16);
        assert!(selectable.contains(&sq("e7")));
        assert_eq!(game.active_color(), Color::Black);
        assert!(game.board.is_empty(sq("e2")));
        assert!(game.board.get(sq("e4")).is_some_and(|p| p.has_moved));
        assert_eq!(
            game.en_passant,
            Some(EnPassantWindow { capture_square: sq("e3"), pawn_square: sq("e4") })
        );
    }

    #[test]
    fn probe_never_touches_the_real_board() {
        let board = Board::standard();
        let copy = board.clone();
        assert!(!leaves_king_in_check(&board, None, sq("e2"), sq("e4")));
        assert_eq!(board, copy);
    }

    #[test]
    fn capture_decrements_the_victims_counter() {
        let board = Board::from_rows([
            "....k...",
            "........",
            "........",
            "...p....",
            "....P...",
            "........",
            "........",
            "....K...",
        ]);
        let mut game = GameState::with_board(board, Color::White);
        assert_eq!(game.player(Color::Black).pieces, 2);
        click(&mut game, "e4");
        let ClickOutcome::Moved { record, .. } = click(&mut game, "d5") else {
            panic!("expected a move");
        };
        assert_eq!(record.captured, Some(PieceKind::Pawn));
        assert_eq!(game.player(Color::Black).pieces, 1);
        assert_eq!(game.board.count(Color::Black), 1);
    }
}
