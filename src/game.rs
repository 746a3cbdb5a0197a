// src/game.rs
use crate::board::Board;
use crate::movegen::MoveSet;
use crate::types::{Color, PieceKind, Square};
use serde::Serialize;

pub const INITIAL_PIECES: u8 = 16;

// Where a player is in the two-click protocol.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ClickPhase {
    #[default]
    AwaitingFirstClick,
    AwaitingSecondClick { from: Square, targets: MoveSet },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub color: Color,
    pub phase: ClickPhase,
    pub pieces: u8,
    pub check: bool,
    pub checkmate: bool,
}

impl Player {
    pub fn new(color: Color) -> Self {
        Player {
            color,
            phase: ClickPhase::AwaitingFirstClick,
            pieces: INITIAL_PIECES,
            check: false,
            checkmate: false,
        }
    }

    pub fn selection(&self) -> Option<(Square, &MoveSet)> {
        match &self.phase {
            ClickPhase::AwaitingSecondClick { from, targets } => Some((*from, targets)),
            ClickPhase::AwaitingFirstClick => None,
        }
    }
}

// Lives for exactly one reply after a pawn double step.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct EnPassantWindow {
    // The square the double-stepping pawn passed over.
    pub capture_square: Square,
    // Where that pawn stands now.
    pub pawn_square: Square,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub player: Color,
    pub piece: PieceKind,
    pub from: Square,
    pub to: Square,
    pub captured: Option<PieceKind>,
    pub en_passant: bool,
    pub castled: bool,
    pub promoted: bool,
    pub gives_check: bool,
    pub gives_checkmate: bool,
}

impl MoveRecord {
    pub fn to_algebraic_string(&self) -> String {
        if self.castled {
            return if self.to.file() > self.from.file() { "O-O" } else { "O-O-O" }.to_string();
        }
        let annotation = if self.gives_checkmate { "#" } else if self.gives_check { "+" } else { "" };
        format!(
            "{}{}{}{}",
            self.from,
            if self.captured.is_some() { "x" } else { "-" },
            self.to,
            if self.promoted { "=Q" } else { "" },
        ) + annotation
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Check(Color),
    Checkmate { winner: Color, loser: Color },
    Stalemate,
}

impl GameStatus {
    pub fn is_over(&self) -> bool {
        matches!(self, GameStatus::Checkmate { .. } | GameStatus::Stalemate)
    }
}

// The whole live game. Created once per game and replaced wholesale on reset.
#[derive(Debug, Clone)]
pub struct GameState {
    pub board: Board,
    players: [Player; 2],
    active: Color,
    pub en_passant: Option<EnPassantWindow>,
    pub history: Vec<MoveRecord>,
    pub(crate) stalemate: bool,
}

impl Default for GameState {
    fn default() -> Self { GameState::new() }
}

impl GameState {
    pub fn new() -> Self {
        GameState::with_board(Board::standard(), Color::White)
    }

    // Starts a game from an arbitrary position. Piece counters follow the board.
    pub fn with_board(board: Board, to_move: Color) -> Self {
        let mut players = [Player::new(Color::White), Player::new(Color::Black)];
        for player in players.iter_mut() {
            player.pieces = board.count(player.color) as u8;
        }
        GameState { board, players, active: to_move, en_passant: None, history: Vec::new(), stalemate: false }
    }

    // Discards everything and lays out the starting position again.
    pub fn reset(&mut self) {
        *self = GameState::new();
        log::debug!("game reset");
    }

    pub fn active_color(&self) -> Color { self.active }

    pub fn player(&self, color: Color) -> &Player { &self.players[color.index()] }
    pub fn player_mut(&mut self, color: Color) -> &mut Player { &mut self.players[color.index()] }

    pub fn active_player(&self) -> &Player { self.player(self.active) }
    pub fn active_player_mut(&mut self) -> &mut Player { self.player_mut(self.active) }
    pub fn inactive_player(&self) -> &Player { self.player(self.active.opponent()) }
    pub fn inactive_player_mut(&mut self) -> &mut Player { self.player_mut(self.active.opponent()) }

    pub fn players(&self) -> &[Player; 2] { &self.players }

    pub fn switch_players(&mut self) {
        self.active = self.active.opponent();
    }

    pub fn status(&self) -> GameStatus {
        for player in &self.players {
            if player.checkmate {
                return GameStatus::Checkmate { winner: player.color.opponent(), loser: player.color };
            }
        }
        if self.stalemate {
            return GameStatus::Stalemate;
        }
        match self.players.iter().find(|p| p.check) {
            Some(player) => GameStatus::Check(player.color),
            None => GameStatus::Ongoing,
        }
    }

    pub fn is_over(&self) -> bool { self.status().is_over() }

    // Squares of every piece the active player may pick up.
    pub fn selectable_pieces(&self) -> Vec<Square> {
        if self.is_over() {
            return Vec::new();
        }
        self.board.pieces_of(self.active).map(|(sq, _)| sq).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_game_starts_with_white_to_move() {
        let game = GameState::new();
        assert_eq!(game.active_color(), Color::White);
        assert_eq!(game.active_player().pieces, 16);
        assert_eq!(game.inactive_player().color, Color::Black);
        assert_eq!(game.selectable_pieces().len(), 16);
        assert_eq!(game.status(), GameStatus::Ongoing);
    }

    #[test]
    fn switching_keeps_players_a_permutation() {
        let mut game = GameState::new();
        game.switch_players();
        assert_eq!(game.active_player().color, Color::Black);
        assert_eq!(game.inactive_player().color, Color::White);
        game.switch_players();
        assert_eq!(game.active_player().color, Color::White);
    }

    #[test]
    fn reset_discards_state() {
        let mut game = GameState::new();
        game.player_mut(Color::Black).pieces = 3;
        game.player_mut(Color::Black).checkmate = true;
        game.switch_players();
        game.reset();
        assert_eq!(game.active_color(), Color::White);
        assert_eq!(game.player(Color::Black).pieces, 16);
        assert_eq!(game.status(), GameStatus::Ongoing);
        assert!(game.history.is_empty());
    }

    #[test]
    fn checkmate_status_names_the_winner() {
        let mut game = GameState::new();
        game.player_mut(Color::Black).checkmate = true;
        assert_eq!(game.status(), GameStatus::Checkmate { winner: Color::White, loser: Color::Black });
        assert!(game.selectable_pieces().is_empty());
    }

    #[test]
    fn castle_records_use_castling_notation() {
        let record = MoveRecord {
            player: Color::White,
            piece: PieceKind::King,
            from: "e1".parse().unwrap(),
            to: "g1".parse().unwrap(),
            captured: None,
            en_passant: false,
            castled: true,
            promoted: false,
            gives_check: false,
            gives_checkmate: false,
        };
        assert_eq!(record.to_algebraic_string(), "O-O");
    }
}
