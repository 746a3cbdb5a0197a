// src/snapshot.rs
use crate::error::SaveError;
use crate::game::{EnPassantWindow, GameState, GameStatus, MoveRecord};
use crate::types::{Color, Square};
use serde::Serialize;
use std::fs;

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct PlayerStatus {
    pub color: Color,
    pub pieces: u8,
    pub check: bool,
    pub checkmate: bool,
}

/// What the presentation layer needs to redraw after a click.
#[derive(Debug, Serialize, Clone)]
pub struct Snapshot {
    pub to_move: Color,
    /// Rank 8 first, `.` for empty squares, upper case for White.
    pub board: Vec<String>,
    pub players: Vec<PlayerStatus>,
    pub status: GameStatus,
    pub en_passant: Option<EnPassantWindow>,
    pub selected: Option<Square>,
    pub selectable: Vec<Square>,
    pub moves: Vec<MoveRecord>,
}

impl Snapshot {
    pub fn of(state: &GameState) -> Self {
        let board = (0..8u8)
            .rev()
            .map(|rank| {
                (0..8u8)
                    .map(|file| state.board.get(Square::new(file, rank)).map_or('.', |p| p.symbol()))
                    .collect()
            })
            .collect();

        let players = state
            .players()
            .iter()
            .map(|p| PlayerStatus { color: p.color, pieces: p.pieces, check: p.check, checkmate: p.checkmate })
            .collect();

        let (selected, selectable) = match state.active_player().selection() {
            Some((from, targets)) => {
                let mut squares = vec![from];
                squares.extend(targets.allowed());
                (Some(from), squares)
            }
            None => (None, state.selectable_pieces()),
        };

        Snapshot {
            to_move: state.active_color(),
            board,
            players,
            status: state.status(),
            en_passant: state.en_passant,
            selected,
            selectable,
            moves: state.history.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save_to_file(&self, filename: &str) -> Result<(), SaveError> {
        let json_data = self.to_json()?;
        fs::write(filename, json_data).map_err(|e| SaveError::Io(filename.to_string(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_of_new_game() {
        let snapshot = Snapshot::of(&GameState::new());
        assert_eq!(snapshot.board[0], "rnbqkbnr");
        assert_eq!(snapshot.board[7], "RNBQKBNR");
        assert_eq!(snapshot.selectable.len(), 16);
        assert!(snapshot.selected.is_none());
        assert_eq!(snapshot.players[1].pieces, 16);
    }

    #[test]
    fn snapshot_serialises_to_json() {
        let json = Snapshot::of(&GameState::new()).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["to_move"], "White");
        assert_eq!(value["status"], "Ongoing");
        assert_eq!(value["players"][0]["check"], false);
    }
}
