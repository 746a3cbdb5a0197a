// src/lib.rs
// Two-player chess rules driven by square clicks: the caller owns a GameState
// and feeds it clicked squares through handle_click.

pub mod attacks;
pub mod board;
pub mod castling;
pub mod check;
pub mod config;
pub mod error;
pub mod game;
pub mod handler;
pub mod movegen;
pub mod snapshot;
pub mod types;

pub use board::Board;
pub use config::Config;
pub use error::{ClickError, SaveError};
pub use game::{ClickPhase, EnPassantWindow, GameState, GameStatus, MoveRecord, Player};
pub use handler::{handle_click, legal_targets, ClickOutcome};
pub use movegen::{MoveSet, Target};
pub use snapshot::Snapshot;
pub use types::{Color, Piece, PieceKind, Square};
