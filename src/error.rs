// src/error.rs
use crate::types::Square;
use std::error::Error;
use std::fmt;
use std::io;

/// Clicks the collaborator should never have let through. The game state is
/// left untouched when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickError {
    GameOver,
    NotYourPiece(Square),
    NotSelectable(Square),
}

impl fmt::Display for ClickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClickError::GameOver => write!(f, "The game is over. Start a new one to keep playing."),
            ClickError::NotYourPiece(sq) => write!(f, "No piece of the side to move on {}", sq),
            ClickError::NotSelectable(sq) => write!(f, "{} is not a legal destination for the selected piece", sq),
        }
    }
}
impl Error for ClickError {}

#[derive(Debug)]
pub enum SaveError {
    Serialization(serde_json::Error),
    Io(String, io::Error),
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::Serialization(e) => write!(f, "Serialization error: {}", e),
            SaveError::Io(file, e) => write!(f, "I/O error with file '{}': {}", file, e),
        }
    }
}
impl Error for SaveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SaveError::Serialization(e) => Some(e),
            SaveError::Io(_, e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for SaveError {
    fn from(e: serde_json::Error) -> Self { SaveError::Serialization(e) }
}
