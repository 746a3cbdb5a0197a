// src/config.rs
use crate::error::SaveError;
use serde::{Deserialize, Serialize};
use std::fs;

pub const DEFAULT_SNAPSHOT_FILENAME: &str = "chess_snapshot.json";

/// Terminal front-end settings. Missing fields fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where `save` writes the JSON snapshot when no file name is given.
    pub snapshot_file: String,
    /// Print file letters and rank numbers around the board.
    pub show_coordinates: bool,
    /// Mark selectable squares with `*` when drawing the board.
    pub mark_selectable: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            snapshot_file: DEFAULT_SNAPSHOT_FILENAME.to_string(),
            show_coordinates: true,
            mark_selectable: true,
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self, SaveError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(filename: &str) -> Result<Self, SaveError> {
        let json = fs::read_to_string(filename).map_err(|e| SaveError::Io(filename.to_string(), e))?;
        Config::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = Config::from_json(r#"{ "mark_selectable": false }"#).unwrap();
        assert!(!config.mark_selectable);
        assert!(config.show_coordinates);
        assert_eq!(config.snapshot_file, DEFAULT_SNAPSHOT_FILENAME);
    }

    #[test]
    fn malformed_config_is_an_error() {
        assert!(matches!(Config::from_json("{ nope"), Err(SaveError::Serialization(_))));
    }

    #[test]
    fn missing_file_reports_its_name() {
        match Config::load("definitely/not/here.json") {
            Err(SaveError::Io(name, _)) => assert_eq!(name, "definitely/not/here.json"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
