use std::io;

use thiserror::Error;

/// Errors surfaced by game session operations.
#[derive(Debug, Error)]
pub enum GameError {
    /// `start` was called without a player name.
    #[error("player name must not be empty")]
    EmptyPlayerName,

    #[error(transparent)]
    Spawn(#[from] SpawnError),
}

/// Food placement failures.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum SpawnError {
    /// No free cell could be found for a food item.
    #[error("cannot place food: {free_cells} free cells left after {attempts} attempts")]
    DegenerateSpawn { free_cells: usize, attempts: usize },
}

/// Results persistence failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("results file I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("results file is malformed: {0}")]
    Format(#[from] serde_json::Error),
}

/// Settings loading and validation failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },

    #[error("settings file I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("settings file is malformed: {0}")]
    Format(#[from] serde_json::Error),
}
