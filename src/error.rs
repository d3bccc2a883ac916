//! Error types for the bandit-ttt crate

use thiserror::Error;

use crate::tictactoe::Player;

/// Main error type for the bandit-ttt crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("cell ({row}, {col}) is out of bounds (row and column must be 0-2)")]
    OutOfBounds { row: usize, col: usize },

    #[error("position {position} is out of bounds (must be 0-8)")]
    InvalidPosition { position: usize },

    #[error("invalid player {index} (expected 0 or 1)")]
    InvalidPlayer { index: u8 },

    #[error("it is not player {attempted}'s turn (player {expected} is due to move)")]
    TurnViolation { expected: Player, attempted: Player },

    #[error("game already over")]
    GameOver,

    #[error("no valid moves available in state '{key}'")]
    NoValidMoves { key: String },

    #[error("state key must have {expected} cells, got {got} in '{context}'")]
    InvalidKeyLength {
        expected: usize,
        got: usize,
        context: String,
    },

    #[error("invalid character '{character}' at position {position} in state key '{context}'")]
    InvalidKeyCharacter {
        character: char,
        position: usize,
        context: String,
    },

    #[error("internal consistency error: action {action} is not available in state '{key}'")]
    UnknownAction { key: String, action: usize },

    #[error("internal consistency error: state '{key}' holds a {found} model but {strategy} expects a {expected} model")]
    ModelMismatch {
        key: String,
        strategy: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("internal consistency error: visited state '{key}' has no knowledge entry")]
    MissingKnowledge { key: String },

    #[error("agent '{agent}' fell out of sync with the referee: {context}")]
    AgentDesync { agent: String, context: String },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;
