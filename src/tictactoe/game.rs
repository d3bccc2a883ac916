//! Game outcomes and move transcripts

use serde::{Deserialize, Serialize};

use super::{board::Player, lines::Line};
use crate::types::Position;

/// Outcome of evaluating a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Undecided,
    Draw,
    Win(Player),
}

impl Outcome {
    pub fn is_decided(self) -> bool {
        !matches!(self, Outcome::Undecided)
    }

    /// Swap the winner perspective (0 <-> 1).
    pub fn swap_players(self) -> Self {
        match self {
            Outcome::Win(player) => Outcome::Win(player.opponent()),
            other => other,
        }
    }
}

/// `(outcome, cause)` pair produced by [`Board::result`](super::Board::result).
///
/// `cause` is the closing line for a win and `None` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TerminalResult {
    pub outcome: Outcome,
    pub cause: Option<Line>,
}

impl TerminalResult {
    pub fn is_decided(&self) -> bool {
        self.outcome.is_decided()
    }

    /// Relabel the winner, keeping the cause.
    pub fn swap_players(self) -> Self {
        TerminalResult {
            outcome: self.outcome.swap_players(),
            cause: self.cause,
        }
    }
}

/// A move in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveRecord {
    pub player: Player,
    pub position: Position,
}

/// A finished game as seen by a referee
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub starter: Player,
    pub moves: Vec<MoveRecord>,
    pub result: TerminalResult,
}
