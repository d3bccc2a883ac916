//! Tic-Tac-Toe game engine

pub mod board;
pub mod game;
pub mod lines;

pub use board::{Board, Cell, MoveStatus, Mover, Player};
pub use game::{GameRecord, MoveRecord, Outcome, TerminalResult};
pub use lines::{Lane, Line, LineAnalyzer, SCAN_ORDER};
