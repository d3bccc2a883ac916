//! Tic-tac-toe self-play with per-state bandit agents
//!
//! This crate provides:
//! - A 3x3 board engine with turn enforcement, termination detection and
//!   base-3 canonical state keys
//! - Agents that learn a move-selection policy from terminal rewards alone
//! - Six interchangeable strategies, from uniform random play to Thompson
//!   sampling with a win/block lookahead
//! - An arena for self-play between two agents, and a CLI on top of it

pub mod agents;
pub mod arena;
pub mod cli;
pub mod config;
pub mod error;
pub mod tictactoe;
pub mod types;
pub mod utils;

pub use agents::{Agent, AgentBuilder, BetaPrior, StrategyKind};
pub use arena::{Arena, ArenaResults};
pub use error::{Error, Result};
pub use tictactoe::{Board, MoveStatus, Mover, Outcome, Player, TerminalResult};
pub use types::{Position, StateKey};
