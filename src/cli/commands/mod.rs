//! Subcommands of the `bandit-ttt` binary

pub mod tournament;
pub mod train;
