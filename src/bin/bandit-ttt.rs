//! bandit-ttt CLI - Self-play training for tic-tac-toe bandit agents
//!
//! This CLI provides:
//! - Training two strategies against each other
//! - Round-robin tournaments across all strategies

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bandit-ttt")]
#[command(version, about = "Self-play bandit agents for tic-tac-toe", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train two agents by self-play
    Train(Box<bandit_ttt::cli::commands::train::TrainArgs>),

    /// Play a round robin across every strategy
    Tournament(bandit_ttt::cli::commands::tournament::TournamentArgs),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => bandit_ttt::cli::commands::train::execute(*args),
        Commands::Tournament(args) => bandit_ttt::cli::commands::tournament::execute(args),
    }
}
