//! Tournament command - Round robin across every strategy

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    agents::StrategyKind,
    arena::{Arena, ArenaResults},
    cli::output::{create_games_progress, format_number, format_rate, print_section},
    config::{AgentConfig, ArenaConfig},
};

#[derive(Parser, Debug)]
#[command(about = "Play every ordered pair of distinct strategies")]
pub struct TournamentArgs {
    /// Number of games per matchup
    #[arg(long, short = 'g', default_value_t = 500)]
    pub games: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Hide the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}

/// One finished matchup.
#[derive(Debug, Clone)]
pub struct Matchup {
    pub first: StrategyKind,
    pub second: StrategyKind,
    pub results: ArenaResults,
}

/// Every ordered pair of distinct strategies, in declaration order.
pub fn pairings() -> Vec<(StrategyKind, StrategyKind)> {
    let mut pairs = Vec::new();
    for first in StrategyKind::ALL {
        for second in StrategyKind::ALL {
            if first != second {
                pairs.push((first, second));
            }
        }
    }
    pairs
}

/// Run the round robin. Matchup `i` derives its seeds from `seed + 2 * i`.
pub fn run_tournament<F>(games: usize, seed: Option<u64>, mut on_game: F) -> Result<Vec<Matchup>>
where
    F: FnMut(),
{
    let mut matchups = Vec::new();
    for (index, (first, second)) in pairings().into_iter().enumerate() {
        let mut config =
            ArenaConfig::new(games, AgentConfig::new(first), AgentConfig::new(second));
        if let Some(seed) = seed {
            config = config.with_seed(seed.wrapping_add(2 * index as u64));
        }

        let mut arena = Arena::from_config(&config)?;
        arena
            .run_with(games, |_, _| on_game())
            .with_context(|| format!("{first} vs {second}"))?;
        matchups.push(Matchup {
            first,
            second,
            results: arena.results().clone(),
        });
    }
    Ok(matchups)
}

pub fn execute(args: TournamentArgs) -> Result<()> {
    let pairs = pairings().len();
    println!(
        "Round robin: {} matchups x {} games",
        pairs,
        format_number(args.games)
    );

    let progress = (!args.no_progress).then(|| create_games_progress((pairs * args.games) as u64));
    let matchups = run_tournament(args.games, args.seed, || {
        if let Some(pb) = &progress {
            pb.inc(1);
        }
    })?;
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    print_section("Head-to-Head Results");
    println!("(W-D-L from the first agent's perspective)");
    println!();
    for matchup in &matchups {
        let r = &matchup.results;
        println!(
            "{:>22} vs {:<22} | {}-{}-{} ({} wins)",
            matchup.first.name(),
            matchup.second.name(),
            r.first_wins,
            r.draws,
            r.second_wins,
            format_rate(r.first_win_rate())
        );
    }

    print_section("Overall");
    for kind in StrategyKind::ALL {
        let (mut wins, mut draws, mut losses) = (0, 0, 0);
        for m in &matchups {
            if m.first == kind {
                wins += m.results.first_wins;
                losses += m.results.second_wins;
                draws += m.results.draws;
            } else if m.second == kind {
                wins += m.results.second_wins;
                losses += m.results.first_wins;
                draws += m.results.draws;
            }
        }
        println!("{:>22} | {}-{}-{}", kind.name(), wins, draws, losses);
    }

    Ok(())
}
