//! Train command - Pit two strategies against each other and report the tallies

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    agents::{Agent, AgentStats, BetaPrior, StateEvaluation, StrategyKind},
    arena::{Arena, ArenaResults},
    cli::output::{
        create_games_progress, format_number, format_rate, print_kv, print_section,
        print_subsection,
    },
    config::{AgentConfig, ArenaConfig},
    types::StateKey,
};

#[derive(Debug, Serialize)]
struct AgentSummary {
    strategy: StrategyKind,
    stats: AgentStats,
    evaluations: Vec<StateEvaluation>,
}

#[derive(Debug, Serialize)]
struct TrainingSummaryFile {
    config: ArenaConfig,
    results: ArenaResults,
    first: AgentSummary,
    second: AgentSummary,
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Trailing separator or no file name: treat as a directory.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train two agents by self-play", allow_negative_numbers = true)]
pub struct TrainArgs {
    /// Strategy for the first agent (player 0 seat)
    #[arg(long, value_enum, default_value_t = StrategyKind::ThompsonBandit)]
    pub first: StrategyKind,

    /// Strategy for the second agent (player 1 seat)
    #[arg(long, value_enum, default_value_t = StrategyKind::LookaheadUniform)]
    pub second: StrategyKind,

    /// Number of games
    #[arg(long, short = 'g', default_value_t = 1000)]
    pub games: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Beta prior alpha for bandit strategies
    #[arg(long, default_value_t = 1.0)]
    pub prior_alpha: f64,

    /// Beta prior beta for bandit strategies
    #[arg(long, default_value_t = 1.0)]
    pub prior_beta: f64,

    /// JSON arena configuration; replaces the strategy, game, prior and seed flags
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// State keys (e.g. 112220202) to evaluate with both agents after training
    #[arg(long)]
    pub inspect: Vec<String>,

    /// Hide the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}

impl TrainArgs {
    fn arena_config(&self) -> Result<ArenaConfig> {
        if let Some(path) = &self.config {
            return ArenaConfig::from_path(path)
                .with_context(|| format!("loading arena config {}", path.display()));
        }

        let prior = BetaPrior::new(self.prior_alpha, self.prior_beta)?;
        let mut config = ArenaConfig::new(
            self.games,
            AgentConfig::new(self.first).with_prior(prior),
            AgentConfig::new(self.second).with_prior(prior),
        );
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config.validate()?;
        Ok(config)
    }
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let config = args.arena_config()?;
    let inspect = args
        .inspect
        .iter()
        .map(|raw| StateKey::parse(raw).with_context(|| format!("invalid --inspect key '{raw}'")))
        .collect::<Result<Vec<_>>>()?;

    let mut arena = Arena::from_config(&config)?;

    println!(
        "Training {} vs {} for {} games",
        config.first.strategy,
        config.second.strategy,
        format_number(config.games)
    );
    if let Some(seed) = config.seed {
        println!("Seed: {seed}");
    }

    let progress = (!args.no_progress).then(|| create_games_progress(config.games as u64));
    arena.run_with(config.games, |results, _| {
        if let Some(pb) = &progress {
            pb.inc(1);
            if results.games.is_multiple_of(10) {
                pb.set_message(format!(
                    "first {} / draw {}",
                    format_rate(results.first_win_rate()),
                    format_rate(results.draw_rate())
                ));
            }
        }
    })?;
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    let results = arena.results().clone();
    print_section("Results");
    print_kv("Games", &format_number(results.games));
    print_kv(
        &format!("First wins ({})", config.first.strategy),
        &format!("{} ({})", results.first_wins, format_rate(results.first_win_rate())),
    );
    print_kv(
        &format!("Second wins ({})", config.second.strategy),
        &format!(
            "{} ({})",
            results.second_wins,
            format_rate(results.second_win_rate())
        ),
    );
    print_kv(
        "Draws",
        &format!("{} ({})", results.draws, format_rate(results.draw_rate())),
    );
    if !results.win_rate_history.is_empty() {
        let history: Vec<String> = results
            .win_rate_history
            .iter()
            .map(|rate| format!("{rate:.2}"))
            .collect();
        print_kv("First win rate", &history.join(" "));
    }

    let (mut first, mut second) = arena.into_agents();
    let first_summary = summarize(&mut first, config.first.strategy, &inspect)?;
    let second_summary = summarize(&mut second, config.second.strategy, &inspect)?;

    if let Some(raw_path) = args.summary.as_ref() {
        let path = sanitize_summary_path(raw_path);
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating summary directory {}", parent.display()))?;
        }
        let summary = TrainingSummaryFile {
            config,
            results,
            first: first_summary,
            second: second_summary,
        };
        let file = File::create(&path)
            .with_context(|| format!("creating summary file {}", path.display()))?;
        to_writer_pretty(file, &summary)
            .with_context(|| format!("writing summary file {}", path.display()))?;
        println!("\nSummary written to {}", path.display());
    }

    Ok(())
}

fn summarize(agent: &mut Agent, strategy: StrategyKind, keys: &[StateKey]) -> Result<AgentSummary> {
    let stats = agent.stats();
    print_subsection(agent.name());
    print_kv("Known states", &format_number(stats.known_states));
    print_kv(
        "W / D / L",
        &format!("{} / {} / {}", stats.wins, stats.draws, stats.losses),
    );

    let mut evaluations = Vec::with_capacity(keys.len());
    for key in keys {
        let evaluation = agent.evaluate_state(key)?;
        let cells: Vec<String> = evaluation
            .actions
            .iter()
            .zip(&evaluation.scores)
            .map(|(action, score)| format!("{action}:{score:.3}"))
            .collect();
        print_kv(key.as_str(), &cells.join(" "));
        evaluations.push(evaluation);
    }

    Ok(AgentSummary {
        strategy,
        stats,
        evaluations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_path_gets_json_extension() {
        assert_eq!(
            sanitize_summary_path(Path::new("out/run")),
            PathBuf::from("out/run.json")
        );
        assert_eq!(
            sanitize_summary_path(Path::new("out/run.JSON")),
            PathBuf::from("out/run.JSON")
        );
    }

    #[test]
    fn summary_path_directory_target() {
        let dir = format!("out{}", std::path::MAIN_SEPARATOR);
        assert_eq!(
            sanitize_summary_path(Path::new(&dir)),
            Path::new("out").join("training_summary.json")
        );
    }

    #[test]
    fn flags_build_seeded_config() {
        let args = TrainArgs::parse_from([
            "train",
            "--first",
            "greedy-bandit",
            "--second",
            "thompson-conciliator",
            "--games",
            "25",
            "--seed",
            "9",
            "--prior-alpha",
            "2",
        ]);
        let config = args.arena_config().unwrap();
        assert_eq!(config.games, 25);
        assert_eq!(config.first.strategy, StrategyKind::GreedyBandit);
        assert_eq!(config.second.strategy, StrategyKind::ThompsonConciliator);
        assert_eq!(config.first.prior.alpha, 2.0);
        assert_eq!(config.second_agent().seed, Some(10));
    }

    #[test]
    fn flags_reject_bad_prior() {
        let args = TrainArgs::parse_from(["train", "--prior-beta", "-1"]);
        assert!(args.arena_config().is_err());
    }
}
