//! Self-play between two agents through a referee board
//!
//! The referee board is the source of truth. Each agent keeps its own
//! mirror and learns of the other side's moves through
//! [`Agent::notify_opponent_move`]. The first agent sits in the player 0
//! seat and the second in the player 1 seat; the opening alternates from
//! game to game because every referee reset flips the starter.

use serde::{Deserialize, Serialize};

use crate::{
    agents::{Agent, AgentBuilder},
    config::ArenaConfig,
    tictactoe::{Board, GameRecord, MoveRecord, Outcome, Player},
    types::Position,
};

/// Games between win-rate samples.
pub const WIN_RATE_INTERVAL: usize = 100;

/// Running tallies, with wins counted per seat.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArenaResults {
    pub games: usize,
    pub first_wins: usize,
    pub second_wins: usize,
    pub draws: usize,
    /// First agent's cumulative win rate, sampled every [`WIN_RATE_INTERVAL`] games.
    pub win_rate_history: Vec<f64>,
}

impl ArenaResults {
    fn record(&mut self, outcome: Outcome) {
        self.games += 1;
        match outcome {
            Outcome::Win(Player::Zero) => self.first_wins += 1,
            Outcome::Win(Player::One) => self.second_wins += 1,
            Outcome::Draw | Outcome::Undecided => self.draws += 1,
        }
        if self.games.is_multiple_of(WIN_RATE_INTERVAL) {
            self.win_rate_history.push(self.first_win_rate());
        }
    }

    pub fn first_win_rate(&self) -> f64 {
        ratio(self.first_wins, self.games)
    }

    pub fn second_win_rate(&self) -> f64 {
        ratio(self.second_wins, self.games)
    }

    pub fn draw_rate(&self) -> f64 {
        ratio(self.draws, self.games)
    }
}

fn ratio(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

/// Two agents and the referee board they play on.
#[derive(Debug)]
pub struct Arena {
    first: Agent,
    second: Agent,
    referee: Board,
    results: ArenaResults,
}

impl Arena {
    pub fn new(first: Agent, second: Agent) -> Self {
        Arena {
            first,
            second,
            referee: Board::new(),
            results: ArenaResults::default(),
        }
    }

    /// Build both agents from a validated configuration.
    pub fn from_config(config: &ArenaConfig) -> crate::Result<Self> {
        config.validate()?;
        let first = AgentBuilder::from_config(&config.first_agent())
            .name(format!("first:{}", config.first.strategy))
            .build()?;
        let second = AgentBuilder::from_config(&config.second_agent())
            .name(format!("second:{}", config.second.strategy))
            .build()?;
        Ok(Self::new(first, second))
    }

    pub fn first(&self) -> &Agent {
        &self.first
    }

    pub fn second(&self) -> &Agent {
        &self.second
    }

    pub fn first_mut(&mut self) -> &mut Agent {
        &mut self.first
    }

    pub fn results(&self) -> &ArenaResults {
        &self.results
    }

    pub fn into_agents(self) -> (Agent, Agent) {
        (self.first, self.second)
    }

    /// Play one complete game and let both agents learn from it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::AgentDesync`] if an agent stops early or
    /// proposes a move the referee cannot apply, and propagates any agent
    /// error.
    pub fn play_game(&mut self) -> crate::Result<GameRecord> {
        if self.results.games > 0 {
            self.referee.reset();
            self.first.reset();
            self.second.reset();
        }

        let starter = self.referee.starter();
        let mut to_move = starter;
        let mut moves: Vec<MoveRecord> = Vec::with_capacity(9);
        let mut last: Option<Position> = None;

        while !self.referee.result().is_decided() {
            let agent = match to_move {
                Player::Zero => &mut self.first,
                Player::One => &mut self.second,
            };
            if let Some(position) = last {
                mirror(agent, position)?;
            }

            let (row, col) = agent.decide_and_play()?.ok_or_else(|| desync(
                agent,
                "stopped playing before the game was decided".to_string(),
            ))?;
            let position = Position::from_coords(row, col)?;
            if !self.referee.apply_move(to_move, row, col)?.is_applied() {
                return Err(desync(agent, format!("proposed occupied cell {position}")));
            }

            moves.push(MoveRecord {
                player: to_move,
                position,
            });
            last = Some(position);
            to_move = to_move.opponent();
        }

        // `to_move` has not seen the final move yet.
        let (waiting, finisher) = match to_move {
            Player::Zero => (&mut self.first, &mut self.second),
            Player::One => (&mut self.second, &mut self.first),
        };
        if let Some(position) = last {
            mirror(waiting, position)?;
        }
        for agent in [waiting, finisher] {
            if let Some((row, col)) = agent.decide_and_play()? {
                return Err(desync(
                    agent,
                    format!("played ({row}, {col}) after the game was decided"),
                ));
            }
        }

        let result = self.referee.result();
        self.results.record(result.outcome);
        log::debug!(
            "game {} opened by player {}: {:?} in {} moves",
            self.results.games,
            starter,
            result.outcome,
            moves.len()
        );

        Ok(GameRecord {
            starter,
            moves,
            result,
        })
    }

    /// Play `games` games.
    pub fn run(&mut self, games: usize) -> crate::Result<&ArenaResults> {
        self.run_with(games, |_, _| {})
    }

    /// Play `games` games, reporting each finished game to `on_game`.
    pub fn run_with<F>(&mut self, games: usize, mut on_game: F) -> crate::Result<&ArenaResults>
    where
        F: FnMut(&ArenaResults, &GameRecord),
    {
        log::info!(
            "arena: {} vs {} for {} games",
            self.first.name(),
            self.second.name(),
            games
        );
        for _ in 0..games {
            let record = self.play_game()?;
            on_game(&self.results, &record);

            if self.results.games.is_multiple_of(WIN_RATE_INTERVAL * 10) {
                log::info!(
                    "arena: {} games, first {:.3} / second {:.3} / draw {:.3}",
                    self.results.games,
                    self.results.first_win_rate(),
                    self.results.second_win_rate(),
                    self.results.draw_rate()
                );
            }
        }
        log::info!(
            "arena finished: {} first wins, {} second wins, {} draws",
            self.results.first_wins,
            self.results.second_wins,
            self.results.draws
        );
        Ok(&self.results)
    }
}

fn mirror(agent: &mut Agent, position: Position) -> crate::Result<()> {
    let (row, col) = position.coords();
    if agent.notify_opponent_move(row, col)?.is_applied() {
        Ok(())
    } else {
        Err(desync(
            agent,
            format!("declined the opponent's move at {position}"),
        ))
    }
}

fn desync(agent: &Agent, context: String) -> crate::Error {
    crate::Error::AgentDesync {
        agent: agent.name().to_string(),
        context,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::StrategyKind;

    fn arena(first: StrategyKind, second: StrategyKind, seed: u64) -> Arena {
        Arena::new(
            Agent::new(first, Some(seed)).unwrap(),
            Agent::new(second, Some(seed + 1)).unwrap(),
        )
    }

    #[test]
    fn opening_alternates() {
        let mut arena = arena(StrategyKind::UniformRandom, StrategyKind::UniformRandom, 1);
        let starters: Vec<_> = (0..4)
            .map(|_| arena.play_game().unwrap().starter)
            .collect();
        assert_eq!(
            starters,
            vec![Player::Zero, Player::One, Player::Zero, Player::One]
        );
    }

    #[test]
    fn records_are_legal_and_complete() {
        let mut arena = arena(StrategyKind::ThompsonBandit, StrategyKind::LookaheadUniform, 3);
        for _ in 0..20 {
            let record = arena.play_game().unwrap();
            let mut replay = Board::new();
            for mv in &record.moves {
                let (row, col) = mv.position.coords();
                assert!(replay.apply_move(mv.player, row, col).unwrap().is_applied());
            }
            assert_eq!(replay.result(), record.result);
            assert!(record.result.is_decided());
            assert_eq!(record.moves[0].player, record.starter);
        }
    }

    #[test]
    fn both_agents_learn_every_game() {
        let mut arena = arena(StrategyKind::GreedyBandit, StrategyKind::ThompsonConciliator, 5);
        arena.run(30).unwrap();

        let results = arena.results().clone();
        assert_eq!(results.games, 30);
        assert_eq!(
            results.first_wins + results.second_wins + results.draws,
            30
        );

        let first = arena.first().stats();
        let second = arena.second().stats();
        assert_eq!(first.games_learned, 30);
        assert_eq!(second.games_learned, 30);
        assert_eq!(first.wins, results.first_wins);
        assert_eq!(second.wins, results.second_wins);
        assert_eq!(first.draws, results.draws);
    }

    #[test]
    fn win_rate_sampled_every_interval() {
        let mut arena = arena(StrategyKind::UniformRandom, StrategyKind::UniformRandom, 8);
        let mut seen = 0;
        arena
            .run_with(WIN_RATE_INTERVAL * 2, |_, _| seen += 1)
            .unwrap();
        assert_eq!(seen, WIN_RATE_INTERVAL * 2);
        assert_eq!(arena.results().win_rate_history.len(), 2);
    }
}
