//! Self-play agent: a private board mirror, a knowledge table and one strategy.

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::{
    builder::AgentBuilder,
    knowledge::KnowledgeTable,
    policy::{Policy, PolicyStrategy, StrategyKind, Verdict},
};
use crate::{
    tictactoe::{Board, MoveStatus, Player, TerminalResult},
    types::{Position, StateKey},
};

/// The agent always plays this mark on its private board.
pub const AGENT_PLAYER: Player = Player::One;

/// One decision taken during the current game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub key: StateKey,
    pub action: Position,
}

/// Actions of a state paired with the agent's current score for each.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateEvaluation {
    pub key: StateKey,
    pub actions: Vec<usize>,
    pub scores: Vec<f64>,
}

/// Learning counters, from the agent's own point of view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentStats {
    pub known_states: usize,
    pub games_learned: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
}

impl AgentStats {
    fn record(&mut self, verdict: Verdict) {
        self.games_learned += 1;
        match verdict {
            Verdict::Win => self.wins += 1,
            Verdict::Draw => self.draws += 1,
            Verdict::Loss => self.losses += 1,
        }
    }
}

/// Self-play learner
pub struct Agent {
    name: String,
    strategy: PolicyStrategy,
    board: Board,
    knowledge: KnowledgeTable,
    history: Vec<HistoryEntry>,
    rng: StdRng,
    settled: bool,
    stats: AgentStats,
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("strategy", &self.strategy.name())
            .field("known_states", &self.knowledge.len())
            .field("history", &self.history.len())
            .field("settled", &self.settled)
            .finish()
    }
}

impl Agent {
    /// Create a new builder for `kind`.
    ///
    /// # Example
    /// ```
    /// use bandit_ttt::agents::{Agent, StrategyKind};
    ///
    /// let agent = Agent::builder(StrategyKind::ThompsonBandit)
    ///     .seed(42)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(agent.strategy_kind(), StrategyKind::ThompsonBandit);
    /// ```
    pub fn builder(kind: StrategyKind) -> AgentBuilder {
        AgentBuilder::new(kind)
    }

    /// Create an agent with the default prior.
    pub fn new(kind: StrategyKind, seed: Option<u64>) -> crate::Result<Self> {
        let mut builder = Self::builder(kind);
        if let Some(s) = seed {
            builder = builder.seed(s);
        }
        builder.build()
    }

    pub(crate) fn from_parts(name: String, strategy: PolicyStrategy, rng: StdRng) -> Self {
        Agent {
            name,
            strategy,
            board: Board::new(),
            knowledge: KnowledgeTable::new(),
            history: Vec::new(),
            rng,
            settled: false,
            stats: AgentStats::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn strategy_kind(&self) -> StrategyKind {
        self.strategy.kind()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn knowledge(&self) -> &KnowledgeTable {
        &self.knowledge
    }

    /// Decisions taken so far in the current game.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn stats(&self) -> AgentStats {
        AgentStats {
            known_states: self.knowledge.len(),
            ..self.stats
        }
    }

    /// Start a new game. Learned knowledge is kept.
    pub fn reset(&mut self) {
        self.board.reset();
        self.history.clear();
        self.settled = false;
    }

    /// Mirror the opponent's move on the private board.
    ///
    /// # Errors
    ///
    /// Propagates board errors: out-of-range cells, a move out of turn, or a
    /// move after the game is decided.
    pub fn notify_opponent_move(&mut self, row: usize, col: usize) -> crate::Result<MoveStatus> {
        self.board.apply_move(AGENT_PLAYER.opponent(), row, col)
    }

    /// Play one move, or learn from the finished game.
    ///
    /// Returns the `(row, col)` played, or `None` once the game is decided.
    /// The terminal outcome is credited exactly once per game: right after
    /// the agent's own deciding move, or on the first call that finds the
    /// game already over.
    pub fn decide_and_play(&mut self) -> crate::Result<Option<(usize, usize)>> {
        let result = self.board.result();
        if result.is_decided() {
            self.settle(result)?;
            return Ok(None);
        }

        let key = self.board.canonical_state().clone();
        let strategy = &self.strategy;
        let model = self
            .knowledge
            .get_or_insert_with(&key, || strategy.prior(&key));
        let position = strategy.select_action(&key, model, &mut self.rng)?;

        if self.board.apply_at(AGENT_PLAYER, position)? == MoveStatus::Declined {
            return Err(crate::Error::UnknownAction {
                key: key.to_string(),
                action: position.value(),
            });
        }
        log::debug!("{} played {} in {}", self.name, position, key);
        self.history.push(HistoryEntry {
            key,
            action: position,
        });

        let after = self.board.result();
        if after.is_decided() {
            self.settle(after)?;
        }
        Ok(Some(position.coords()))
    }

    /// Credit the terminal outcome to every decision of this game.
    fn settle(&mut self, result: TerminalResult) -> crate::Result<()> {
        if self.settled {
            return Ok(());
        }
        let Some(verdict) = Verdict::for_player(result.outcome, AGENT_PLAYER) else {
            return Ok(());
        };

        for entry in &self.history {
            let model =
                self.knowledge
                    .get_mut(&entry.key)
                    .ok_or_else(|| crate::Error::MissingKnowledge {
                        key: entry.key.to_string(),
                    })?;
            self.strategy
                .reinforce(&entry.key, model, entry.action, verdict)?;
        }

        self.settled = true;
        self.stats.record(verdict);
        log::debug!(
            "{} settled {:?} over {} decisions",
            self.name,
            verdict,
            self.history.len()
        );
        Ok(())
    }

    /// Scores for every action of `key`, initialising the entry if needed.
    ///
    /// Never changes what has been learned, so repeated calls agree.
    pub fn evaluate_state(&mut self, key: &StateKey) -> crate::Result<StateEvaluation> {
        let strategy = &self.strategy;
        let model = self
            .knowledge
            .get_or_insert_with(key, || strategy.prior(key));
        Ok(StateEvaluation {
            key: key.clone(),
            actions: model.actions().to_vec(),
            scores: model.scores(),
        })
    }
}
