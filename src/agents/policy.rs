//! The policy interface shared by every strategy, and the closed set of strategies
//!
//! Each strategy owns two decisions: which action to take from a state's
//! model, and how to fold a terminal outcome back into that model. Agents
//! hold a [`PolicyStrategy`] and dispatch through the [`Policy`] trait.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{
    bandit::{GreedyBandit, ThompsonBandit, ThompsonConciliator, ThompsonLookahead},
    knowledge::{ActionModel, BetaPrior},
    uniform::{LookaheadUniform, UniformRandom},
};
use crate::{
    tictactoe::{LineAnalyzer, Outcome, Player},
    types::{Position, StateKey},
};

/// Terminal outcome from one player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Win,
    Draw,
    Loss,
}

impl Verdict {
    /// `None` while the game is undecided.
    pub fn for_player(outcome: Outcome, player: Player) -> Option<Verdict> {
        match outcome {
            Outcome::Undecided => None,
            Outcome::Draw => Some(Verdict::Draw),
            Outcome::Win(winner) if winner == player => Some(Verdict::Win),
            Outcome::Win(_) => Some(Verdict::Loss),
        }
    }
}

/// Action selection and credit assignment for one strategy.
pub trait Policy {
    /// Kebab-case strategy name.
    fn name(&self) -> &'static str;

    /// Fresh model for a state seen for the first time.
    fn prior(&self, key: &StateKey) -> ActionModel;

    /// Choose an empty cell of `key`.
    fn select_action<R: Rng + ?Sized>(
        &self,
        key: &StateKey,
        model: &ActionModel,
        rng: &mut R,
    ) -> crate::Result<Position>;

    /// Apply the terminal verdict to the `(key, action)` pair.
    fn reinforce(
        &self,
        key: &StateKey,
        model: &mut ActionModel,
        action: Position,
        verdict: Verdict,
    ) -> crate::Result<()>;
}

/// Identifier for each available strategy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    UniformRandom,
    LookaheadUniform,
    GreedyBandit,
    ThompsonBandit,
    ThompsonLookahead,
    ThompsonConciliator,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 6] = [
        StrategyKind::UniformRandom,
        StrategyKind::LookaheadUniform,
        StrategyKind::GreedyBandit,
        StrategyKind::ThompsonBandit,
        StrategyKind::ThompsonLookahead,
        StrategyKind::ThompsonConciliator,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::UniformRandom => "uniform-random",
            StrategyKind::LookaheadUniform => "lookahead-uniform",
            StrategyKind::GreedyBandit => "greedy-bandit",
            StrategyKind::ThompsonBandit => "thompson-bandit",
            StrategyKind::ThompsonLookahead => "thompson-lookahead",
            StrategyKind::ThompsonConciliator => "thompson-conciliator",
        }
    }

    /// Whether the strategy keeps Beta posteriors (and so uses a prior).
    pub fn is_bandit(self) -> bool {
        !matches!(
            self,
            StrategyKind::UniformRandom | StrategyKind::LookaheadUniform
        )
    }

    /// Instantiate the strategy. Uniform strategies ignore `prior`.
    pub fn build(self, prior: BetaPrior) -> PolicyStrategy {
        match self {
            StrategyKind::UniformRandom => PolicyStrategy::UniformRandom(UniformRandom),
            StrategyKind::LookaheadUniform => PolicyStrategy::LookaheadUniform(LookaheadUniform),
            StrategyKind::GreedyBandit => PolicyStrategy::GreedyBandit(GreedyBandit::new(prior)),
            StrategyKind::ThompsonBandit => {
                PolicyStrategy::ThompsonBandit(ThompsonBandit::new(prior))
            }
            StrategyKind::ThompsonLookahead => {
                PolicyStrategy::ThompsonLookahead(ThompsonLookahead::new(prior))
            }
            StrategyKind::ThompsonConciliator => {
                PolicyStrategy::ThompsonConciliator(ThompsonConciliator::new(prior))
            }
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Closed set of strategies with static dispatch.
#[derive(Debug, Clone)]
pub enum PolicyStrategy {
    UniformRandom(UniformRandom),
    LookaheadUniform(LookaheadUniform),
    GreedyBandit(GreedyBandit),
    ThompsonBandit(ThompsonBandit),
    ThompsonLookahead(ThompsonLookahead),
    ThompsonConciliator(ThompsonConciliator),
}

impl PolicyStrategy {
    pub fn kind(&self) -> StrategyKind {
        match self {
            Self::UniformRandom(_) => StrategyKind::UniformRandom,
            Self::LookaheadUniform(_) => StrategyKind::LookaheadUniform,
            Self::GreedyBandit(_) => StrategyKind::GreedyBandit,
            Self::ThompsonBandit(_) => StrategyKind::ThompsonBandit,
            Self::ThompsonLookahead(_) => StrategyKind::ThompsonLookahead,
            Self::ThompsonConciliator(_) => StrategyKind::ThompsonConciliator,
        }
    }
}

impl Policy for PolicyStrategy {
    fn name(&self) -> &'static str {
        self.kind().name()
    }

    fn prior(&self, key: &StateKey) -> ActionModel {
        match self {
            Self::UniformRandom(algo) => algo.prior(key),
            Self::LookaheadUniform(algo) => algo.prior(key),
            Self::GreedyBandit(algo) => algo.prior(key),
            Self::ThompsonBandit(algo) => algo.prior(key),
            Self::ThompsonLookahead(algo) => algo.prior(key),
            Self::ThompsonConciliator(algo) => algo.prior(key),
        }
    }

    fn select_action<R: Rng + ?Sized>(
        &self,
        key: &StateKey,
        model: &ActionModel,
        rng: &mut R,
    ) -> crate::Result<Position> {
        match self {
            Self::UniformRandom(algo) => algo.select_action(key, model, rng),
            Self::LookaheadUniform(algo) => algo.select_action(key, model, rng),
            Self::GreedyBandit(algo) => algo.select_action(key, model, rng),
            Self::ThompsonBandit(algo) => algo.select_action(key, model, rng),
            Self::ThompsonLookahead(algo) => algo.select_action(key, model, rng),
            Self::ThompsonConciliator(algo) => algo.select_action(key, model, rng),
        }
    }

    fn reinforce(
        &self,
        key: &StateKey,
        model: &mut ActionModel,
        action: Position,
        verdict: Verdict,
    ) -> crate::Result<()> {
        match self {
            Self::UniformRandom(algo) => algo.reinforce(key, model, action, verdict),
            Self::LookaheadUniform(algo) => algo.reinforce(key, model, action, verdict),
            Self::GreedyBandit(algo) => algo.reinforce(key, model, action, verdict),
            Self::ThompsonBandit(algo) => algo.reinforce(key, model, action, verdict),
            Self::ThompsonLookahead(algo) => algo.reinforce(key, model, action, verdict),
            Self::ThompsonConciliator(algo) => algo.reinforce(key, model, action, verdict),
        }
    }
}

/// Immediate win-or-block cell for `key`, if any line is one move from decided.
pub(crate) fn lookahead(key: &StateKey) -> Option<Position> {
    let (line, position) = LineAnalyzer::decisive_cell(&key.cells())?;
    log::trace!("lookahead on {key}: {line:?} open at {position}");
    Some(position)
}

/// Map a chosen action index back to a position, rejecting indices the model
/// does not hold.
pub(crate) fn checked_position(
    key: &StateKey,
    model: &ActionModel,
    action: usize,
) -> crate::Result<Position> {
    if !model.actions().contains(&action) {
        return Err(crate::Error::UnknownAction {
            key: key.to_string(),
            action,
        });
    }
    Position::new(action)
}
