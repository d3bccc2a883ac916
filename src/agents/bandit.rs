//! Beta-Bernoulli bandit strategies
//!
//! All four keep an independent Beta(alpha, beta) posterior per empty cell.
//! They differ in how an action is picked (posterior mean or a Thompson
//! draw, with or without the win/block override) and in what counts as a
//! success: the win-seeking strategies score wins, the conciliator scores
//! draws.

use rand::Rng;
use rand_distr::{Beta, Distribution};

use super::{
    knowledge::{ActionModel, BetaModel, BetaPrior},
    policy::{Policy, Verdict, checked_position, lookahead},
};
use crate::{
    types::{Position, StateKey},
    utils::argmax_first,
};

/// Plays the action with the highest posterior mean.
#[derive(Debug, Clone, Copy)]
pub struct GreedyBandit {
    prior: BetaPrior,
}

impl GreedyBandit {
    pub fn new(prior: BetaPrior) -> Self {
        GreedyBandit { prior }
    }
}

impl Policy for GreedyBandit {
    fn name(&self) -> &'static str {
        "greedy-bandit"
    }

    fn prior(&self, key: &StateKey) -> ActionModel {
        beta_prior(key, self.prior)
    }

    fn select_action<R: Rng + ?Sized>(
        &self,
        key: &StateKey,
        model: &ActionModel,
        _rng: &mut R,
    ) -> crate::Result<Position> {
        let beta = model.as_beta(key, self.name())?;
        pick(key, model, beta, argmax_first(&beta.means()))
    }

    fn reinforce(
        &self,
        key: &StateKey,
        model: &mut ActionModel,
        action: Position,
        verdict: Verdict,
    ) -> crate::Result<()> {
        credit_wins(self.name(), key, model, action, verdict)
    }
}

/// Thompson sampling: one posterior draw per action, highest draw wins.
#[derive(Debug, Clone, Copy)]
pub struct ThompsonBandit {
    prior: BetaPrior,
}

impl ThompsonBandit {
    pub fn new(prior: BetaPrior) -> Self {
        ThompsonBandit { prior }
    }
}

impl Policy for ThompsonBandit {
    fn name(&self) -> &'static str {
        "thompson-bandit"
    }

    fn prior(&self, key: &StateKey) -> ActionModel {
        beta_prior(key, self.prior)
    }

    fn select_action<R: Rng + ?Sized>(
        &self,
        key: &StateKey,
        model: &ActionModel,
        rng: &mut R,
    ) -> crate::Result<Position> {
        thompson(self.name(), key, model, rng)
    }

    fn reinforce(
        &self,
        key: &StateKey,
        model: &mut ActionModel,
        action: Position,
        verdict: Verdict,
    ) -> crate::Result<()> {
        credit_wins(self.name(), key, model, action, verdict)
    }
}

/// Thompson sampling behind the immediate win/block override.
#[derive(Debug, Clone, Copy)]
pub struct ThompsonLookahead {
    prior: BetaPrior,
}

impl ThompsonLookahead {
    pub fn new(prior: BetaPrior) -> Self {
        ThompsonLookahead { prior }
    }
}

impl Policy for ThompsonLookahead {
    fn name(&self) -> &'static str {
        "thompson-lookahead"
    }

    fn prior(&self, key: &StateKey) -> ActionModel {
        beta_prior(key, self.prior)
    }

    fn select_action<R: Rng + ?Sized>(
        &self,
        key: &StateKey,
        model: &ActionModel,
        rng: &mut R,
    ) -> crate::Result<Position> {
        model.as_beta(key, self.name())?;
        match lookahead(key) {
            Some(position) => checked_position(key, model, position.value()),
            None => thompson(self.name(), key, model, rng),
        }
    }

    fn reinforce(
        &self,
        key: &StateKey,
        model: &mut ActionModel,
        action: Position,
        verdict: Verdict,
    ) -> crate::Result<()> {
        credit_wins(self.name(), key, model, action, verdict)
    }
}

/// Thompson sampling that treats a draw as the only success.
#[derive(Debug, Clone, Copy)]
pub struct ThompsonConciliator {
    prior: BetaPrior,
}

impl ThompsonConciliator {
    pub fn new(prior: BetaPrior) -> Self {
        ThompsonConciliator { prior }
    }
}

impl Policy for ThompsonConciliator {
    fn name(&self) -> &'static str {
        "thompson-conciliator"
    }

    fn prior(&self, key: &StateKey) -> ActionModel {
        beta_prior(key, self.prior)
    }

    fn select_action<R: Rng + ?Sized>(
        &self,
        key: &StateKey,
        model: &ActionModel,
        rng: &mut R,
    ) -> crate::Result<Position> {
        thompson(self.name(), key, model, rng)
    }

    fn reinforce(
        &self,
        key: &StateKey,
        model: &mut ActionModel,
        action: Position,
        verdict: Verdict,
    ) -> crate::Result<()> {
        let beta = model.as_beta_mut(key, self.name())?;
        let known = match verdict {
            Verdict::Draw => beta.record_success(action.value()),
            Verdict::Win | Verdict::Loss => beta.record_failure(action.value()),
        };
        ensure_known(key, action, known)
    }
}

fn beta_prior(key: &StateKey, prior: BetaPrior) -> ActionModel {
    ActionModel::Beta(BetaModel::new(key.empty_positions(), prior))
}

fn pick(
    key: &StateKey,
    model: &ActionModel,
    beta: &BetaModel,
    slot: Option<usize>,
) -> crate::Result<Position> {
    let action = slot
        .and_then(|i| beta.actions().get(i).copied())
        .ok_or_else(|| crate::Error::NoValidMoves {
            key: key.to_string(),
        })?;
    checked_position(key, model, action)
}

fn thompson<R: Rng + ?Sized>(
    strategy: &str,
    key: &StateKey,
    model: &ActionModel,
    rng: &mut R,
) -> crate::Result<Position> {
    let beta = model.as_beta(key, strategy)?;
    let mut draws = Vec::with_capacity(beta.actions().len());
    for (&a, &b) in beta.alpha().iter().zip(beta.beta()) {
        let dist = Beta::new(a, b).map_err(|err| crate::Error::InvalidConfiguration {
            message: format!("Beta({a}, {b}) in state {key}: {err}"),
        })?;
        draws.push(dist.sample(rng));
    }
    pick(key, model, beta, argmax_first(&draws))
}

/// Win-seeking credit: a win adds a success, a loss a failure, a draw nothing.
fn credit_wins(
    strategy: &str,
    key: &StateKey,
    model: &mut ActionModel,
    action: Position,
    verdict: Verdict,
) -> crate::Result<()> {
    let beta = model.as_beta_mut(key, strategy)?;
    let known = match verdict {
        Verdict::Win => beta.record_success(action.value()),
        Verdict::Loss => beta.record_failure(action.value()),
        Verdict::Draw => beta.params(action.value()).is_some(),
    };
    ensure_known(key, action, known)
}

fn ensure_known(key: &StateKey, action: Position, known: bool) -> crate::Result<()> {
    if known {
        Ok(())
    } else {
        Err(crate::Error::UnknownAction {
            key: key.to_string(),
            action: action.value(),
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn params(model: &ActionModel, action: usize) -> (f64, f64) {
        match model {
            ActionModel::Beta(beta) => beta.params(action).unwrap(),
            other => panic!("expected beta model, got {}", other.kind()),
        }
    }

    #[test]
    fn greedy_breaks_ties_toward_lowest_cell() {
        let key = StateKey::parse("012222222").unwrap();
        let algo = GreedyBandit::new(BetaPrior::default());
        let model = algo.prior(&key);
        let mut rng = StdRng::seed_from_u64(0);
        let position = algo.select_action(&key, &model, &mut rng).unwrap();
        assert_eq!(position.value(), 2);
    }

    #[test]
    fn greedy_follows_highest_mean() {
        let key = StateKey::empty();
        let algo = GreedyBandit::new(BetaPrior::default());
        let mut model = algo.prior(&key);
        let action = Position::new(6).unwrap();
        algo.reinforce(&key, &mut model, action, Verdict::Win).unwrap();

        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(algo.select_action(&key, &model, &mut rng).unwrap(), action);
    }

    #[test]
    fn win_seeking_credit() {
        let key = StateKey::empty();
        let algo = ThompsonBandit::new(BetaPrior::default());
        let mut model = algo.prior(&key);
        let action = Position::new(4).unwrap();

        algo.reinforce(&key, &mut model, action, Verdict::Win).unwrap();
        assert_eq!(params(&model, 4), (2.0, 1.0));
        algo.reinforce(&key, &mut model, action, Verdict::Loss).unwrap();
        assert_eq!(params(&model, 4), (2.0, 2.0));
        algo.reinforce(&key, &mut model, action, Verdict::Draw).unwrap();
        assert_eq!(params(&model, 4), (2.0, 2.0));
        assert_eq!(params(&model, 0), (1.0, 1.0));
    }

    #[test]
    fn conciliator_credit() {
        let key = StateKey::empty();
        let algo = ThompsonConciliator::new(BetaPrior::default());
        let mut model = algo.prior(&key);
        let action = Position::new(0).unwrap();

        algo.reinforce(&key, &mut model, action, Verdict::Draw).unwrap();
        assert_eq!(params(&model, 0), (2.0, 1.0));
        algo.reinforce(&key, &mut model, action, Verdict::Win).unwrap();
        algo.reinforce(&key, &mut model, action, Verdict::Loss).unwrap();
        assert_eq!(params(&model, 0), (2.0, 3.0));
    }

    #[test]
    fn unknown_action_is_an_error() {
        let key = StateKey::parse("022222222").unwrap();
        let algo = GreedyBandit::new(BetaPrior::default());
        let mut model = algo.prior(&key);
        let err = algo
            .reinforce(&key, &mut model, Position::new(0).unwrap(), Verdict::Draw)
            .unwrap_err();
        assert!(matches!(err, crate::Error::UnknownAction { action: 0, .. }));
    }

    #[test]
    fn thompson_lookahead_overrides_sampling() {
        let key = StateKey::parse("112220202").unwrap();
        let algo = ThompsonLookahead::new(BetaPrior::default());
        let model = algo.prior(&key);
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let position = algo.select_action(&key, &model, &mut rng).unwrap();
            assert_eq!(position.coords(), (0, 2));
        }
    }

    #[test]
    fn thompson_prefers_strong_posterior() {
        let key = StateKey::parse("012222222").unwrap();
        let algo = ThompsonBandit::new(BetaPrior::default());
        let mut model = algo.prior(&key);
        let favourite = Position::new(5).unwrap();
        for _ in 0..40 {
            algo.reinforce(&key, &mut model, favourite, Verdict::Win).unwrap();
        }
        for other in [2, 3, 4, 6, 7, 8] {
            let pos = Position::new(other).unwrap();
            for _ in 0..40 {
                algo.reinforce(&key, &mut model, pos, Verdict::Loss).unwrap();
            }
        }

        let mut rng = StdRng::seed_from_u64(99);
        let hits = (0..200)
            .filter(|_| algo.select_action(&key, &model, &mut rng).unwrap() == favourite)
            .count();
        assert!(hits > 190, "favourite picked {hits} / 200 times");
    }
}
