//! Non-learning baselines: uniform random play, optionally with a one-ply lookahead

use rand::Rng;

use super::{
    knowledge::{ActionModel, UniformModel},
    policy::{Policy, Verdict, checked_position, lookahead},
};
use crate::types::{Position, StateKey};

/// Samples the stored uniform distribution. Never learns.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformRandom;

impl Policy for UniformRandom {
    fn name(&self) -> &'static str {
        "uniform-random"
    }

    fn prior(&self, key: &StateKey) -> ActionModel {
        ActionModel::Uniform(UniformModel::new(key.empty_positions()))
    }

    fn select_action<R: Rng + ?Sized>(
        &self,
        key: &StateKey,
        model: &ActionModel,
        rng: &mut R,
    ) -> crate::Result<Position> {
        sample_uniform(self.name(), key, model, rng)
    }

    fn reinforce(
        &self,
        key: &StateKey,
        model: &mut ActionModel,
        action: Position,
        _verdict: Verdict,
    ) -> crate::Result<()> {
        model.as_uniform(key, self.name())?;
        checked_position(key, model, action.value()).map(|_| ())
    }
}

/// Takes an immediate win or block when one exists, otherwise plays uniformly.
#[derive(Debug, Clone, Copy, Default)]
pub struct LookaheadUniform;

impl Policy for LookaheadUniform {
    fn name(&self) -> &'static str {
        "lookahead-uniform"
    }

    fn prior(&self, key: &StateKey) -> ActionModel {
        UniformRandom.prior(key)
    }

    fn select_action<R: Rng + ?Sized>(
        &self,
        key: &StateKey,
        model: &ActionModel,
        rng: &mut R,
    ) -> crate::Result<Position> {
        model.as_uniform(key, self.name())?;
        match lookahead(key) {
            Some(position) => checked_position(key, model, position.value()),
            None => sample_uniform(self.name(), key, model, rng),
        }
    }

    fn reinforce(
        &self,
        key: &StateKey,
        model: &mut ActionModel,
        action: Position,
        _verdict: Verdict,
    ) -> crate::Result<()> {
        model.as_uniform(key, self.name())?;
        checked_position(key, model, action.value()).map(|_| ())
    }
}

fn sample_uniform<R: Rng + ?Sized>(
    strategy: &str,
    key: &StateKey,
    model: &ActionModel,
    rng: &mut R,
) -> crate::Result<Position> {
    let action = model
        .as_uniform(key, strategy)?
        .sample(rng)
        .ok_or_else(|| crate::Error::NoValidMoves {
            key: key.to_string(),
        })?;
    checked_position(key, model, action)
}
