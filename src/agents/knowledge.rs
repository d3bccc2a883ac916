//! Per-state action models and the flat knowledge table that stores them

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    types::{STATE_SPACE, StateKey},
    utils::weighted_sample,
};

/// Beta prior `(alpha, beta)` given to every action of a fresh bandit model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BetaPrior {
    pub alpha: f64,
    pub beta: f64,
}

impl BetaPrior {
    /// Build a validated prior.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] unless both parameters
    /// are finite and strictly positive.
    pub fn new(alpha: f64, beta: f64) -> crate::Result<Self> {
        let prior = BetaPrior { alpha, beta };
        prior.validate()?;
        Ok(prior)
    }

    pub fn validate(&self) -> crate::Result<()> {
        for (name, value) in [("alpha", self.alpha), ("beta", self.beta)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(crate::Error::InvalidConfiguration {
                    message: format!("Beta prior {name} must be finite and positive, got {value}"),
                });
            }
        }
        Ok(())
    }
}

impl Default for BetaPrior {
    fn default() -> Self {
        BetaPrior {
            alpha: 1.0,
            beta: 1.0,
        }
    }
}

/// Probability vector over the empty cells of a state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniformModel {
    actions: Vec<usize>,
    probabilities: Vec<f64>,
}

impl UniformModel {
    pub fn new(actions: Vec<usize>) -> Self {
        let p = if actions.is_empty() {
            0.0
        } else {
            1.0 / actions.len() as f64
        };
        let probabilities = vec![p; actions.len()];
        UniformModel {
            actions,
            probabilities,
        }
    }

    pub fn actions(&self) -> &[usize] {
        &self.actions
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    pub fn contains(&self, action: usize) -> bool {
        self.actions.contains(&action)
    }

    /// Draw an action according to the stored distribution.
    pub fn sample<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> Option<usize> {
        let items: Vec<(usize, f64)> = self
            .actions
            .iter()
            .copied()
            .zip(self.probabilities.iter().copied())
            .collect();
        weighted_sample(rng, &items)
    }
}

/// Independent Beta(alpha, beta) posteriors, one per empty cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetaModel {
    actions: Vec<usize>,
    alpha: Vec<f64>,
    beta: Vec<f64>,
}

impl BetaModel {
    pub fn new(actions: Vec<usize>, prior: BetaPrior) -> Self {
        let n = actions.len();
        BetaModel {
            actions,
            alpha: vec![prior.alpha; n],
            beta: vec![prior.beta; n],
        }
    }

    pub fn actions(&self) -> &[usize] {
        &self.actions
    }

    pub fn alpha(&self) -> &[f64] {
        &self.alpha
    }

    pub fn beta(&self) -> &[f64] {
        &self.beta
    }

    fn slot(&self, action: usize) -> Option<usize> {
        self.actions.iter().position(|&a| a == action)
    }

    /// `(alpha, beta)` for one action.
    pub fn params(&self, action: usize) -> Option<(f64, f64)> {
        self.slot(action).map(|i| (self.alpha[i], self.beta[i]))
    }

    /// Posterior means `alpha / (alpha + beta)`, aligned with [`actions`](Self::actions).
    pub fn means(&self) -> Vec<f64> {
        self.alpha
            .iter()
            .zip(&self.beta)
            .map(|(a, b)| a / (a + b))
            .collect()
    }

    /// Count a success for `action`. Returns `false` if the action is unknown.
    pub fn record_success(&mut self, action: usize) -> bool {
        match self.slot(action) {
            Some(i) => {
                self.alpha[i] += 1.0;
                true
            }
            None => false,
        }
    }

    /// Count a failure for `action`. Returns `false` if the action is unknown.
    pub fn record_failure(&mut self, action: usize) -> bool {
        match self.slot(action) {
            Some(i) => {
                self.beta[i] += 1.0;
                true
            }
            None => false,
        }
    }
}

/// Model attached to one canonical state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "kebab-case")]
pub enum ActionModel {
    Uniform(UniformModel),
    Beta(BetaModel),
}

impl ActionModel {
    /// Short shape name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            ActionModel::Uniform(_) => "uniform",
            ActionModel::Beta(_) => "beta",
        }
    }

    pub fn actions(&self) -> &[usize] {
        match self {
            ActionModel::Uniform(model) => model.actions(),
            ActionModel::Beta(model) => model.actions(),
        }
    }

    /// Stored probabilities for uniform models, posterior means for Beta models.
    pub fn scores(&self) -> Vec<f64> {
        match self {
            ActionModel::Uniform(model) => model.probabilities().to_vec(),
            ActionModel::Beta(model) => model.means(),
        }
    }

    pub fn as_uniform(&self, key: &StateKey, strategy: &str) -> crate::Result<&UniformModel> {
        match self {
            ActionModel::Uniform(model) => Ok(model),
            other => Err(mismatch(key, strategy, "uniform", other.kind())),
        }
    }

    pub fn as_beta(&self, key: &StateKey, strategy: &str) -> crate::Result<&BetaModel> {
        match self {
            ActionModel::Beta(model) => Ok(model),
            other => Err(mismatch(key, strategy, "beta", other.kind())),
        }
    }

    pub fn as_beta_mut(
        &mut self,
        key: &StateKey,
        strategy: &str,
    ) -> crate::Result<&mut BetaModel> {
        match self {
            ActionModel::Beta(model) => Ok(model),
            other => Err(mismatch(key, strategy, "beta", other.kind())),
        }
    }
}

fn mismatch(
    key: &StateKey,
    strategy: &str,
    expected: &'static str,
    found: &'static str,
) -> crate::Error {
    crate::Error::ModelMismatch {
        key: key.to_string(),
        strategy: strategy.to_string(),
        expected,
        found,
    }
}

/// Knowledge table: one optional model per canonical state.
///
/// Slots are addressed by the key's base-3 value, so lookups never hash.
/// Entries are created on first visit and never removed.
#[derive(Clone)]
pub struct KnowledgeTable {
    slots: Vec<Option<ActionModel>>,
    known: usize,
}

impl KnowledgeTable {
    pub fn new() -> Self {
        KnowledgeTable {
            slots: vec![None; STATE_SPACE],
            known: 0,
        }
    }

    pub fn get(&self, key: &StateKey) -> Option<&ActionModel> {
        self.slots[key.index()].as_ref()
    }

    pub fn get_mut(&mut self, key: &StateKey) -> Option<&mut ActionModel> {
        self.slots[key.index()].as_mut()
    }

    /// Fetch the model for `key`, creating it with `init` on first visit.
    pub fn get_or_insert_with<F>(&mut self, key: &StateKey, init: F) -> &mut ActionModel
    where
        F: FnOnce() -> ActionModel,
    {
        let slot = &mut self.slots[key.index()];
        if slot.is_none() {
            self.known += 1;
        }
        slot.get_or_insert_with(init)
    }

    /// Number of states with a model.
    pub fn len(&self) -> usize {
        self.known
    }

    pub fn is_empty(&self) -> bool {
        self.known == 0
    }

    /// Known states in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (StateKey, &ActionModel)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            let model = slot.as_ref()?;
            let key = StateKey::from_index(index).ok()?;
            Some((key, model))
        })
    }
}

impl Default for KnowledgeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for KnowledgeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KnowledgeTable")
            .field("known", &self.known)
            .field("capacity", &self.slots.len())
            .finish()
    }
}
