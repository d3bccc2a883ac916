//! Builder pattern for Agent construction

use rand::{SeedableRng, rngs::StdRng};

use super::{agent::Agent, knowledge::BetaPrior, policy::StrategyKind};
use crate::config::AgentConfig;

/// Builder for constructing [`Agent`] instances with custom configuration.
///
/// # Examples
///
/// ```
/// use bandit_ttt::agents::{AgentBuilder, BetaPrior, StrategyKind};
///
/// let agent = AgentBuilder::new(StrategyKind::GreedyBandit)
///     .prior(BetaPrior { alpha: 2.0, beta: 1.0 })
///     .seed(7)
///     .name("greedy")
///     .build()
///     .unwrap();
/// assert_eq!(agent.name(), "greedy");
/// ```
#[derive(Debug, Clone)]
pub struct AgentBuilder {
    kind: StrategyKind,
    prior: BetaPrior,
    seed: Option<u64>,
    name: Option<String>,
}

impl AgentBuilder {
    pub fn new(kind: StrategyKind) -> Self {
        AgentBuilder {
            kind,
            prior: BetaPrior::default(),
            seed: None,
            name: None,
        }
    }

    /// Start from a deserialized agent configuration.
    pub fn from_config(config: &AgentConfig) -> Self {
        AgentBuilder {
            kind: config.strategy,
            prior: config.prior,
            seed: config.seed,
            name: None,
        }
    }

    /// Prior given to every action of a newly seen state (bandit strategies only).
    pub fn prior(mut self, prior: BetaPrior) -> Self {
        self.prior = prior;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Label used in logs and arena errors. Defaults to the strategy name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if the prior is not
    /// finite and strictly positive.
    pub fn build(self) -> crate::Result<Agent> {
        self.prior.validate()?;

        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        let name = self.name.unwrap_or_else(|| self.kind.name().to_string());

        Ok(Agent::from_parts(name, self.kind.build(self.prior), rng))
    }
}
