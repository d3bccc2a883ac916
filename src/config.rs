//! Configuration types for agents and arena runs.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::agents::{BetaPrior, StrategyKind};

/// Configuration for creating an agent.
///
/// # Examples
///
/// ```
/// use bandit_ttt::config::AgentConfig;
/// use bandit_ttt::agents::StrategyKind;
///
/// let config = AgentConfig::new(StrategyKind::ThompsonBandit).with_seed(42);
/// assert_eq!(config.seed, Some(42));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub strategy: StrategyKind,
    /// Beta prior for bandit strategies
    #[serde(default)]
    pub prior: BetaPrior,
    /// Random seed for reproducibility
    #[serde(default)]
    pub seed: Option<u64>,
}

impl AgentConfig {
    pub fn new(strategy: StrategyKind) -> Self {
        Self {
            strategy,
            prior: BetaPrior::default(),
            seed: None,
        }
    }

    pub fn with_prior(mut self, prior: BetaPrior) -> Self {
        self.prior = prior;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> crate::Result<()> {
        self.prior.validate()
    }
}

/// A self-play run between two agents.
///
/// The arena seed, when set, fills in agent seeds that were left open:
/// `seed` for the first agent and `seed + 1` for the second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaConfig {
    pub games: usize,
    pub first: AgentConfig,
    pub second: AgentConfig,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl ArenaConfig {
    pub fn new(games: usize, first: AgentConfig, second: AgentConfig) -> Self {
        Self {
            games,
            first,
            second,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Load a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Io`] if the file cannot be read, a
    /// serialization error for malformed JSON, and
    /// [`crate::Error::InvalidConfiguration`] if validation fails.
    pub fn from_path(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| crate::Error::Io {
            operation: format!("read arena config {}", path.display()),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> crate::Result<Self> {
        let config: ArenaConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.games == 0 {
            return Err(crate::Error::InvalidConfiguration {
                message: "arena needs at least one game".to_string(),
            });
        }
        self.first.validate()?;
        self.second.validate()
    }

    /// First agent's config with the derived seed applied.
    pub fn first_agent(&self) -> AgentConfig {
        Self::seeded(&self.first, self.seed)
    }

    /// Second agent's config with the derived seed applied.
    pub fn second_agent(&self) -> AgentConfig {
        Self::seeded(&self.second, self.seed.map(|s| s.wrapping_add(1)))
    }

    fn seeded(agent: &AgentConfig, derived: Option<u64>) -> AgentConfig {
        AgentConfig {
            seed: agent.seed.or(derived),
            ..agent.clone()
        }
    }
}
