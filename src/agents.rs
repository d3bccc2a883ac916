//! Self-play agents
//!
//! This module provides the learning agent, its knowledge table and the
//! six move-selection strategies it can run.

pub mod agent;
pub mod bandit;
pub mod builder;
pub mod knowledge;
pub mod policy;
pub mod uniform;

// Re-export main types
pub use agent::{AGENT_PLAYER, Agent, AgentStats, HistoryEntry, StateEvaluation};
pub use bandit::{GreedyBandit, ThompsonBandit, ThompsonConciliator, ThompsonLookahead};
pub use builder::AgentBuilder;
pub use knowledge::{ActionModel, BetaModel, BetaPrior, KnowledgeTable, UniformModel};
pub use policy::{Policy, PolicyStrategy, StrategyKind, Verdict};
pub use uniform::{LookaheadUniform, UniformRandom};
