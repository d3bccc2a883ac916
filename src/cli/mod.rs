//! CLI infrastructure for bandit-ttt
//!
//! This module provides the command-line interface for self-play training
//! and round-robin tournaments between strategies.

pub mod commands;
pub mod output;
