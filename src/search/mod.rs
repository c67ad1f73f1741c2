//! Exhaustive frontier searches used as comparison baselines.
//!
//! Both searches solve the same home-city tour problem as the GA and stream
//! the same [`ProgressRecord`](crate::ga::ProgressRecord) shape, with
//! `generation` counting frontier nodes expanded. They share no state with
//! the GA.
//!
//! - [`SearchRunner::best_first`]: uniform-cost search over partial paths
//! - [`SearchRunner::a_star`]: cost plus the [`MinUnvisitedEdge`] estimate
//!
//! Exhausting the frontier visits every partial permutation, so runtime and
//! memory grow factorially with the number of cities. Use
//! [`SearchConfig::max_expansions`] to bound larger instances.
//!
//! # References
//!
//! - Hart, Nilsson & Raphael (1968), "A Formal Basis for the Heuristic
//!   Determination of Minimum Cost Paths"

mod config;
mod runner;
mod types;

pub use config::SearchConfig;
pub use runner::{SearchResult, SearchRunner, SearchStream};
pub use types::{Heuristic, MinUnvisitedEdge, ZeroHeuristic};
