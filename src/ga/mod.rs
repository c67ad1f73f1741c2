//! Genetic Algorithm for route optimization.
//!
//! Evolves a population of routes under roulette-wheel selection, optional
//! PMX/OX crossover, swap mutation and optional elitism. Fitness is the
//! reciprocal of tour distance. Two add-ons hook into the loop:
//!
//! - pheromone trails ([`crate::aco`]) that double the mutation rate of
//!   children running over well-reinforced edges
//! - annealing ([`crate::sa`]) that refines the best-known route after each
//!   generation
//!
//! # Key Types
//!
//! - [`GaConfig`]: Algorithm parameters and stop conditions
//! - [`GaRunner`]: Builds streams and runs to completion
//! - [`GaStream`]: Lazy iterator of [`ProgressRecord`]s, one per generation
//! - [`GaResult`]: Final result of a batch run
//!
//! # Submodules
//!
//! - [`operators`]: Permutation crossover (PMX, OX) and swap mutation
//!
//! # References
//!
//! - Goldberg & Lingle (1985), "Alleles, Loci, and the Traveling Salesman Problem"
//! - Davis (1985), "Applying Adaptive Algorithms to Epistatic Domains"
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

mod config;
pub mod operators;
mod runner;
mod selection;
mod types;

pub use config::GaConfig;
pub use operators::Crossover;
pub use runner::{GaResult, GaRunner, GaStream};
pub use selection::{select_parent_indices, select_parents};
pub use types::{BestSolution, ProgressRecord, StopReason};
