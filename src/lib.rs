//! Metaheuristic route optimization for the Traveling Salesman Problem.
//!
//! Given an NxN distance matrix, the engine evolves closed tours and streams
//! the best-known tour after every generation:
//!
//! - **Genetic Algorithm ([`ga`])**: roulette selection, PMX/OX or no
//!   crossover, swap mutation and optional elitism, with fitness
//!   `1 / tour_distance` evaluated on a bounded worker pool.
//! - **Pheromone feedback ([`aco`])**: edge trails reinforced by fitness
//!   that double the mutation rate of children on heavily used edges.
//! - **Simulated Annealing ([`sa`])**: per-generation refinement of the
//!   best-known tour by random swaps under geometric cooling.
//! - **Baselines ([`search`])**: exhaustive best-first and A* searches that
//!   stream the same [`ProgressRecord`] shape for comparison.
//!
//! # Example
//!
//! ```
//! use u_tsp::{DistanceMatrix, ga::{Crossover, GaConfig, GaRunner}};
//!
//! let matrix = DistanceMatrix::new(vec![
//!     vec![0.0, 1.0, 2.0, 3.0],
//!     vec![1.0, 0.0, 1.0, 2.0],
//!     vec![2.0, 1.0, 0.0, 1.0],
//!     vec![3.0, 2.0, 1.0, 0.0],
//! ]).unwrap();
//!
//! let config = GaConfig::default()
//!     .with_population_size(20)
//!     .with_crossover(Crossover::Pmx)
//!     .with_elitism(true)
//!     .with_seed(7);
//!
//! let result = GaRunner::run(&matrix, &config).unwrap();
//! let best = result.best.unwrap();
//! assert_eq!(best.route.first(), Some(&0));
//! assert_eq!(best.route.last(), Some(&0));
//! ```
//!
//! The library emits `tracing` events but never installs a subscriber.

pub mod aco;
pub mod error;
pub mod fitness;
pub mod ga;
pub mod matrix;
pub mod population;
pub mod random;
pub mod route;
pub mod sa;
pub mod search;

pub use error::{TspError, TspResult};
pub use ga::{GaConfig, GaResult, GaRunner, GaStream, ProgressRecord, StopReason};
pub use matrix::DistanceMatrix;
pub use route::{Route, RouteLayout};
