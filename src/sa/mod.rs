//! Simulated Annealing (SA) route refinement.
//!
//! A single-solution trajectory search inspired by the physical annealing
//! process. Here it polishes the best-known route once per GA generation:
//! a bounded number of swap moves, accepted by the Metropolis criterion
//! under geometric cooling. The best route seen is returned, so refinement
//! can never lengthen a tour.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Cerny (1985), "Thermodynamical Approach to the Travelling Salesman Problem"

mod config;
mod runner;
mod types;

pub use config::SaConfig;
pub use runner::{SaResult, SaRunner};
pub use types::{SaProblem, TourNeighborhood};
