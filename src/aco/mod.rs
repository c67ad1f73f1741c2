//! Ant-colony pheromone feedback.
//!
//! Unlike classical ACO, pheromones here never construct routes. They only
//! modulate mutation intensity: routes running along heavily reinforced
//! edges get a doubled mutation rate, pushing a possibly stagnant population
//! apart.
//!
//! # References
//!
//! - Dorigo & Gambardella (1997), "Ant Colony System: A Cooperative Learning
//!   Approach to the Traveling Salesman Problem"

mod config;
mod pheromone;

pub use config::AcoConfig;
pub use pheromone::PheromoneMatrix;
