//! Value types shared by the GA loop and the baseline searches.

use crate::route::Route;

/// One improving-solution snapshot streamed to the caller.
///
/// For the GA, `generation` is the 1-based generation number. For the
/// baseline searches it counts frontier nodes expanded so far.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgressRecord {
    pub generation: usize,
    pub route: Route,
    pub distance: f64,
    pub fitness: f64,
}

/// Best (route, distance, fitness) triple observed during a run.
#[derive(Debug, Clone, PartialEq)]
pub struct BestSolution {
    pub route: Route,
    pub distance: f64,
    pub fitness: f64,
}

impl BestSolution {
    /// Snapshot tagged with `generation`.
    pub fn to_record(&self, generation: usize) -> ProgressRecord {
        ProgressRecord {
            generation,
            route: self.route.clone(),
            distance: self.distance,
            fitness: self.fitness,
        }
    }
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
    /// Best-known fitness reached the configured threshold.
    FitnessThreshold,
    /// `no_improvement_generations` consecutive generations without a new best.
    Stagnation,
    /// The optional generation cap was hit.
    MaxGenerations,
    /// The optional wall-clock limit elapsed.
    TimeLimit,
    /// The external cancel flag was raised.
    Cancelled,
    /// A baseline search exhausted its frontier.
    Exhausted,
    /// A baseline search hit its expansion cap.
    ExpansionLimit,
}
