//! Route fitness and population evaluation.
//!
//! Fitness is the reciprocal of total tour distance, so **higher is better**.
//! A zero-length tour scores `f64::INFINITY`.
//!
//! Population evaluation goes through the [`FitnessEvaluator`] trait so the
//! loop can run on a dedicated rayon pool ([`ParallelEvaluator`]) or inline
//! ([`SequentialEvaluator`]). Both return scores in population order.

use crate::error::TspResult;
use crate::matrix::DistanceMatrix;
use crate::route::Route;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

/// Fitness of a single route: `1 / tour_distance`, or `+inf` if the tour
/// has zero length.
///
/// # Errors
///
/// [`TspError::CityOutOfRange`](crate::TspError::CityOutOfRange) if the
/// route references a city outside the matrix.
pub fn fitness(route: &[usize], matrix: &DistanceMatrix) -> TspResult<f64> {
    let total = matrix.tour_distance(route)?;
    Ok(fitness_from_distance(total))
}

/// Converts a tour distance into a fitness score.
pub fn fitness_from_distance(distance: f64) -> f64 {
    if distance == 0.0 {
        f64::INFINITY
    } else {
        1.0 / distance
    }
}

/// Scores a whole population.
///
/// Implementations must return exactly one score per route, in input order,
/// and must fail the whole batch if any single evaluation fails.
pub trait FitnessEvaluator: Send + Sync {
    /// Evaluates every route against `matrix`.
    fn evaluate(&self, population: &[Route], matrix: &DistanceMatrix) -> TspResult<Vec<f64>>;
}

/// Evaluates routes one after another on the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct SequentialEvaluator;

impl FitnessEvaluator for SequentialEvaluator {
    fn evaluate(&self, population: &[Route], matrix: &DistanceMatrix) -> TspResult<Vec<f64>> {
        population.iter().map(|r| fitness(r, matrix)).collect()
    }
}

/// Evaluates routes on a bounded rayon thread pool owned by the evaluator.
pub struct ParallelEvaluator {
    pool: ThreadPool,
}

impl ParallelEvaluator {
    /// Creates a pool with `workers` threads, or one per available core.
    pub fn new(workers: Option<usize>) -> TspResult<Self> {
        let workers = workers.unwrap_or_else(default_workers);
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("u-tsp-fitness-{i}"))
            .build()?;
        Ok(Self { pool })
    }

    /// Number of worker threads.
    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }
}

impl std::fmt::Debug for ParallelEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParallelEvaluator")
            .field("workers", &self.workers())
            .finish()
    }
}

impl FitnessEvaluator for ParallelEvaluator {
    fn evaluate(&self, population: &[Route], matrix: &DistanceMatrix) -> TspResult<Vec<f64>> {
        // Indexed parallel collect keeps input order.
        self.pool.install(|| {
            population
                .par_iter()
                .map(|r| fitness(r, matrix))
                .collect()
        })
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
