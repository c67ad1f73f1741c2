//! SA execution loop.

use super::config::SaConfig;
use super::types::SaProblem;
use crate::error::TspResult;
use rand::Rng;

/// Result of a Simulated Annealing refinement.
#[derive(Debug, Clone)]
pub struct SaResult<S: Clone> {
    /// The best solution found (the input if nothing better was seen).
    pub best: S,

    /// Cost of the best solution.
    pub best_cost: f64,

    /// Total number of iterations (neighbor evaluations).
    pub iterations: usize,

    /// Temperature after the last cooling step.
    pub final_temperature: f64,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of improving moves.
    pub improving_moves: usize,
}

/// Executes the Simulated Annealing algorithm.
pub struct SaRunner;

impl SaRunner {
    /// Refines `initial` for exactly `config.iterations` steps.
    ///
    /// The returned cost is never greater than the cost of `initial`.
    /// The caller owns the RNG so refinement draws from the run's stream.
    ///
    /// # Errors
    ///
    /// Propagates cost evaluation failures; returns
    /// [`TspError::InvalidConfiguration`](crate::TspError::InvalidConfiguration)
    /// for an invalid `config`.
    pub fn refine<P: SaProblem, R: Rng>(
        problem: &P,
        initial: P::Solution,
        config: &SaConfig,
        rng: &mut R,
    ) -> TspResult<SaResult<P::Solution>> {
        config.validate()?;

        let mut current_cost = problem.cost(&initial)?;
        let mut current = initial.clone();
        let mut best = initial;
        let mut best_cost = current_cost;

        let mut temperature = config.initial_temperature;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;

        for _ in 0..config.iterations {
            let neighbor = problem.neighbor(&current, rng);
            let neighbor_cost = problem.cost(&neighbor)?;
            let delta = neighbor_cost - current_cost;

            // Metropolis acceptance criterion
            let accept = if delta < 0.0 {
                improving_moves += 1;
                true
            } else if temperature > 0.0 {
                let probability = (-delta / temperature).exp();
                rng.random_range(0.0..1.0) < probability
            } else {
                false
            };

            if accept {
                current = neighbor;
                current_cost = neighbor_cost;
                accepted_moves += 1;

                if current_cost < best_cost {
                    best = current.clone();
                    best_cost = current_cost;
                }
            }

            temperature *= config.cooling_rate;
        }

        Ok(SaResult {
            best,
            best_cost,
            iterations: config.iterations,
            final_temperature: temperature,
            accepted_moves,
            improving_moves,
        })
    }
}
