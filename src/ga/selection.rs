//! Fitness-proportionate parent selection.
//!
//! Fitness here is `1 / distance`, so **higher is better** and the raw score
//! can be used directly as the roulette weight.
//!
//! # References
//!
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use crate::error::{TspError, TspResult};
use crate::route::Route;
use rand::Rng;

/// Samples `count` parents with replacement, each with probability
/// `fitness_i / sum(fitness)`.
///
/// Routes with infinite fitness (zero-length tours) dominate any finite
/// weight, so when present the draw is uniform over them.
///
/// # Errors
///
/// [`TspError::InvalidState`] if the population is empty, the score count
/// does not match, any score is negative or NaN, or the sum is not positive.
pub fn select_parents<R: Rng>(
    population: &[Route],
    fitness_scores: &[f64],
    count: usize,
    rng: &mut R,
) -> TspResult<Vec<Route>> {
    if population.len() != fitness_scores.len() {
        return Err(TspError::state(format!(
            "{} routes but {} fitness scores",
            population.len(),
            fitness_scores.len()
        )));
    }
    let indices = select_parent_indices(fitness_scores, count, rng)?;
    Ok(indices.into_iter().map(|i| population[i].clone()).collect())
}

/// Roulette-wheel sampling of indices into `fitness_scores`.
pub fn select_parent_indices<R: Rng>(
    fitness_scores: &[f64],
    count: usize,
    rng: &mut R,
) -> TspResult<Vec<usize>> {
    if fitness_scores.is_empty() {
        return Err(TspError::state("cannot select from an empty population"));
    }
    if let Some(bad) = fitness_scores.iter().find(|f| f.is_nan() || **f < 0.0) {
        return Err(TspError::state(format!("invalid fitness score {bad}")));
    }

    let infinite: Vec<usize> = fitness_scores
        .iter()
        .enumerate()
        .filter(|(_, f)| f.is_infinite())
        .map(|(i, _)| i)
        .collect();
    if !infinite.is_empty() {
        return Ok((0..count)
            .map(|_| infinite[rng.random_range(0..infinite.len())])
            .collect());
    }

    let total: f64 = fitness_scores.iter().sum();
    if total <= 0.0 {
        return Err(TspError::state(format!(
            "fitness sum must be positive, got {total}"
        )));
    }

    if total.is_finite() {
        return Ok((0..count)
            .map(|_| roulette(fitness_scores, total, rng))
            .collect());
    }

    // Finite scores overflowed the sum; spin on weights scaled by the largest.
    let max = fitness_scores.iter().copied().fold(0.0, f64::max);
    let scaled: Vec<f64> = fitness_scores.iter().map(|f| f / max).collect();
    let total: f64 = scaled.iter().sum();
    Ok((0..count).map(|_| roulette(&scaled, total, rng)).collect())
}

/// One spin of the wheel. Linear scan over cumulative weights.
fn roulette<R: Rng>(weights: &[f64], total: f64, rng: &mut R) -> usize {
    let spin = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w;
        if spin < cumulative {
            return i;
        }
    }
    // Floating-point slack: land on the last route with non-zero weight.
    weights.iter().rposition(|&w| w > 0.0).unwrap_or(weights.len() - 1)
}
