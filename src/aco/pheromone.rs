//! Pheromone trail matrix.

use crate::route::Route;

/// NxN pheromone trails, one per directed edge.
///
/// Created with every trail at 1.0, then decayed and reinforced once per
/// generation by the optimization loop. Owned by a single run.
#[derive(Debug, Clone, PartialEq)]
pub struct PheromoneMatrix {
    n: usize,
    trails: Vec<f64>,
}

impl PheromoneMatrix {
    /// All-ones matrix over `n` cities.
    pub fn new(n: usize) -> Self {
        Self {
            n,
            trails: vec![1.0; n * n],
        }
    }

    /// Number of cities.
    pub fn size(&self) -> usize {
        self.n
    }

    /// Trail strength on edge `from -> to`.
    ///
    /// # Panics
    /// Panics if either index is out of range.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.trails[from * self.n + to]
    }

    /// Evaporates every trail by `decay`, then deposits each route's fitness
    /// on every edge it traverses, closing edge included.
    ///
    /// Infinite fitness (zero-length tours) deposits nothing.
    ///
    /// # Panics
    /// Panics if a route references a city outside the matrix.
    pub fn update(&mut self, population: &[Route], fitness_scores: &[f64], decay: f64) {
        let keep = 1.0 - decay;
        for t in &mut self.trails {
            *t *= keep;
        }

        for (route, &fitness) in population.iter().zip(fitness_scores) {
            if !fitness.is_finite() {
                continue;
            }
            for (from, to) in edges(route) {
                self.trails[from * self.n + to] += fitness;
            }
        }
    }

    /// Trail strength of a route: the mean over its consecutive edges plus
    /// the closing edge from the last city back to the first.
    ///
    /// The closing edge is added on top of the mean, not averaged in, so an
    /// untouched matrix scores 2.0 for any route.
    /// Returns 0.0 for routes with fewer than two cities.
    pub fn trail_strength(&self, route: &[usize]) -> f64 {
        if route.len() < 2 {
            return 0.0;
        }
        let sum: f64 = route.windows(2).map(|w| self.get(w[0], w[1])).sum();
        let closing = self.get(route[route.len() - 1], route[0]);
        sum / (route.len() - 1) as f64 + closing
    }

    /// Doubles `base_rate` when the route's [trail strength](Self::trail_strength)
    /// exceeds `threshold`, otherwise returns it unchanged.
    pub fn adjust_mutation_rate(&self, route: &[usize], base_rate: f64, threshold: f64) -> f64 {
        if self.trail_strength(route) > threshold {
            base_rate * 2.0
        } else {
            base_rate
        }
    }
}

/// Consecutive edges of a route plus the closing edge back to the start.
fn edges(route: &[usize]) -> impl Iterator<Item = (usize, usize)> + '_ {
    let closing = match (route.last(), route.first()) {
        (Some(&last), Some(&first)) if route.len() > 1 => Some((last, first)),
        _ => None,
    };
    route.windows(2).map(|w| (w[0], w[1])).chain(closing)
}
