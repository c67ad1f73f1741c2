//! Core trait for Simulated Annealing.

use crate::error::TspResult;
use crate::ga::operators::random_cut_points;
use crate::matrix::DistanceMatrix;
use crate::route::{Route, RouteLayout};
use rand::Rng;

/// Defines the search space the annealer walks.
///
/// The SA runner handles temperature, acceptance and best tracking; the
/// problem supplies the cost function and the move.
///
/// SA minimizes the cost function.
pub trait SaProblem {
    /// The solution representation type.
    type Solution: Clone;

    /// Computes the cost of a solution. Lower is better.
    fn cost(&self, solution: &Self::Solution) -> TspResult<f64>;

    /// Generates a neighbor of the current solution.
    fn neighbor<R: Rng>(&self, solution: &Self::Solution, rng: &mut R) -> Self::Solution;
}

/// Swap neighborhood over the free positions of a route.
///
/// Cost is the full tour distance. Anchored home positions never move.
#[derive(Debug, Clone, Copy)]
pub struct TourNeighborhood<'a> {
    matrix: &'a DistanceMatrix,
    layout: RouteLayout,
}

impl<'a> TourNeighborhood<'a> {
    pub fn new(matrix: &'a DistanceMatrix, layout: RouteLayout) -> Self {
        Self { matrix, layout }
    }
}

impl SaProblem for TourNeighborhood<'_> {
    type Solution = Route;

    fn cost(&self, route: &Route) -> TspResult<f64> {
        self.matrix.tour_distance(route)
    }

    fn neighbor<R: Rng>(&self, route: &Route, rng: &mut R) -> Route {
        let free = self.layout.free_range(route.len());
        let mut next = route.clone();
        if let Some((i, j)) = random_cut_points(free.len(), rng) {
            next.swap(free.start + i, free.start + j);
        }
        next
    }
}
