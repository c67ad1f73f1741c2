//! Frontier nodes and heuristics for the baseline searches.

use crate::matrix::DistanceMatrix;
use std::cmp::Ordering;

/// Estimates the cost of completing a partial tour.
///
/// `path` is never empty and starts at `start`.
pub trait Heuristic {
    /// Lower-bound-style estimate of the remaining cost from the last city
    /// of `path`.
    fn estimate(&self, matrix: &DistanceMatrix, path: &[usize], start: usize) -> f64;
}

/// Always zero: the frontier is ordered by accumulated cost alone
/// (uniform-cost search).
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroHeuristic;

impl Heuristic for ZeroHeuristic {
    fn estimate(&self, _: &DistanceMatrix, _: &[usize], _: usize) -> f64 {
        0.0
    }
}

/// Cheapest single edge from the current city to any unvisited city.
///
/// Once every city is visited the estimate is the closing edge back to the
/// start, which is exact. This is a documented heuristic choice, not a tight
/// bound on the remaining tour.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinUnvisitedEdge;

impl Heuristic for MinUnvisitedEdge {
    fn estimate(&self, matrix: &DistanceMatrix, path: &[usize], start: usize) -> f64 {
        let Some(&current) = path.last() else {
            return 0.0;
        };
        (0..matrix.size())
            .filter(|c| !path.contains(c))
            .map(|c| matrix.at(current, c))
            .min_by(f64::total_cmp)
            .unwrap_or_else(|| matrix.at(current, start))
    }
}

/// A partial path on the frontier.
///
/// Ordered so that [`std::collections::BinaryHeap`] pops the lowest
/// priority first; ties fall back to accumulated cost, then to the path.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub priority: f64,
    pub cost: f64,
    pub path: Vec<usize>,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Node {}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.cost.total_cmp(&self.cost))
            .then_with(|| other.path.cmp(&self.path))
    }
}
