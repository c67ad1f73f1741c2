//! Frontier search execution.

use super::config::SearchConfig;
use super::types::{Heuristic, MinUnvisitedEdge, Node, ZeroHeuristic};
use crate::error::TspResult;
use crate::fitness::fitness_from_distance;
use crate::ga::{BestSolution, ProgressRecord, StopReason};
use crate::matrix::DistanceMatrix;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of a drained baseline search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Best complete tour, `None` if none was completed.
    pub best: Option<ProgressRecord>,

    /// Frontier nodes expanded.
    pub expansions: usize,

    /// Why the search stopped.
    pub stop_reason: StopReason,
}

/// Builds and drives the baseline searches.
///
/// Both searches expand partial paths out of `start_city`, never revisiting
/// a city, and close each complete path back to the start.
///
/// # Usage
///
/// ```
/// use u_tsp::{DistanceMatrix, search::{SearchConfig, SearchRunner}};
///
/// let matrix = DistanceMatrix::new(vec![
///     vec![0.0, 1.0, 2.0, 3.0],
///     vec![1.0, 0.0, 1.0, 2.0],
///     vec![2.0, 1.0, 0.0, 1.0],
///     vec![3.0, 2.0, 1.0, 0.0],
/// ]).unwrap();
///
/// let result = SearchRunner::run(SearchRunner::a_star(&matrix, &SearchConfig::default()).unwrap());
/// assert_eq!(result.best.unwrap().distance, 6.0);
/// ```
pub struct SearchRunner;

impl SearchRunner {
    /// Best-first (uniform-cost) search: frontier ordered by accumulated cost.
    pub fn best_first<'a>(
        matrix: &'a DistanceMatrix,
        config: &SearchConfig,
    ) -> TspResult<SearchStream<'a, ZeroHeuristic>> {
        Self::stream(matrix, config, ZeroHeuristic)
    }

    /// A* search: frontier ordered by accumulated cost plus
    /// [`MinUnvisitedEdge`].
    pub fn a_star<'a>(
        matrix: &'a DistanceMatrix,
        config: &SearchConfig,
    ) -> TspResult<SearchStream<'a, MinUnvisitedEdge>> {
        Self::stream(matrix, config, MinUnvisitedEdge)
    }

    /// Frontier search with an arbitrary heuristic.
    ///
    /// # Errors
    ///
    /// [`TspError::InvalidConfiguration`](crate::TspError::InvalidConfiguration)
    /// if `start_city` is out of range or `max_expansions` is zero.
    pub fn stream<'a, H: Heuristic>(
        matrix: &'a DistanceMatrix,
        config: &SearchConfig,
        heuristic: H,
    ) -> TspResult<SearchStream<'a, H>> {
        config.validate(matrix.size())?;
        Ok(SearchStream::new(matrix, config, heuristic))
    }

    /// Drains a search stream into a [`SearchResult`].
    pub fn run<H: Heuristic>(mut stream: SearchStream<'_, H>) -> SearchResult {
        let best = stream.by_ref().last();
        SearchResult {
            best,
            expansions: stream.expansions(),
            stop_reason: stream.stop_reason().unwrap_or(StopReason::Exhausted),
        }
    }
}

/// Lazy sequence of improving complete tours.
///
/// `generation` in each record is the number of frontier nodes expanded so
/// far. When the frontier is exhausted or the expansion cap is hit, one
/// final record repeats the best tour with the total expansion count.
/// Cancellation ends the stream without that final record.
pub struct SearchStream<'a, H> {
    matrix: &'a DistanceMatrix,
    heuristic: H,
    start: usize,
    max_expansions: Option<usize>,
    frontier: BinaryHeap<Node>,
    best: Option<BestSolution>,
    expansions: usize,
    cancel: Option<Arc<AtomicBool>>,
    stop_reason: Option<StopReason>,
}

impl<'a, H: Heuristic> SearchStream<'a, H> {
    fn new(matrix: &'a DistanceMatrix, config: &SearchConfig, heuristic: H) -> Self {
        let start = config.start_city;
        let path = vec![start];
        let mut frontier = BinaryHeap::new();
        frontier.push(Node {
            priority: heuristic.estimate(matrix, &path, start),
            cost: 0.0,
            path,
        });

        info!(
            num_cities = matrix.size(),
            start_city = start,
            max_expansions = config.max_expansions,
            "starting frontier search"
        );

        Self {
            matrix,
            heuristic,
            start,
            max_expansions: config.max_expansions,
            frontier,
            best: None,
            expansions: 0,
            cancel: None,
            stop_reason: None,
        }
    }

    /// Attaches an external cancellation flag, checked before each expansion.
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Frontier nodes expanded so far.
    pub fn expansions(&self) -> usize {
        self.expansions
    }

    /// Current frontier size.
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Why the stream ended, once it has.
    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop_reason
    }

    /// Ends the stream, returning the closing record if a tour was found.
    fn finish(&mut self, reason: StopReason) -> Option<ProgressRecord> {
        info!(
            expansions = self.expansions,
            reason = ?reason,
            best_distance = self.best.as_ref().map(|b| b.distance),
            "frontier search finished"
        );
        self.stop_reason = Some(reason);
        self.frontier.clear();
        self.best.as_ref().map(|b| b.to_record(self.expansions))
    }

    fn expand(&mut self, node: Node) {
        let current = node.path[node.path.len() - 1];
        for next in 0..self.matrix.size() {
            if node.path.contains(&next) {
                continue;
            }
            let cost = node.cost + self.matrix.at(current, next);
            let mut path = Vec::with_capacity(node.path.len() + 1);
            path.extend_from_slice(&node.path);
            path.push(next);
            let priority = cost + self.heuristic.estimate(self.matrix, &path, self.start);
            self.frontier.push(Node { priority, cost, path });
        }
    }
}

impl<H: Heuristic> Iterator for SearchStream<'_, H> {
    type Item = ProgressRecord;

    fn next(&mut self) -> Option<ProgressRecord> {
        loop {
            if self.stop_reason.is_some() {
                return None;
            }
            if self.cancel.as_ref().is_some_and(|f| f.load(Ordering::Relaxed)) {
                warn!(expansions = self.expansions, "frontier search cancelled");
                self.stop_reason = Some(StopReason::Cancelled);
                return None;
            }
            if self.max_expansions.is_some_and(|max| self.expansions >= max) {
                return self.finish(StopReason::ExpansionLimit);
            }
            let Some(node) = self.frontier.pop() else {
                return self.finish(StopReason::Exhausted);
            };
            self.expansions += 1;

            if node.path.len() < self.matrix.size() {
                self.expand(node);
                continue;
            }

            let last = node.path[node.path.len() - 1];
            let distance = node.cost + self.matrix.at(last, self.start);
            if self.best.as_ref().is_some_and(|b| distance >= b.distance) {
                continue;
            }

            let mut route = node.path;
            route.push(self.start);
            debug!(expansions = self.expansions, distance, "improved complete tour");
            let best = BestSolution {
                route,
                distance,
                fitness: fitness_from_distance(distance),
            };
            let record = best.to_record(self.expansions);
            self.best = Some(best);
            return Some(record);
        }
    }
}

impl<H: Heuristic> std::iter::FusedIterator for SearchStream<'_, H> {}
