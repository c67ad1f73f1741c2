//! GA evolutionary loop execution.
//!
//! [`GaStream`] advances the loop one generation per [`Iterator::next`]:
//! evaluation → best tracking → optional annealing → emit → stop check, and
//! on the following call selection → crossover → mutation → elitism →
//! pheromone update before evaluating again. Nothing is computed ahead of
//! what the consumer pulls.
//!
//! [`GaRunner`] builds streams and offers a batch [`GaRunner::run`] that
//! drains one into a [`GaResult`].

use super::config::GaConfig;
use super::operators::mutate;
use super::selection::select_parents;
use super::types::{BestSolution, ProgressRecord, StopReason};
use crate::aco::PheromoneMatrix;
use crate::error::{TspError, TspResult};
use crate::fitness::{fitness_from_distance, FitnessEvaluator, ParallelEvaluator, SequentialEvaluator};
use crate::matrix::DistanceMatrix;
use crate::population;
use crate::random::rng_from_seed;
use crate::route::{Route, RouteLayout};
use crate::sa::{SaRunner, TourNeighborhood};
use rand::rngs::StdRng;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Result of a batch GA run.
#[derive(Debug, Clone)]
pub struct GaResult {
    /// The last record emitted (the final best-known solution).
    ///
    /// `None` only if the run was cancelled before its first generation.
    pub best: Option<ProgressRecord>,

    /// Total number of generations that emitted a record.
    pub generations: usize,

    /// Why the run stopped.
    pub stop_reason: StopReason,

    /// Best-known fitness after each generation.
    pub fitness_history: Vec<f64>,
}

/// Builds and drives GA runs.
///
/// # Usage
///
/// ```
/// use u_tsp::{DistanceMatrix, ga::{GaConfig, GaRunner}};
///
/// let matrix = DistanceMatrix::new(vec![
///     vec![0.0, 2.0, 9.0, 10.0],
///     vec![1.0, 0.0, 6.0, 4.0],
///     vec![15.0, 7.0, 0.0, 8.0],
///     vec![6.0, 3.0, 12.0, 0.0],
/// ]).unwrap();
/// let config = GaConfig::default().with_population_size(20).with_seed(42);
///
/// for record in GaRunner::stream(&matrix, &config).unwrap() {
///     let record = record.unwrap();
///     println!("gen {}: {:.1}", record.generation, record.distance);
/// }
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Creates a lazy stream of progress records.
    ///
    /// The evaluator is a [`ParallelEvaluator`] when `config.parallel` is
    /// set, otherwise a [`SequentialEvaluator`].
    ///
    /// # Errors
    ///
    /// [`TspError::InvalidConfiguration`] for an invalid configuration or a
    /// home city outside the matrix; [`TspError::WorkerPool`] if the worker
    /// pool cannot start.
    pub fn stream<'a>(matrix: &'a DistanceMatrix, config: &GaConfig) -> TspResult<GaStream<'a>> {
        config.validate()?;
        let evaluator: Box<dyn FitnessEvaluator + 'a> = if config.parallel {
            Box::new(ParallelEvaluator::new(config.workers)?)
        } else {
            Box::new(SequentialEvaluator)
        };
        Self::stream_with_evaluator(matrix, config, evaluator)
    }

    /// Creates a stream that scores populations with a caller-provided
    /// evaluator. `config.parallel` and `config.workers` are ignored.
    pub fn stream_with_evaluator<'a>(
        matrix: &'a DistanceMatrix,
        config: &GaConfig,
        evaluator: Box<dyn FitnessEvaluator + 'a>,
    ) -> TspResult<GaStream<'a>> {
        GaStream::new(matrix, config.clone(), evaluator)
    }

    /// Runs the GA to completion.
    pub fn run(matrix: &DistanceMatrix, config: &GaConfig) -> TspResult<GaResult> {
        Self::run_with_cancel(matrix, config, None)
    }

    /// Runs the GA with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the GA stops at
    /// the next generation boundary and returns the best solution found so
    /// far.
    pub fn run_with_cancel(
        matrix: &DistanceMatrix,
        config: &GaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> TspResult<GaResult> {
        let mut stream = Self::stream(matrix, config)?;
        if let Some(flag) = cancel {
            stream = stream.with_cancel(flag);
        }

        let mut best = None;
        let mut fitness_history = Vec::new();
        for record in stream.by_ref() {
            let record = record?;
            fitness_history.push(record.fitness);
            best = Some(record);
        }

        let stop_reason = stream
            .stop_reason()
            .ok_or_else(|| TspError::state("stream ended without a stop reason"))?;

        Ok(GaResult {
            generations: fitness_history.len(),
            best,
            stop_reason,
            fitness_history,
        })
    }
}

/// Lazy, finite, non-restartable sequence of GA progress records.
///
/// Yields `Ok(record)` once per generation and ends after the record on
/// which a stop condition fired. An `Err` is fatal: the stream yields
/// nothing after it.
pub struct GaStream<'a> {
    matrix: &'a DistanceMatrix,
    config: GaConfig,
    layout: RouteLayout,
    evaluator: Box<dyn FitnessEvaluator + 'a>,
    rng: StdRng,
    population: Vec<Route>,
    /// Scores of `population`, filled by the last evaluation.
    scores: Vec<f64>,
    /// Best route of the last evaluated generation (the elitism source).
    generation_best: Option<Route>,
    best: Option<BestSolution>,
    pheromones: Option<PheromoneMatrix>,
    generation: usize,
    stagnation: usize,
    cancel: Option<Arc<AtomicBool>>,
    started: Instant,
    stop_reason: Option<StopReason>,
    finished: bool,
}

impl<'a> GaStream<'a> {
    fn new(
        matrix: &'a DistanceMatrix,
        config: GaConfig,
        evaluator: Box<dyn FitnessEvaluator + 'a>,
    ) -> TspResult<Self> {
        config.validate()?;

        let num_cities = matrix.size();
        let layout = RouteLayout::from_home(config.home_city);
        let mut rng = rng_from_seed(config.seed);
        let population = population::initialize(config.population_size, num_cities, layout, &mut rng)?;

        if config.sa.is_some() && layout.free_range(layout.route_len(num_cities)).len() < 2 {
            warn!(num_cities, "fewer than two free positions, annealing moves will be no-ops");
        }

        info!(
            num_cities,
            population_size = config.population_size,
            crossover = ?config.crossover,
            elitism = config.elitism,
            aco = config.aco.is_some(),
            sa = config.sa.is_some(),
            "starting GA run"
        );

        Ok(Self {
            matrix,
            pheromones: config.aco.as_ref().map(|_| PheromoneMatrix::new(num_cities)),
            config,
            layout,
            evaluator,
            rng,
            population,
            scores: Vec::new(),
            generation_best: None,
            best: None,
            generation: 0,
            stagnation: 0,
            cancel: None,
            started: Instant::now(),
            stop_reason: None,
            finished: false,
        })
    }

    /// Attaches an external cancellation flag, checked at generation
    /// boundaries.
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Why the stream ended, once it has.
    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop_reason
    }

    /// Number of generations evaluated so far.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Best-known solution so far.
    pub fn best(&self) -> Option<&BestSolution> {
        self.best.as_ref()
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    fn stop(&mut self, reason: StopReason) {
        if reason == StopReason::Cancelled {
            warn!(generation = self.generation, "GA run cancelled");
        } else {
            info!(
                generation = self.generation,
                reason = ?reason,
                best_distance = self.best.as_ref().map(|b| b.distance),
                "GA run finished"
            );
        }
        self.stop_reason = Some(reason);
        self.finished = true;
    }

    /// Runs one generation. `Ok(None)` means the stream ended without a
    /// record (cancellation).
    fn advance(&mut self) -> TspResult<Option<ProgressRecord>> {
        if self.is_cancelled() {
            self.stop(StopReason::Cancelled);
            return Ok(None);
        }

        if self.generation > 0 {
            self.breed()?;
        }
        self.generation += 1;

        // 1. Evaluate
        let scores = self.evaluator.evaluate(&self.population, self.matrix)?;
        if scores.len() != self.population.len() {
            return Err(TspError::state(format!(
                "evaluator returned {} scores for {} routes",
                scores.len(),
                self.population.len()
            )));
        }
        if self.is_cancelled() {
            self.stop(StopReason::Cancelled);
            return Ok(None);
        }

        // 2. Track best
        let (best_idx, gen_fitness) = argmax(&scores)?;
        let improved = self.best.as_ref().is_none_or(|b| gen_fitness > b.fitness);
        if improved {
            let route = self.population[best_idx].clone();
            let distance = self.matrix.tour_distance(&route)?;
            info!(generation = self.generation, distance, "new best route");
            self.best = Some(BestSolution {
                route,
                distance,
                fitness: gen_fitness,
            });
            self.stagnation = 0;
        } else {
            self.stagnation += 1;
        }
        self.generation_best = Some(self.population[best_idx].clone());
        self.scores = scores;

        // 3. Refine
        if let (Some(sa), Some(best)) = (&self.config.sa, &mut self.best) {
            let problem = TourNeighborhood::new(self.matrix, self.layout);
            let result = SaRunner::refine(&problem, best.route.clone(), sa, &mut self.rng)?;
            if result.best_cost < best.distance {
                debug!(
                    generation = self.generation,
                    from = best.distance,
                    to = result.best_cost,
                    "annealing shortened best route"
                );
                best.route = result.best;
                best.distance = result.best_cost;
                best.fitness = fitness_from_distance(result.best_cost);
            }
        }

        // 4. Emit
        let best = self
            .best
            .as_ref()
            .ok_or_else(|| TspError::state("no best route after evaluation"))?;
        self.layout.validate(&best.route, self.matrix.size())?;
        let record = best.to_record(self.generation);
        debug!(
            generation = self.generation,
            stagnation = self.stagnation,
            best_distance = record.distance,
            "generation complete"
        );

        // 5. Stop conditions
        if let Some(reason) = self.check_termination(record.fitness) {
            self.stop(reason);
        }

        Ok(Some(record))
    }

    fn check_termination(&self, best_fitness: f64) -> Option<StopReason> {
        if self
            .config
            .fitness_threshold
            .is_some_and(|threshold| best_fitness >= threshold)
        {
            return Some(StopReason::FitnessThreshold);
        }
        if self.stagnation >= self.config.no_improvement_generations {
            return Some(StopReason::Stagnation);
        }
        if self
            .config
            .max_generations
            .is_some_and(|max| self.generation >= max)
        {
            return Some(StopReason::MaxGenerations);
        }
        if self
            .config
            .time_limit_ms
            .is_some_and(|ms| self.started.elapsed() >= Duration::from_millis(ms))
        {
            return Some(StopReason::TimeLimit);
        }
        None
    }

    /// 6. Builds the next population from the last evaluated one.
    fn breed(&mut self) -> TspResult<()> {
        let pop_size = self.config.population_size;
        let num_cities = self.matrix.size();
        let parents = select_parents(&self.population, &self.scores, pop_size, &mut self.rng)?;

        let mut next: Vec<Route> = Vec::with_capacity(pop_size);
        for pair in parents.chunks_exact(2) {
            let free = self.layout.free_range(pair[0].len());
            let (a, b) = (&pair[0][free.clone()], &pair[1][free.clone()]);

            let (child1, child2) = if self.rng.random_range(0.0..1.0) < self.config.crossover_rate {
                self.config.crossover.apply(a, b, &mut self.rng)
            } else {
                (a.to_vec(), b.to_vec())
            };

            for child in [child1, child2] {
                let child = self.layout.assemble(child);
                let rate = match (&self.pheromones, &self.config.aco) {
                    (Some(pheromones), Some(aco)) => pheromones.adjust_mutation_rate(
                        &child,
                        self.config.mutation_rate,
                        aco.pheromone_threshold,
                    ),
                    _ => self.config.mutation_rate,
                };
                let mutated = mutate(&child[free.clone()], rate, &mut self.rng);
                let child = self.layout.assemble(mutated);
                self.layout.validate(&child, num_cities)?;
                next.push(child);
            }
        }

        if self.config.elitism {
            if let Some(elite) = &self.generation_best {
                next[0] = elite.clone();
            }
        }

        if let (Some(pheromones), Some(aco)) = (&mut self.pheromones, &self.config.aco) {
            pheromones.update(&self.population, &self.scores, aco.decay);
        }

        self.population = next;
        Ok(())
    }
}

impl Iterator for GaStream<'_> {
    type Item = TspResult<ProgressRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.advance() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => None,
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl std::iter::FusedIterator for GaStream<'_> {}

/// Index and value of the first maximum score.
fn argmax(scores: &[f64]) -> TspResult<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &s) in scores.iter().enumerate() {
        if s.is_nan() {
            return Err(TspError::state(format!("fitness of route {i} is NaN")));
        }
        if best.is_none_or(|(_, b)| s > b) {
            best = Some((i, s));
        }
    }
    best.ok_or_else(|| TspError::state("cannot score an empty population"))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aco::AcoConfig;
    use crate::ga::Crossover;
    use crate::sa::SaConfig;

    fn ring(n: usize) -> DistanceMatrix {
        let rows = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| {
                        let d = i.abs_diff(j);
                        d.min(n - d) as f64
                    })
                    .collect()
            })
            .collect();
        DistanceMatrix::new(rows).unwrap()
    }

    fn base_config() -> GaConfig {
        GaConfig::default()
            .with_population_size(30)
            .with_mutation_rate(0.05)
            .with_no_improvement_generations(15)
            .with_max_generations(400)
            .with_parallel(false)
            .with_seed(42)
    }

    #[test]
    fn test_records_are_valid_and_monotone() {
        let matrix = ring(9);
        let config = base_config().with_crossover(Crossover::Pmx);
        let layout = RouteLayout::Anchored { home: 0 };

        let records: Vec<ProgressRecord> = GaRunner::stream(&matrix, &config)
            .unwrap()
            .map(|r| r.unwrap())
            .collect();

        assert!(!records.is_empty());
        for (i, rec) in records.iter().enumerate() {
            assert_eq!(rec.generation, i + 1);
            assert!(layout.validate(&rec.route, 9).is_ok());
            assert!((rec.distance - matrix.tour_distance(&rec.route).unwrap()).abs() < 1e-9);
            assert!((rec.fitness - 1.0 / rec.distance).abs() < 1e-12);
        }
        for w in records.windows(2) {
            assert!(w[1].fitness >= w[0].fitness);
        }
    }

    #[test]
    fn test_stagnation_stop_after_k_non_improving() {
        let matrix = ring(8);
        let k = 5;
        let config = base_config()
            .with_no_improvement_generations(k)
            .with_crossover(Crossover::Ox);

        let mut stream = GaRunner::stream(&matrix, &config).unwrap();
        let records: Vec<ProgressRecord> = stream.by_ref().map(|r| r.unwrap()).collect();

        assert_eq!(stream.stop_reason(), Some(StopReason::Stagnation));
        let last_improvement = records
            .windows(2)
            .rposition(|w| w[1].fitness > w[0].fitness)
            .map_or(1, |i| i + 2);
        assert_eq!(records.len() - last_improvement, k);
    }

    // ---- Elitism ----

    #[test]
    fn test_elitism_carries_generation_best_into_slot_zero() {
        let matrix = ring(10);
        let config = base_config()
            .with_population_size(6)
            .with_mutation_rate(1.0)
            .with_crossover(Crossover::Pmx)
            .with_crossover_rate(1.0)
            .with_elitism(true);
        let mut stream = GaRunner::stream(&matrix, &config).unwrap();
        stream.next().unwrap().unwrap();

        for _ in 0..3 {
            let elite = stream.generation_best.clone().unwrap();
            // breeds from the evaluated generation, then evaluates the children
            stream.next().unwrap().unwrap();
            assert_eq!(stream.population[0], elite);
        }
    }

    #[test]
    fn test_elitism_ignores_annealed_best() {
        let matrix = ring(10);
        let config = base_config()
            .with_population_size(4)
            .with_elitism(true)
            .with_sa(
                SaConfig::default()
                    .with_initial_temperature(2.0)
                    .with_iterations(500),
            );
        let mut stream = GaRunner::stream(&matrix, &config).unwrap();
        stream.next().unwrap().unwrap();

        let elite = stream.generation_best.clone().unwrap();
        let annealed = stream.best().unwrap().route.clone();
        assert_ne!(annealed, elite);

        stream.next().unwrap().unwrap();
        assert_eq!(stream.population[0], elite);
    }

    #[test]
    fn test_without_elitism_children_are_selected_parents() {
        let matrix = ring(10);
        let config = base_config()
            .with_population_size(4)
            .with_crossover(Crossover::None)
            .with_mutation_rate(0.0);
        let mut stream = GaRunner::stream(&matrix, &config).unwrap();
        stream.next().unwrap().unwrap();
        let parents = stream.population.clone();
        stream.next().unwrap().unwrap();
        // No crossover and no mutation: every child is a selected parent.
        for child in &stream.population {
            assert!(parents.contains(child));
        }
    }

    #[test]
    fn test_fitness_threshold_stops_immediately() {
        let matrix = ring(6);
        // Any tour has fitness > 0, so a zero threshold fires on generation 1.
        let config = base_config().with_fitness_threshold(0.0);
        let result = GaRunner::run(&matrix, &config).unwrap();
        assert_eq!(result.generations, 1);
        assert_eq!(result.stop_reason, StopReason::FitnessThreshold);
    }

    #[test]
    fn test_ring_reaches_optimum() {
        let matrix = ring(6);
        let config = base_config()
            .with_population_size(40)
            .with_crossover(Crossover::Pmx)
            .with_elitism(true)
            .with_no_improvement_generations(300)
            .with_max_generations(2000)
            .with_sa(SaConfig::default().with_initial_temperature(2.0).with_iterations(300))
            .with_fitness_threshold(1.0 / 6.0);
        let result = GaRunner::run(&matrix, &config).unwrap();
        let best = result.best.unwrap();
        assert_eq!(result.stop_reason, StopReason::FitnessThreshold);
        assert!((best.distance - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_max_generations_cap() {
        let matrix = ring(10);
        let config = base_config()
            .with_no_improvement_generations(10_000)
            .with_max_generations(12);
        let result = GaRunner::run(&matrix, &config).unwrap();
        assert_eq!(result.generations, 12);
        assert_eq!(result.stop_reason, StopReason::MaxGenerations);
        assert_eq!(result.fitness_history.len(), 12);
    }

    #[test]
    fn test_cancelled_before_start() {
        let matrix = ring(6);
        let cancel = Arc::new(AtomicBool::new(true));
        let result = GaRunner::run_with_cancel(&matrix, &base_config(), Some(cancel)).unwrap();
        assert!(result.best.is_none());
        assert_eq!(result.generations, 0);
        assert_eq!(result.stop_reason, StopReason::Cancelled);
    }

    #[test]
    fn test_cancel_mid_run_emits_nothing_further() {
        let matrix = ring(8);
        let config = base_config().with_no_improvement_generations(10_000);
        let cancel = Arc::new(AtomicBool::new(false));
        let mut stream = GaRunner::stream(&matrix, &config)
            .unwrap()
            .with_cancel(cancel.clone());

        assert!(stream.next().is_some());
        assert!(stream.next().is_some());
        cancel.store(true, Ordering::Relaxed);
        assert!(stream.next().is_none());
        assert!(stream.next().is_none());
        assert_eq!(stream.stop_reason(), Some(StopReason::Cancelled));
        assert_eq!(stream.generation(), 2);
    }

    #[test]
    fn test_same_seed_same_records() {
        let matrix = ring(9);
        let config = base_config().with_crossover(Crossover::Ox).with_elitism(true);
        let a = GaRunner::run(&matrix, &config).unwrap();
        let b = GaRunner::run(&matrix, &config.clone().with_parallel(true).with_workers(2)).unwrap();
        assert_eq!(a.fitness_history, b.fitness_history);
        assert_eq!(a.best, b.best);
    }

    #[test]
    fn test_cycle_layout() {
        let matrix = ring(6);
        let config = base_config().with_home_city(None).with_crossover(Crossover::Pmx);
        let result = GaRunner::run(&matrix, &config).unwrap();
        let best = result.best.unwrap();
        assert_eq!(best.route.len(), 6);
        assert!(RouteLayout::Cycle.validate(&best.route, 6).is_ok());
    }

    #[test]
    fn test_aco_and_sa_enabled() {
        let matrix = ring(10);
        let config = base_config()
            .with_crossover(Crossover::Pmx)
            .with_aco(AcoConfig::default().with_pheromone_threshold(1.5))
            .with_sa(SaConfig::default().with_initial_temperature(2.0).with_iterations(50));
        let layout = RouteLayout::Anchored { home: 0 };

        let mut previous = 0.0;
        for record in GaRunner::stream(&matrix, &config).unwrap() {
            let record = record.unwrap();
            assert!(layout.validate(&record.route, 10).is_ok());
            assert!(record.fitness >= previous);
            previous = record.fitness;
        }
    }

    #[test]
    fn test_two_cities() {
        let matrix = DistanceMatrix::new(vec![vec![0.0, 3.0], vec![4.0, 0.0]]).unwrap();
        let config = base_config()
            .with_population_size(2)
            .with_crossover(Crossover::Pmx)
            .with_sa(SaConfig::default());
        let result = GaRunner::run(&matrix, &config).unwrap();
        let best = result.best.unwrap();
        assert_eq!(best.route, vec![0, 1, 0]);
        assert_eq!(best.distance, 7.0);
        assert_eq!(result.stop_reason, StopReason::Stagnation);
    }

    #[test]
    fn test_invalid_home_city() {
        let matrix = ring(5);
        let config = base_config().with_home_city(Some(5));
        assert!(matches!(
            GaRunner::stream(&matrix, &config),
            Err(TspError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_invalid_config_rejected_before_running() {
        let matrix = ring(5);
        let config = base_config().with_population_size(5);
        assert!(matches!(
            GaRunner::run(&matrix, &config),
            Err(TspError::InvalidConfiguration(_))
        ));
    }

    struct FailingEvaluator;

    impl FitnessEvaluator for FailingEvaluator {
        fn evaluate(&self, _: &[Route], _: &DistanceMatrix) -> TspResult<Vec<f64>> {
            Err(TspError::CityOutOfRange { city: 99, size: 5 })
        }
    }

    #[test]
    fn test_evaluation_error_is_fatal() {
        let matrix = ring(5);
        let mut stream =
            GaRunner::stream_with_evaluator(&matrix, &base_config(), Box::new(FailingEvaluator))
                .unwrap();
        assert!(matches!(stream.next(), Some(Err(TspError::CityOutOfRange { .. }))));
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_argmax_first_maximum() {
        assert_eq!(argmax(&[0.1, 0.5, 0.5, 0.2]).unwrap(), (1, 0.5));
        assert!(argmax(&[]).is_err());
        assert!(argmax(&[0.1, f64::NAN]).is_err());
    }
}
