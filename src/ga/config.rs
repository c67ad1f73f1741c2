//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the evolutionary loop,
//! including the optional pheromone and annealing add-ons.

use super::operators::Crossover;
use crate::aco::AcoConfig;
use crate::error::{TspError, TspResult};
use crate::sa::SaConfig;

/// Configuration for the route-optimizing Genetic Algorithm.
///
/// # Defaults
///
/// ```
/// use u_tsp::ga::{Crossover, GaConfig};
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.crossover, Crossover::None);
/// assert_eq!(config.no_improvement_generations, 20);
/// assert_eq!(config.home_city, Some(0));
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_tsp::aco::AcoConfig;
/// use u_tsp::ga::{Crossover, GaConfig};
/// use u_tsp::sa::SaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(200)
///     .with_crossover(Crossover::Pmx)
///     .with_elitism(true)
///     .with_aco(AcoConfig::default().with_pheromone_threshold(2.0))
///     .with_sa(SaConfig::default().with_iterations(50))
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaConfig {
    /// Number of routes per generation. Must be even and at least 2.
    pub population_size: usize,

    /// Per-position swap probability (0.0–1.0).
    pub mutation_rate: f64,

    /// Probability of applying crossover to a parent pair (0.0–1.0).
    ///
    /// When crossover is not applied, both parents pass through unchanged.
    pub crossover_rate: f64,

    /// Crossover strategy.
    pub crossover: Crossover,

    /// Overwrite slot 0 of each new generation with the previous
    /// generation's best route.
    pub elitism: bool,

    /// Stop once best-known fitness reaches this value.
    pub fitness_threshold: Option<f64>,

    /// Stop after this many consecutive generations without a new best.
    pub no_improvement_generations: usize,

    /// Optional hard cap on the number of generations.
    ///
    /// `None` (the default) lets an ever-improving run continue until
    /// another stop condition fires.
    pub max_generations: Option<usize>,

    /// Optional wall-clock limit in milliseconds, checked once per
    /// generation after the record is emitted.
    pub time_limit_ms: Option<u64>,

    /// Home city that every route starts and ends at.
    ///
    /// `None` optimizes plain cyclic permutations.
    pub home_city: Option<usize>,

    /// Pheromone-modulated mutation. `None` disables it.
    pub aco: Option<AcoConfig>,

    /// Annealing refinement of the best-known route. `None` disables it.
    pub sa: Option<SaConfig>,

    /// Whether to evaluate fitness on a worker pool.
    pub parallel: bool,

    /// Worker pool size. `None` uses available hardware parallelism.
    pub workers: Option<usize>,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            mutation_rate: 0.01,
            crossover_rate: 0.7,
            crossover: Crossover::None,
            elitism: false,
            fitness_threshold: None,
            no_improvement_generations: 20,
            max_generations: None,
            time_limit_ms: None,
            home_city: Some(0),
            aco: None,
            sa: None,
            parallel: true,
            workers: None,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    /// Sets the crossover strategy.
    pub fn with_crossover(mut self, crossover: Crossover) -> Self {
        self.crossover = crossover;
        self
    }

    /// Enables or disables elitism.
    pub fn with_elitism(mut self, elitism: bool) -> Self {
        self.elitism = elitism;
        self
    }

    /// Sets the stop-when-reached fitness threshold.
    pub fn with_fitness_threshold(mut self, threshold: f64) -> Self {
        self.fitness_threshold = Some(threshold);
        self
    }

    /// Sets the stagnation limit.
    pub fn with_no_improvement_generations(mut self, n: usize) -> Self {
        self.no_improvement_generations = n;
        self
    }

    /// Sets the hard generation cap.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = Some(n);
        self
    }

    /// Sets the wall-clock time limit in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Sets the home city (`None` for cyclic routes).
    pub fn with_home_city(mut self, home: Option<usize>) -> Self {
        self.home_city = home;
        self
    }

    /// Enables pheromone-modulated mutation.
    pub fn with_aco(mut self, aco: AcoConfig) -> Self {
        self.aco = Some(aco);
        self
    }

    /// Enables annealing refinement.
    pub fn with_sa(mut self, sa: SaConfig) -> Self {
        self.sa = Some(sa);
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the worker pool size.
    pub fn with_workers(mut self, n: usize) -> Self {
        self.workers = Some(n);
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The six operator combinations compared side by side by the
    /// command-line driver, each with the default parameters.
    pub fn comparison_suite() -> Vec<(&'static str, GaConfig)> {
        let base = GaConfig::default();
        vec![
            ("GA without PMX, OX, or Elitism", base.clone()),
            ("GA with PMX", base.clone().with_crossover(Crossover::Pmx)),
            ("GA with OX", base.clone().with_crossover(Crossover::Ox)),
            ("GA with Elitism", base.clone().with_elitism(true)),
            (
                "GA with PMX and Elitism",
                base.clone().with_crossover(Crossover::Pmx).with_elitism(true),
            ),
            (
                "GA with OX and Elitism",
                base.with_crossover(Crossover::Ox).with_elitism(true),
            ),
        ]
    }

    /// Validates the configuration.
    ///
    /// Matrix-dependent checks (home city range) happen when a run starts.
    pub fn validate(&self) -> TspResult<()> {
        if self.population_size < 2 || self.population_size % 2 != 0 {
            return Err(TspError::config(format!(
                "population_size must be even and at least 2, got {}",
                self.population_size
            )));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(TspError::config(format!(
                "mutation_rate must be in [0, 1], got {}",
                self.mutation_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(TspError::config(format!(
                "crossover_rate must be in [0, 1], got {}",
                self.crossover_rate
            )));
        }
        if self.no_improvement_generations == 0 {
            return Err(TspError::config("no_improvement_generations must be at least 1"));
        }
        if self.fitness_threshold.is_some_and(f64::is_nan) {
            return Err(TspError::config("fitness_threshold must not be NaN"));
        }
        if self.max_generations == Some(0) {
            return Err(TspError::config("max_generations must be positive or None"));
        }
        if self.time_limit_ms == Some(0) {
            return Err(TspError::config("time_limit_ms must be positive or None"));
        }
        if self.workers == Some(0) {
            return Err(TspError::config("workers must be positive or None"));
        }
        if let Some(aco) = &self.aco {
            aco.validate()?;
        }
        if let Some(sa) = &self.sa {
            sa.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GaConfig::default();
        assert_eq!(config.population_size, 100);
        assert!((config.mutation_rate - 0.01).abs() < 1e-10);
        assert!((config.crossover_rate - 0.7).abs() < 1e-10);
        assert_eq!(config.crossover, Crossover::None);
        assert!(!config.elitism);
        assert!(config.fitness_threshold.is_none());
        assert_eq!(config.no_improvement_generations, 20);
        assert!(config.max_generations.is_none());
        assert_eq!(config.home_city, Some(0));
        assert!(config.aco.is_none());
        assert!(config.sa.is_none());
        assert!(config.parallel);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = GaConfig::default()
            .with_population_size(50)
            .with_mutation_rate(0.05)
            .with_crossover_rate(0.9)
            .with_crossover(Crossover::Ox)
            .with_elitism(true)
            .with_fitness_threshold(0.01)
            .with_no_improvement_generations(5)
            .with_max_generations(300)
            .with_home_city(None)
            .with_parallel(false)
            .with_seed(42);

        assert_eq!(config.population_size, 50);
        assert!((config.mutation_rate - 0.05).abs() < 1e-10);
        assert!((config.crossover_rate - 0.9).abs() < 1e-10);
        assert_eq!(config.crossover, Crossover::Ox);
        assert!(config.elitism);
        assert_eq!(config.fitness_threshold, Some(0.01));
        assert_eq!(config.no_improvement_generations, 5);
        assert_eq!(config.max_generations, Some(300));
        assert!(config.home_city.is_none());
        assert!(!config.parallel);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_validate_ok() {
        assert!(GaConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_population() {
        assert!(GaConfig::default().with_population_size(0).validate().is_err());
        assert!(GaConfig::default().with_population_size(7).validate().is_err());
        assert!(GaConfig::default().with_population_size(2).validate().is_ok());
    }

    #[test]
    fn test_validate_rates() {
        assert!(GaConfig::default().with_mutation_rate(1.5).validate().is_err());
        assert!(GaConfig::default().with_mutation_rate(-0.1).validate().is_err());
        assert!(GaConfig::default().with_crossover_rate(f64::NAN).validate().is_err());
        assert!(GaConfig::default().with_crossover_rate(1.0).validate().is_ok());
    }

    #[test]
    fn test_validate_limits() {
        assert!(GaConfig::default()
            .with_no_improvement_generations(0)
            .validate()
            .is_err());
        assert!(GaConfig::default().with_max_generations(0).validate().is_err());
        assert!(GaConfig::default().with_time_limit_ms(0).validate().is_err());
        assert!(GaConfig::default().with_workers(0).validate().is_err());
        assert!(GaConfig::default()
            .with_fitness_threshold(f64::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_nested_configs() {
        let config = GaConfig::default().with_sa(SaConfig::default().with_cooling_rate(2.0));
        assert!(config.validate().is_err());
        let config = GaConfig::default().with_aco(AcoConfig::default().with_decay(1.0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_comparison_suite() {
        let suite = GaConfig::comparison_suite();
        assert_eq!(suite.len(), 6);
        assert_eq!(suite[0].1.crossover, Crossover::None);
        assert!(!suite[0].1.elitism);
        assert_eq!(suite[4].1.crossover, Crossover::Pmx);
        assert!(suite[4].1.elitism);
        assert_eq!(suite[5].1.crossover, Crossover::Ox);
        for (_, config) in &suite {
            assert!(config.validate().is_ok());
        }
    }
}
