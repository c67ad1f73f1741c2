//! Baseline search configuration.

use crate::error::{TspError, TspResult};

/// Configuration shared by the best-first and A* baselines.
///
/// # Examples
///
/// ```
/// use u_tsp::search::SearchConfig;
///
/// let config = SearchConfig::default().with_max_expansions(10_000);
/// assert_eq!(config.start_city, 0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchConfig {
    /// City every tour starts and ends at.
    pub start_city: usize,

    /// Stop after this many frontier nodes have been expanded.
    ///
    /// `None` searches until the frontier is exhausted, which takes
    /// factorial time in the number of cities.
    pub max_expansions: Option<usize>,
}

impl SearchConfig {
    /// Sets the start (and end) city.
    pub fn with_start_city(mut self, city: usize) -> Self {
        self.start_city = city;
        self
    }

    /// Sets the expansion cap.
    pub fn with_max_expansions(mut self, n: usize) -> Self {
        self.max_expansions = Some(n);
        self
    }

    /// Validates the configuration against a matrix of `num_cities` cities.
    pub fn validate(&self, num_cities: usize) -> TspResult<()> {
        if self.start_city >= num_cities {
            return Err(TspError::config(format!(
                "start_city {} out of range for {num_cities} cities",
                self.start_city
            )));
        }
        if self.max_expansions == Some(0) {
            return Err(TspError::config("max_expansions must be positive or None"));
        }
        Ok(())
    }
}
