//! Pheromone feedback configuration.

use crate::error::{TspError, TspResult};

/// Configuration for pheromone-modulated mutation.
///
/// # Examples
///
/// ```
/// use u_tsp::aco::AcoConfig;
///
/// let config = AcoConfig::default()
///     .with_pheromone_threshold(2.5)
///     .with_decay(0.2);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcoConfig {
    /// Mean edge pheromone above which a route's mutation rate is doubled.
    pub pheromone_threshold: f64,

    /// Fraction of every trail that evaporates each generation, in `[0, 1)`.
    pub decay: f64,
}

impl Default for AcoConfig {
    fn default() -> Self {
        Self {
            pheromone_threshold: 1.0,
            decay: 0.1,
        }
    }
}

impl AcoConfig {
    /// Sets the trail strength above which mutation is doubled.
    pub fn with_pheromone_threshold(mut self, threshold: f64) -> Self {
        self.pheromone_threshold = threshold;
        self
    }

    /// Sets the evaporation fraction.
    pub fn with_decay(mut self, decay: f64) -> Self {
        self.decay = decay;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> TspResult<()> {
        if !self.pheromone_threshold.is_finite() {
            return Err(TspError::config("pheromone_threshold must be finite"));
        }
        if !(0.0..1.0).contains(&self.decay) {
            return Err(TspError::config(format!(
                "pheromone decay must be in [0, 1), got {}",
                self.decay
            )));
        }
        Ok(())
    }
}
