//! Error types for route optimization.
//!
//! Configuration problems are reported before any generation runs.
//! Everything else is fatal to the run that raised it.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type TspResult<T> = Result<T, TspError>;

/// Errors surfaced by the optimization engine and baseline searches.
#[derive(Debug, Error)]
pub enum TspError {
    /// Malformed matrix or out-of-range parameter. Detected eagerly.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The run reached a state it cannot continue from
    /// (e.g. roulette selection over a zero fitness sum).
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A route referenced a city outside the distance matrix.
    #[error("city index {city} out of range for {size} cities")]
    CityOutOfRange {
        /// Offending city index.
        city: usize,
        /// Number of cities in the matrix.
        size: usize,
    },

    /// A route with a duplicate or missing city was produced.
    #[error("invalid route: {0}")]
    InvalidRoute(String),

    /// The fitness worker pool could not be started.
    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

impl TspError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        TspError::InvalidConfiguration(msg.into())
    }

    pub(crate) fn state(msg: impl Into<String>) -> Self {
        TspError::InvalidState(msg.into())
    }
}
