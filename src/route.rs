//! Route representation and invariant checks.
//!
//! A route is a plain `Vec<usize>` of city indices. Its shape depends on the
//! [`RouteLayout`]:
//!
//! - [`RouteLayout::Cycle`]: a permutation of `0..n`, closed implicitly.
//! - [`RouteLayout::Anchored`]: `n + 1` entries, the home city at both ends
//!   and every other city exactly once in between.
//!
//! Genetic operators and annealing only ever touch the *free* positions
//! ([`RouteLayout::free_range`]), so the anchored ends cannot move.

use crate::error::{TspError, TspResult};
use std::ops::Range;

/// An ordered sequence of city indices.
pub type Route = Vec<usize>;

/// How routes are laid out for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RouteLayout {
    /// Permutation of every city; the tour closes from last back to first.
    Cycle,
    /// Tour starts and ends at `home`.
    Anchored {
        /// Home city index.
        home: usize,
    },
}

impl RouteLayout {
    /// Builds a layout from an optional home city.
    pub fn from_home(home: Option<usize>) -> Self {
        match home {
            Some(home) => RouteLayout::Anchored { home },
            None => RouteLayout::Cycle,
        }
    }

    /// Home city, if anchored.
    pub fn home(&self) -> Option<usize> {
        match *self {
            RouteLayout::Anchored { home } => Some(home),
            RouteLayout::Cycle => None,
        }
    }

    /// Length of a route over `num_cities` cities.
    pub fn route_len(&self, num_cities: usize) -> usize {
        match self {
            RouteLayout::Cycle => num_cities,
            RouteLayout::Anchored { .. } => num_cities + 1,
        }
    }

    /// Positions that operators may permute.
    pub fn free_range(&self, route_len: usize) -> Range<usize> {
        match self {
            RouteLayout::Cycle => 0..route_len,
            RouteLayout::Anchored { .. } => 1..route_len.saturating_sub(1).max(1),
        }
    }

    /// Cities that occupy the free positions, in ascending order.
    pub fn free_cities(&self, num_cities: usize) -> Vec<usize> {
        match *self {
            RouteLayout::Cycle => (0..num_cities).collect(),
            RouteLayout::Anchored { home } => (0..num_cities).filter(|&c| c != home).collect(),
        }
    }

    /// Wraps free-position cities into a full route.
    pub fn assemble(&self, free: Vec<usize>) -> Route {
        match *self {
            RouteLayout::Cycle => free,
            RouteLayout::Anchored { home } => {
                let mut route = Vec::with_capacity(free.len() + 2);
                route.push(home);
                route.extend(free);
                route.push(home);
                route
            }
        }
    }

    /// Checks that `route` is a valid route over `num_cities` cities.
    ///
    /// Returns [`TspError::InvalidRoute`] describing the first violation.
    pub fn validate(&self, route: &[usize], num_cities: usize) -> TspResult<()> {
        let expected = self.route_len(num_cities);
        if route.len() != expected {
            return Err(TspError::InvalidRoute(format!(
                "expected {expected} positions, got {}",
                route.len()
            )));
        }

        if let RouteLayout::Anchored { home } = *self {
            if route[0] != home || route[route.len() - 1] != home {
                return Err(TspError::InvalidRoute(format!(
                    "route must start and end at home city {home}: {route:?}"
                )));
            }
        }

        let mut seen = vec![false; num_cities];
        for &city in &route[self.free_range(route.len())] {
            if city >= num_cities {
                return Err(TspError::CityOutOfRange {
                    city,
                    size: num_cities,
                });
            }
            if seen[city] {
                return Err(TspError::InvalidRoute(format!(
                    "city {city} appears more than once: {route:?}"
                )));
            }
            seen[city] = true;
        }

        if let RouteLayout::Anchored { home } = *self {
            if seen[home] {
                return Err(TspError::InvalidRoute(format!(
                    "home city {home} appears inside the route: {route:?}"
                )));
            }
            seen[home] = true;
        }

        match seen.iter().position(|&s| !s) {
            Some(missing) => Err(TspError::InvalidRoute(format!(
                "city {missing} is missing: {route:?}"
            ))),
            None => Ok(()),
        }
    }
}

impl Default for RouteLayout {
    fn default() -> Self {
        RouteLayout::Anchored { home: 0 }
    }
}
