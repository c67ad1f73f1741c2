//! Validated distance matrix.
//!
//! [`DistanceMatrix`] is the only problem input the engine consumes. It is
//! validated once at construction and then shared read-only by every
//! component, including the parallel fitness workers.

use crate::error::{TspError, TspResult};

/// Immutable NxN matrix of non-negative edge costs.
///
/// # Invariants
///
/// - `N >= 2`
/// - every entry is finite and non-negative
/// - the diagonal is exactly zero
///
/// Units are caller-defined (the original drivers work in kilometres).
///
/// # Examples
///
/// ```
/// use u_tsp::DistanceMatrix;
///
/// let m = DistanceMatrix::new(vec![
///     vec![0.0, 1.0, 2.0],
///     vec![1.0, 0.0, 1.5],
///     vec![2.0, 1.5, 0.0],
/// ]).unwrap();
/// assert_eq!(m.size(), 3);
/// assert_eq!(m.tour_distance(&[0, 1, 2]).unwrap(), 4.5);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DistanceMatrix {
    n: usize,
    /// Row-major storage, `n * n` entries.
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Builds a matrix from rows, validating shape and values.
    pub fn new(rows: Vec<Vec<f64>>) -> TspResult<Self> {
        let n = rows.len();
        if n < 2 {
            return Err(TspError::config(format!(
                "distance matrix needs at least 2 cities, got {n}"
            )));
        }

        let mut data = Vec::with_capacity(n * n);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n {
                return Err(TspError::config(format!(
                    "distance matrix is not square: row {i} has {} entries, expected {n}",
                    row.len()
                )));
            }
            data.extend(row);
        }

        Self::from_flat(n, data)
    }

    /// Builds a matrix from row-major data.
    pub fn from_flat(n: usize, data: Vec<f64>) -> TspResult<Self> {
        if n < 2 {
            return Err(TspError::config(format!(
                "distance matrix needs at least 2 cities, got {n}"
            )));
        }
        if data.len() != n * n {
            return Err(TspError::config(format!(
                "expected {} entries for {n}x{n} matrix, got {}",
                n * n,
                data.len()
            )));
        }

        for (idx, &d) in data.iter().enumerate() {
            let (i, j) = (idx / n, idx % n);
            if !d.is_finite() {
                return Err(TspError::config(format!(
                    "distance [{i}][{j}] is not finite"
                )));
            }
            if d < 0.0 {
                return Err(TspError::config(format!(
                    "distance [{i}][{j}] is negative: {d}"
                )));
            }
            if i == j && d != 0.0 {
                return Err(TspError::config(format!(
                    "diagonal entry [{i}][{i}] must be zero, got {d}"
                )));
            }
        }

        Ok(Self { n, data })
    }

    /// Builds a matrix from distances in metres, converting to kilometres.
    ///
    /// The diagonal is forced to zero before validation, matching how
    /// distance-matrix exports are usually cleaned up.
    pub fn from_meters(rows: Vec<Vec<f64>>) -> TspResult<Self> {
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                row.into_iter()
                    .enumerate()
                    .map(|(j, d)| if i == j { 0.0 } else { d / 1000.0 })
                    .collect()
            })
            .collect();
        Self::new(rows)
    }

    /// Stricter check: rejects zero distances between distinct cities.
    ///
    /// Zero off-diagonal entries usually mean a failed lookup upstream.
    pub fn ensure_positive_off_diagonal(&self) -> TspResult<()> {
        for i in 0..self.n {
            for j in 0..self.n {
                if i != j && self.data[i * self.n + j] == 0.0 {
                    return Err(TspError::config(format!(
                        "distance [{i}][{j}] is zero off the diagonal"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Number of cities.
    pub fn size(&self) -> usize {
        self.n
    }

    /// Distance from `from` to `to`, or `None` if either index is out of range.
    pub fn get(&self, from: usize, to: usize) -> Option<f64> {
        if from < self.n && to < self.n {
            Some(self.data[from * self.n + to])
        } else {
            None
        }
    }

    /// Distance from `from` to `to`.
    pub fn distance(&self, from: usize, to: usize) -> TspResult<f64> {
        self.get(from, to).ok_or_else(|| TspError::CityOutOfRange {
            city: from.max(to),
            size: self.n,
        })
    }

    /// Unchecked lookup for callers that already validated both indices.
    #[inline]
    pub(crate) fn at(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.n + to]
    }

    /// Sum of consecutive edges along `path`, without closing the loop.
    pub fn path_distance(&self, path: &[usize]) -> TspResult<f64> {
        path.windows(2)
            .map(|w| self.distance(w[0], w[1]))
            .sum()
    }

    /// Total tour distance: consecutive edges plus the closing edge from the
    /// last city back to the first.
    ///
    /// For a home-anchored route (home at both ends) the closing edge is the
    /// zero-cost self loop, so both representations agree.
    pub fn tour_distance(&self, route: &[usize]) -> TspResult<f64> {
        let (Some(&first), Some(&last)) = (route.first(), route.last()) else {
            return Ok(0.0);
        };
        Ok(self.path_distance(route)? + self.distance(last, first)?)
    }
}
