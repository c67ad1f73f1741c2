//! Permutation crossover and mutation operators.
//!
//! These operate on `&[usize]` slices holding the *free* part of a route
//! (the whole route in a cyclic layout, the interior in an anchored one).
//! Values do not need to be `0..n`: any set of distinct city indices works,
//! which is what the interior of a home-anchored route looks like.
//!
//! # Crossover Operators
//!
//! - [`pmx_crossover`] (PMX): Goldberg & Lingle (1985), preserves absolute position
//! - [`ox_crossover`] (OX): Davis (1985), preserves relative order
//!
//! # Mutation
//!
//! - [`mutate`]: per-position swap with a fresh random partner
//!
//! # References
//!
//! - Davis (1985), "Applying Adaptive Algorithms to Epistatic Domains"
//! - Goldberg & Lingle (1985), "Alleles, Loci, and the Traveling Salesman Problem"

use rand::Rng;

/// Crossover strategy applied to each selected parent pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Crossover {
    /// Children are verbatim copies of their parents.
    #[default]
    None,
    /// Partially Mapped Crossover.
    Pmx,
    /// Order Crossover.
    Ox,
}

impl Crossover {
    /// Maps the `use_pmx` / `use_ox` flag pair onto a strategy.
    ///
    /// # Errors
    ///
    /// [`TspError::InvalidConfiguration`](crate::TspError::InvalidConfiguration)
    /// if both flags are set.
    pub fn from_flags(use_pmx: bool, use_ox: bool) -> crate::TspResult<Self> {
        match (use_pmx, use_ox) {
            (true, true) => Err(crate::TspError::config(
                "use_pmx and use_ox are mutually exclusive",
            )),
            (true, false) => Ok(Crossover::Pmx),
            (false, true) => Ok(Crossover::Ox),
            (false, false) => Ok(Crossover::None),
        }
    }

    /// Produces two children from two parents.
    ///
    /// PMX uses one pair of cut points for both children; OX draws its own
    /// segment per child. Slices shorter than two elements are copied.
    pub fn apply<R: Rng>(
        &self,
        parent1: &[usize],
        parent2: &[usize],
        rng: &mut R,
    ) -> (Vec<usize>, Vec<usize>) {
        match self {
            Crossover::None => (parent1.to_vec(), parent2.to_vec()),
            Crossover::Pmx => match random_cut_points(parent1.len(), rng) {
                Some((p1, p2)) => (
                    pmx_crossover(parent1, parent2, p1, p2),
                    pmx_crossover(parent2, parent1, p1, p2),
                ),
                None => (parent1.to_vec(), parent2.to_vec()),
            },
            Crossover::Ox => {
                let child1 = match random_cut_points(parent1.len(), rng) {
                    Some((start, end)) => ox_crossover(parent1, parent2, start, end),
                    None => parent1.to_vec(),
                };
                let child2 = match random_cut_points(parent2.len(), rng) {
                    Some((start, end)) => ox_crossover(parent2, parent1, start, end),
                    None => parent2.to_vec(),
                };
                (child1, child2)
            }
        }
    }
}

// ============================================================================
// Crossover operators
// ============================================================================

/// Partially Mapped Crossover (PMX) with explicit cut points.
///
/// # Algorithm (Goldberg & Lingle, 1985)
///
/// 1. Copy `parent1[p1..p2]` into the child at the same positions
/// 2. Map each segment value of `parent1` to `parent2`'s value at that position
/// 3. Every other position takes `parent2`'s value; while that value is
///    already in the child, replace it by its mapping
///
/// # Complexity
/// O(n) time, O(n) space (plus mapping-chain walks, bounded by segment length)
///
/// # Panics
/// Panics if the parents have different lengths, if `p1 >= p2`, if `p2`
/// exceeds the length, or if the parents are not permutations of the same
/// values (the mapping chain would not terminate).
pub fn pmx_crossover(parent1: &[usize], parent2: &[usize], p1: usize, p2: usize) -> Vec<usize> {
    let n = parent1.len();
    assert_eq!(n, parent2.len(), "parents must have equal length");
    assert!(p1 < p2 && p2 <= n, "cut points must satisfy p1 < p2 <= len");

    let bound = value_bound(parent1, parent2);
    let mut in_child = vec![false; bound];
    let mut mapping = vec![usize::MAX; bound];
    let mut child = vec![usize::MAX; n];

    for i in p1..p2 {
        child[i] = parent1[i];
        in_child[parent1[i]] = true;
        mapping[parent1[i]] = parent2[i];
    }

    for i in (0..p1).chain(p2..n) {
        let mut candidate = parent2[i];
        let mut steps = 0;
        while in_child[candidate] {
            candidate = mapping[candidate];
            steps += 1;
            assert!(
                steps <= p2 - p1 && candidate != usize::MAX,
                "parents must be permutations of the same values"
            );
        }
        child[i] = candidate;
        in_child[candidate] = true;
    }

    child
}

/// Order Crossover (OX) with an explicit segment `[start, end)`.
///
/// # Algorithm (Davis, 1985)
///
/// 1. Copy `parent1[start..end]` into the child at the same positions
/// 2. Scan `parent2` starting at `end` (wrapping); each city not yet in the
///    child goes into the next empty slot, starting just after `end`
///    (wrapping)
///
/// # Complexity
/// O(n) time, O(n) space
///
/// # Panics
/// Panics if the parents have different lengths or are empty, or if
/// `start > end` or `end > len`.
pub fn ox_crossover(parent1: &[usize], parent2: &[usize], start: usize, end: usize) -> Vec<usize> {
    let n = parent1.len();
    assert_eq!(n, parent2.len(), "parents must have equal length");
    assert!(n > 0, "parents must not be empty");
    assert!(start <= end && end <= n, "segment must satisfy start <= end <= len");

    let bound = value_bound(parent1, parent2);
    let mut in_child = vec![false; bound];
    let mut filled = vec![false; n];
    let mut child = vec![usize::MAX; n];

    for i in start..end {
        child[i] = parent1[i];
        in_child[parent1[i]] = true;
        filled[i] = true;
    }

    let mut pos = end % n;
    for offset in 0..n {
        let val = parent2[(end + offset) % n];
        if in_child[val] {
            continue;
        }
        while filled[pos] {
            pos = (pos + 1) % n;
        }
        child[pos] = val;
        filled[pos] = true;
        in_child[val] = true;
    }

    child
}

// ============================================================================
// Mutation
// ============================================================================

/// Swap mutation applied independently at every position.
///
/// For each position `i`, with probability `mutation_rate`, swaps it with a
/// uniformly random position `j` (drawn fresh each time; `i == j` is a no-op).
/// Rates above 1.0 behave like 1.0. The input is left untouched.
///
/// # Complexity
/// O(n)
pub fn mutate<R: Rng>(route: &[usize], mutation_rate: f64, rng: &mut R) -> Vec<usize> {
    let mut mutated = route.to_vec();
    let n = mutated.len();
    if n == 0 {
        return mutated;
    }
    for i in 0..n {
        if rng.random::<f64>() < mutation_rate {
            let j = rng.random_range(0..n);
            mutated.swap(i, j);
        }
    }
    mutated
}

// ============================================================================
// Helpers
// ============================================================================

/// Picks two distinct cut points `p1 < p2` from `0..len`.
///
/// Returns `None` when `len < 2`.
pub fn random_cut_points<R: Rng>(len: usize, rng: &mut R) -> Option<(usize, usize)> {
    if len < 2 {
        return None;
    }
    let a = rng.random_range(0..len);
    let mut b = rng.random_range(0..len - 1);
    if b >= a {
        b += 1;
    }
    Some((a.min(b), a.max(b)))
}

/// Size of a lookup table indexed by city value.
fn value_bound(parent1: &[usize], parent2: &[usize]) -> usize {
    parent1
        .iter()
        .chain(parent2)
        .copied()
        .max()
        .map_or(0, |m| m + 1)
}

// ============================================================================
// Tests
// ============================================================================
