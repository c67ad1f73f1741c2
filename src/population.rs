//! Population initialization.

use crate::error::{TspError, TspResult};
use crate::route::{Route, RouteLayout};
use rand::seq::SliceRandom;
use rand::Rng;

/// Creates `pop_size` independent uniform-random routes over `num_cities`.
///
/// In anchored layouts only the non-home cities are shuffled; the home city
/// is placed at both ends. Routes are not guaranteed to be distinct.
///
/// # Errors
///
/// [`TspError::InvalidConfiguration`] if `pop_size` is zero or odd, if
/// `num_cities < 2`, or if the home city is out of range.
pub fn initialize<R: Rng>(
    pop_size: usize,
    num_cities: usize,
    layout: RouteLayout,
    rng: &mut R,
) -> TspResult<Vec<Route>> {
    if pop_size == 0 || pop_size % 2 != 0 {
        return Err(TspError::config(format!(
            "pop_size must be even and positive, got {pop_size}"
        )));
    }
    if num_cities < 2 {
        return Err(TspError::config(format!(
            "need at least 2 cities, got {num_cities}"
        )));
    }
    if let Some(home) = layout.home() {
        if home >= num_cities {
            return Err(TspError::config(format!(
                "home city {home} out of range for {num_cities} cities"
            )));
        }
    }

    let free = layout.free_cities(num_cities);
    Ok((0..pop_size)
        .map(|_| {
            let mut cities = free.clone();
            cities.shuffle(rng);
            layout.assemble(cities)
        })
        .collect())
}
