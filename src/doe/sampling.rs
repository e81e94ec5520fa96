// doe/sampling.rs
// Seeded selection of the orthogonal-array rows from the factorial space

use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;

use super::factors::DesignPoint;
use crate::error::DesignError;

/// Pick `size` distinct points from `space`, reproducibly for a given `seed`.
///
/// Indices are drawn without replacement from `StdRng::seed_from_u64(seed)`
/// and returned in ascending order, so the rows keep their factorial order.
pub fn sample_orthogonal_array(
    space: &[DesignPoint],
    size: usize,
    seed: u64,
) -> Result<Vec<DesignPoint>, DesignError> {
    let mut picked = sample_indices(space.len(), size, seed)?;
    picked.sort_unstable();
    Ok(picked.into_iter().map(|i| space[i].clone()).collect())
}

/// Distinct indices into a space of `available` points, in draw order.
pub fn sample_indices(available: usize, size: usize, seed: u64) -> Result<Vec<usize>, DesignError> {
    if size == 0 || size > available {
        return Err(DesignError::InvalidSampleSize { size, available });
    }
    let mut rng = StdRng::seed_from_u64(seed);
    Ok(index::sample(&mut rng, available, size).into_vec())
}
