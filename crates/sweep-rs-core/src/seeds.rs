//! Distinct random seeds for reproducible sweeps.

use crate::error::SweepError;
use rand::Rng;
use rand::seq::index::sample;

/// `num` distinct seeds drawn uniformly from `0..upper`.
pub fn random_seeds(num: usize, upper: usize) -> Result<Vec<u64>, SweepError> {
    random_seeds_with(&mut rand::rng(), num, upper)
}

/// [`random_seeds`] using the given random source.
pub fn random_seeds_with<R: Rng + ?Sized>(
    rng: &mut R,
    num: usize,
    upper: usize,
) -> Result<Vec<u64>, SweepError> {
    if upper == 0 {
        return Err(SweepError::InvalidArguments(
            "upper bound must be positive".to_string(),
        ));
    }
    if num > upper {
        return Err(SweepError::InvalidArguments(format!(
            "cannot draw {num} distinct seeds below {upper}"
        )));
    }
    Ok(sample(rng, upper, num)
        .into_iter()
        .map(|seed| seed as u64)
        .collect())
}
