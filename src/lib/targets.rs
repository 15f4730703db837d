//! Builders for the target digests fed to the MD5 farm.

use hashfarm_bruteforce::{Md5Digest, md5_of_int};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

use crate::errors::Result;
use crate::validation::{validate_min_max, validate_non_negative};

/// `n` copies of the digest of `value`.
///
/// # Example
/// ```
/// use hashfarm_lib::targets::repeated;
///
/// let targets = repeated(1234, 3);
/// assert_eq!(targets.len(), 3);
/// assert!(targets.iter().all(|t| *t == targets[0]));
/// ```
#[must_use]
pub fn repeated(value: i32, n: usize) -> Vec<Md5Digest> {
    vec![md5_of_int(value); n]
}

/// Create a random number generator, seeded for reproducible targets when a seed is
/// given and from OS entropy otherwise.
#[must_use]
pub fn create_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => rand::make_rng(),
    }
}

/// `n` digests of values drawn uniformly from `[min, max]`.
///
/// The same `seed` always yields the same targets. `min == max` is the same as
/// [`repeated`].
///
/// # Errors
///
/// Returns an error if `min` is negative or `max < min`.
pub fn uniform(min: i32, max: i32, n: usize, seed: Option<u64>) -> Result<Vec<Md5Digest>> {
    validate_non_negative(min, "min")?;
    validate_min_max(min, max, "min", "max")?;
    if min == max {
        return Ok(repeated(min, n));
    }

    let mut rng = create_rng(seed);
    Ok((0..n).map(|_| md5_of_int(rng.random_range(min..=max))).collect())
}

/// The digest of each value, in order.
#[must_use]
pub fn for_values(values: &[i32]) -> Vec<Md5Digest> {
    values.iter().copied().map(md5_of_int).collect()
}
