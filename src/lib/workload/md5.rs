//! CPU-bound workload: reverse an MD5 digest by brute force.

use hashfarm_bruteforce::{BruteForce, IntHasher, MAX_BRUTEFORCE_INPUT, Md5IntHasher};

use super::Workload;

/// Reverses each incoming digest over `[0, max_input]`.
///
/// Emits the preimage, or [`FAILURE_SENTINEL`](hashfarm_bruteforce::FAILURE_SENTINEL)
/// when the domain holds none. Never fails.
#[derive(Clone)]
pub struct Md5Workload<H: IntHasher = Md5IntHasher> {
    search: BruteForce<H>,
}

impl Md5Workload<Md5IntHasher> {
    /// MD5 search over `[0, max_input]`.
    #[must_use]
    pub fn new(max_input: i32) -> Self {
        Self { search: BruteForce::with_max_input(max_input) }
    }
}

impl Default for Md5Workload<Md5IntHasher> {
    fn default() -> Self {
        Self::new(MAX_BRUTEFORCE_INPUT)
    }
}

impl<H: IntHasher> Md5Workload<H> {
    /// Search with a custom hasher.
    #[must_use]
    pub fn with_hasher(hasher: H, max_input: i32) -> Self {
        Self { search: BruteForce::with_hasher(hasher, max_input) }
    }

    /// Upper bound of the search domain (inclusive).
    #[must_use]
    pub fn max_input(&self) -> i32 {
        self.search.max_input()
    }
}

impl<H: IntHasher> Workload for Md5Workload<H> {
    type Input = H::Digest;
    type Output = i32;

    fn process(&mut self, target: H::Digest) -> anyhow::Result<i32> {
        Ok(self.search.reverse(&target))
    }
}
