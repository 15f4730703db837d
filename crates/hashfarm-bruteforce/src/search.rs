//! Bounded brute-force reversal of integer digests.

use crate::digest::Md5Digest;
use crate::hasher::{IntHasher, Md5IntHasher};
use crate::{FAILURE_SENTINEL, MAX_BRUTEFORCE_INPUT};

/// Reverses digests by trying every candidate in `[0, max_input]`.
///
/// The search is deterministic: the first (smallest) matching candidate wins, and
/// repeated calls with the same target return the same value.
#[derive(Clone)]
pub struct BruteForce<H: IntHasher = Md5IntHasher> {
    hasher: H,
    max_input: i32,
}

impl BruteForce<Md5IntHasher> {
    /// MD5 search over the reference domain `[0, MAX_BRUTEFORCE_INPUT]`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_input(MAX_BRUTEFORCE_INPUT)
    }

    /// MD5 search over `[0, max_input]`.
    #[must_use]
    pub fn with_max_input(max_input: i32) -> Self {
        Self::with_hasher(Md5IntHasher::new(), max_input)
    }
}

impl Default for BruteForce<Md5IntHasher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: IntHasher> BruteForce<H> {
    /// Search over `[0, max_input]` with a custom hasher.
    ///
    /// A negative `max_input` yields an empty domain: every target reverses to
    /// [`FAILURE_SENTINEL`].
    #[must_use]
    pub fn with_hasher(hasher: H, max_input: i32) -> Self {
        Self { hasher, max_input }
    }

    /// Upper bound of the search domain (inclusive).
    #[must_use]
    pub fn max_input(&self) -> i32 {
        self.max_input
    }

    /// Find the smallest `i` in `[0, max_input]` with `hash(i) == target`.
    ///
    /// Returns [`FAILURE_SENTINEL`] when the domain holds no preimage.
    pub fn reverse(&mut self, target: &H::Digest) -> i32 {
        for candidate in 0..=self.max_input {
            if self.hasher.hash_int(candidate) == *target {
                return candidate;
            }
        }
        FAILURE_SENTINEL
    }
}

/// Reverse an MD5 digest over the reference domain.
#[must_use]
pub fn reverse_md5(target: &Md5Digest) -> i32 {
    BruteForce::new().reverse(target)
}
