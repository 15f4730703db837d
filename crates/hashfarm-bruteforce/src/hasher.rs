//! Hash functions applied to candidate integers.

use md5::{Digest, Md5};

use crate::digest::Md5Digest;

/// A hash function over 32-bit integers.
///
/// Implementations may keep scratch state between calls (the search calls
/// `hash_int` millions of times per target), so each search owns its hasher and
/// hashers are never shared between threads.
pub trait IntHasher: Send {
    /// The digest type produced and compared against the target.
    type Digest: PartialEq + Clone + Send + 'static;

    /// Hash the four little-endian bytes of `value`.
    fn hash_int(&mut self, value: i32) -> Self::Digest;
}

/// MD5 hasher that reuses its internal state across calls.
#[derive(Clone, Default)]
pub struct Md5IntHasher {
    state: Md5,
}

impl Md5IntHasher {
    /// Create a new hasher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl IntHasher for Md5IntHasher {
    type Digest = Md5Digest;

    #[inline]
    fn hash_int(&mut self, value: i32) -> Md5Digest {
        self.state.update(value.to_le_bytes());
        let out = self.state.finalize_reset();
        let mut bytes = [0u8; Md5Digest::LEN];
        bytes.copy_from_slice(&out);
        Md5Digest::from_bytes(bytes)
    }
}

/// One-shot MD5 of an integer, used to build targets.
#[must_use]
pub fn md5_of_int(value: i32) -> Md5Digest {
    Md5IntHasher::new().hash_int(value)
}
