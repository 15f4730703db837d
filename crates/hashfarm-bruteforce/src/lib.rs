#![deny(unsafe_code)]

//! Brute-force preimage search over MD5 digests of 32-bit integers.
//!
//! This crate provides the unit of work the hashfarm pipeline distributes:
//! - [`Md5Digest`], a 16-byte digest value that can be parsed from and rendered as hex
//! - [`IntHasher`], the pluggable hash function applied to each candidate integer
//! - [`BruteForce`], the bounded search that reverses a digest back to its integer
//!
//! Integers are hashed as their four little-endian bytes.

pub mod digest;
pub mod hasher;
pub mod search;

pub use digest::{DigestParseError, Md5Digest};
pub use hasher::{IntHasher, Md5IntHasher, md5_of_int};
pub use search::{BruteForce, reverse_md5};

/// Largest candidate tried by the reference configuration (inclusive).
pub const MAX_BRUTEFORCE_INPUT: i32 = 10_000_000;

/// Result emitted when no candidate in `[0, max_input]` hashes to the target.
///
/// This is a value, not an error: it travels through the pipeline like any other result.
pub const FAILURE_SENTINEL: i32 = -1;
