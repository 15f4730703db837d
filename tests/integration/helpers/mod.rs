//! Helper utilities for integration tests.

pub mod assertions;
pub mod workloads;

pub use assertions::*;
pub use workloads::*;
