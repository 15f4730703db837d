//! Integration tests for hashfarm library.
//!
//! These tests drive complete farms (producer, distributor, workers, merger, collector)
//! through the public API and check what comes out the other end.

mod helpers;
mod test_error_paths;
mod test_pipeline;
mod test_scenarios;
