#![deny(unsafe_code)]
// Clippy lint configuration for CI
// These lints are allowed because:
// - cast_*: Benchmark statistics cast between counts, durations, and floats
// - missing_*_doc: Documentation improvements tracked separately
// - needless_pass_by_value: Stage constructors take ownership of their queues
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::needless_pass_by_value,
    clippy::module_name_repetitions,
    clippy::redundant_closure_for_method_calls,
    clippy::uninlined_format_args
)]

//! # hashfarm - parallel brute-force benchmark library
//!
//! This library measures how well a fan-out/fan-in pipeline scales a CPU- or I/O-bound
//! unit of work across threads. The reference workload reverses MD5 digests of
//! integers by brute force.
//!
//! ## Overview
//!
//! ### Core Functionality
//!
//! - **[`farm`]** - Bounded queues, the distributor/worker/merger stages, and pipeline
//!   assembly
//! - **[`workload`]** - The [`Workload`](workload::Workload) trait and the MD5 and file
//!   round-trip workloads
//!
//! ### Utilities
//!
//! - **[`targets`]** - Target digest builders (repeated, seeded uniform)
//! - **[`timing`]** - Warm-up and measured run series
//! - **[`validation`]** - Input validation utilities for parameters
//! - **[`progress`]** - Progress tracking and logging
//! - **[`logging`]** - Enhanced logging utilities with formatting
//! - **[`errors`]** - Structured error types
//!
//! ## Quick Start
//!
//! ### Reversing a batch of digests with four workers
//!
//! ```
//! use hashfarm_lib::farm::Pipeline;
//! use hashfarm_lib::targets;
//!
//! # fn main() -> hashfarm_lib::errors::Result<()> {
//! let inputs = targets::for_values(&[5, 50, 500]);
//! let mut pipeline = Pipeline::with_max_input(4, inputs, 16, 1_000)?;
//! let run = pipeline.run()?;
//!
//! let mut found = run.results().to_vec();
//! found.sort_unstable();
//! assert_eq!(found, vec![5, 50, 500]);
//! # Ok(())
//! # }
//! ```
//!
//! ### Custom workloads
//!
//! ```
//! use hashfarm_lib::farm::{MergeStrategy, Pipeline, PipelineConfig};
//! use hashfarm_lib::workload::Workload;
//!
//! struct Square;
//!
//! impl Workload for Square {
//!     type Input = u64;
//!     type Output = u64;
//!
//!     fn process(&mut self, input: u64) -> anyhow::Result<u64> {
//!         Ok(input * input)
//!     }
//! }
//!
//! # fn main() -> hashfarm_lib::errors::Result<()> {
//! let config = PipelineConfig::with_workers(2).with_merge(MergeStrategy::Blocking);
//! let mut pipeline = Pipeline::with_config(config, (1..=4).collect(), |_| Square)?;
//! let total: u64 = pipeline.run()?.results().iter().sum();
//! assert_eq!(total, 1 + 4 + 9 + 16);
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod farm;
pub mod logging;
pub mod progress;
pub mod targets;
pub mod timing;
pub mod validation;
pub mod workload;

pub use hashfarm_bruteforce::{FAILURE_SENTINEL, MAX_BRUTEFORCE_INPUT, Md5Digest};
