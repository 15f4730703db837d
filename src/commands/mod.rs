//! CLI command implementations for hashfarm.
//!
//! Each submodule implements one benchmark command.
//!
//! - [`cpu`] - Brute-force MD5 reversal (CPU bound)
//! - [`io`] - File write/read round trips (I/O bound)

#![allow(
    clippy::cast_possible_truncation,
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::uninlined_format_args
)]

pub mod command;
pub mod common;
pub mod cpu;
pub mod io;
