//! Units of work executed by the worker stages.
//!
//! A [`Workload`] turns one input into one output. Every worker owns its own workload
//! instance, built by a factory from the worker index, so workloads are free to keep
//! scratch state (hasher state, file buffers) without any synchronisation.
//!
//! Two workloads are provided:
//! - [`Md5Workload`]: CPU bound brute-force reversal of MD5 digests
//! - [`FileRoundTrip`]: I/O bound write-read-delete of a temporary file

pub mod file_io;
pub mod md5;

pub use file_io::FileRoundTrip;
pub use md5::Md5Workload;

/// The per-item computation a worker stage runs.
pub trait Workload: Send {
    /// Item consumed from the worker's input queue.
    type Input: Send + 'static;
    /// Item emitted on the worker's output queue.
    type Output: Send + 'static;

    /// Process one item.
    ///
    /// # Errors
    ///
    /// Returns an error if the item cannot be processed; the worker's
    /// [`WorkerErrorPolicy`](crate::farm::WorkerErrorPolicy) decides what happens next.
    fn process(&mut self, input: Self::Input) -> anyhow::Result<Self::Output>;
}
