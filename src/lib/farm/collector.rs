//! Terminal sink: accumulates every result that leaves the merger.

use std::time::Instant;

use super::queue::QueueReceiver;
use crate::progress::ProgressTracker;

/// Everything the collector saw.
#[derive(Debug)]
pub struct CollectorOutput<T> {
    /// Results in arrival order.
    pub results: Vec<T>,
    /// When end-of-stream was observed.
    pub finished_at: Instant,
}

/// Drains its input into a vector until end-of-stream.
pub struct Collector<T> {
    input: QueueReceiver<T>,
    progress: ProgressTracker,
}

impl<T: Send> Collector<T> {
    /// Create a collector that logs progress every `progress_interval` results
    /// (0 disables progress logging).
    #[must_use]
    pub fn new(input: QueueReceiver<T>, progress_interval: u64) -> Self {
        let progress = ProgressTracker::new("Collected results").with_interval(progress_interval);
        Self { input, progress }
    }

    /// Collect until end-of-stream.
    pub fn run(self) -> CollectorOutput<T> {
        let Self { input, progress } = self;
        let mut results = Vec::new();
        for item in input {
            results.push(item);
            progress.log_if_needed(1);
        }
        progress.log_final();
        CollectorOutput { results, finished_at: Instant::now() }
    }
}
