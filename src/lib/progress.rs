//! Progress tracking utilities
//!
//! A thread-safe counter that logs a line each time the count crosses a multiple of
//! its interval. The collector uses one to report how many results have arrived.

use log::info;
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe progress tracker for logging progress at regular intervals.
///
/// # Example
/// ```
/// use hashfarm_lib::progress::ProgressTracker;
///
/// let tracker = ProgressTracker::new("Collected results").with_interval(100);
/// for _ in 0..250 {
///     tracker.log_if_needed(1); // logs at 100 and 200
/// }
/// tracker.log_final(); // logs "Collected results 250 (complete)"
/// assert_eq!(tracker.count(), 250);
/// ```
pub struct ProgressTracker {
    interval: u64,
    message: String,
    count: AtomicU64,
}

impl ProgressTracker {
    /// Create a tracker with the default interval of 10,000.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { interval: 10_000, message: message.into(), count: AtomicU64::new(0) }
    }

    /// Set the logging interval. An interval of 0 disables interval logging.
    #[must_use]
    pub fn with_interval(mut self, interval: u64) -> Self {
        self.interval = interval;
        self
    }

    /// Add `additional` to the count and log every interval boundary crossed.
    ///
    /// Returns `true` if the new count sits exactly on a boundary.
    pub fn log_if_needed(&self, additional: u64) -> bool {
        if self.interval == 0 {
            self.count.fetch_add(additional, Ordering::Relaxed);
            return false;
        }

        let prev = self.count.fetch_add(additional, Ordering::Relaxed);
        let new_count = prev + additional;

        for i in (prev / self.interval + 1)..=(new_count / self.interval) {
            info!("{} {}", self.message, i * self.interval);
        }

        new_count > 0 && new_count.is_multiple_of(self.interval)
    }

    /// Log the final count unless the last boundary already reported it.
    pub fn log_final(&self) {
        let count = self.count();
        let on_boundary = self.interval > 0 && count.is_multiple_of(self.interval);
        if count > 0 && !on_boundary {
            info!("{} {} (complete)", self.message, count);
        }
    }

    /// Current count.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}
