//! Enhanced logging utilities for formatted output.
//!
//! This module provides consistent, user-friendly logging utilities for counts,
//! durations, rates, and pipeline run summaries.

use std::time::{Duration, Instant};

use crate::farm::QueueStats;

/// Formats a count with thousands separators.
///
/// # Examples
///
/// ```
/// use hashfarm_lib::logging::format_count;
///
/// assert_eq!(format_count(0), "0");
/// assert_eq!(format_count(999), "999");
/// assert_eq!(format_count(10_000_000), "10,000,000");
/// ```
#[must_use]
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i).is_multiple_of(3) {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Formats a duration in human-readable form.
///
/// Durations under a minute keep millisecond precision since single runs of the
/// benchmark are often sub-second.
///
/// # Examples
///
/// ```
/// use hashfarm_lib::logging::format_duration;
/// use std::time::Duration;
///
/// assert_eq!(format_duration(Duration::from_millis(250)), "0.250s");
/// assert_eq!(format_duration(Duration::from_secs(45)), "45.000s");
/// assert_eq!(format_duration(Duration::from_secs(135)), "2m 15s");
/// assert_eq!(format_duration(Duration::from_secs(5400)), "1h 30m");
/// ```
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{:.3}s", duration.as_secs_f64())
    } else if secs < 3600 {
        let mins = secs / 60;
        let remaining_secs = secs % 60;
        if remaining_secs == 0 { format!("{mins}m") } else { format!("{mins}m {remaining_secs}s") }
    } else {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        if mins == 0 { format!("{hours}h") } else { format!("{hours}h {mins}m") }
    }
}

/// Formats a rate (items per second) with appropriate units.
///
/// # Examples
///
/// ```
/// use hashfarm_lib::logging::format_rate;
/// use std::time::Duration;
///
/// assert_eq!(format_rate(1000, Duration::from_secs(1)), "1,000 items/s");
/// assert_eq!(format_rate(30, Duration::from_secs(60)), "30.0 items/min");
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_rate(count: u64, duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 0.001 {
        return format!("{} items/s", format_count(count));
    }

    let rate = count as f64 / secs;
    if rate >= 1.0 {
        format!("{} items/s", format_count(rate as u64))
    } else {
        let items_per_min = count as f64 / (secs / 60.0);
        format!("{items_per_min:.1} items/min")
    }
}

/// Logs a summary of one finished pipeline run.
///
/// # Examples
///
/// ```
/// use hashfarm_lib::logging::log_run_summary;
/// use std::time::Duration;
///
/// log_run_summary("run 1", 100, 0, Duration::from_millis(1500), 4);
/// ```
pub fn log_run_summary(label: &str, results: u64, skipped: u64, elapsed: Duration, workers: usize) {
    log::info!(
        "{label}: {} results from {workers} workers in {} ({})",
        format_count(results),
        format_duration(elapsed),
        format_rate(results, elapsed)
    );
    if skipped > 0 {
        log::warn!("{label}: {} items skipped after workload errors", format_count(skipped));
    }
}

/// Logs per-queue backpressure statistics at debug level.
pub fn log_queue_stats(stats: &[QueueStats]) {
    if !log::log_enabled!(log::Level::Debug) {
        return;
    }
    log::debug!("Queue statistics:");
    for queue in stats {
        log::debug!(
            "  {:<16} capacity={} sent={} full={} blocked={}ms",
            queue.label,
            queue.capacity,
            format_count(queue.sent),
            format_count(queue.full_events),
            queue.time_blocked_ms
        );
    }
}

/// Operation timing and summary helper.
///
/// # Examples
///
/// ```no_run
/// use hashfarm_lib::logging::OperationTimer;
///
/// let timer = OperationTimer::new("Warm-up");
///
/// // ... do work ...
///
/// timer.log_completion(10_000);
/// ```
pub struct OperationTimer {
    operation: String,
    start_time: Instant,
}

impl OperationTimer {
    /// Creates a new operation timer and logs the start.
    #[must_use]
    pub fn new(operation: &str) -> Self {
        log::info!("{operation} ...");
        Self { operation: operation.to_string(), start_time: Instant::now() }
    }

    /// Time since the timer was created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Logs the completion with item count and rate.
    pub fn log_completion(&self, count: u64) {
        let duration = self.start_time.elapsed();
        log::info!(
            "{} completed: {} in {} ({})",
            self.operation,
            format_count(count),
            format_duration(duration),
            format_rate(count, duration)
        );
    }
}
