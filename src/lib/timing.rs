//! Warm-up and measured benchmark runs.
//!
//! A [`RunSeries`] executes a closure `warmup` times without recording anything, then
//! `runs` times recording each run's elapsed time as a [`Measurement`].

use log::info;
use std::time::Duration;

use crate::errors::Result;
use crate::logging::format_duration;
use crate::validation::validate_positive;

/// Elapsed time of one measured run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Measurement {
    /// Run label, e.g. `run-1`.
    pub label: String,
    /// Wall time in whole milliseconds.
    pub elapsed_millis: u64,
}

/// A series of warm-up and measured runs.
#[derive(Debug, Clone)]
pub struct RunSeries {
    warmup: usize,
    runs: usize,
    measurements: Vec<Measurement>,
}

impl RunSeries {
    /// A series with `warmup` unrecorded and `runs` recorded executions.
    ///
    /// # Errors
    ///
    /// Returns an error if `runs` is zero.
    pub fn new(warmup: usize, runs: usize) -> Result<Self> {
        validate_positive(runs, "runs")?;
        Ok(Self { warmup, runs, measurements: Vec::with_capacity(runs) })
    }

    /// Execute every warm-up run, then every measured run.
    ///
    /// `run` receives the run label and returns the elapsed time it measured. The first
    /// error aborts the series.
    ///
    /// # Errors
    ///
    /// Returns the first error `run` returns.
    pub fn execute<E, F>(&mut self, mut run: F) -> std::result::Result<(), E>
    where
        F: FnMut(&str) -> std::result::Result<Duration, E>,
    {
        for i in 0..self.warmup {
            let label = format!("warmup-{}", i + 1);
            info!("Warm-up #{} started", i + 1);
            run(&label)?;
        }

        for i in 0..self.runs {
            let label = format!("run-{}", i + 1);
            let elapsed = run(&label)?;
            let elapsed_millis = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
            info!("Run #{} done, time: {}", i + 1, format_duration(elapsed));
            self.measurements.push(Measurement { label, elapsed_millis });
        }
        Ok(())
    }

    /// Recorded measurements, in run order.
    #[must_use]
    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    /// Mean of the recorded runs in milliseconds, if any were recorded.
    #[must_use]
    pub fn mean_millis(&self) -> Option<f64> {
        if self.measurements.is_empty() {
            return None;
        }
        let total: u64 = self.measurements.iter().map(|m| m.elapsed_millis).sum();
        Some(total as f64 / self.measurements.len() as f64)
    }

    /// Fastest recorded run in milliseconds.
    #[must_use]
    pub fn min_millis(&self) -> Option<u64> {
        self.measurements.iter().map(|m| m.elapsed_millis).min()
    }
}
