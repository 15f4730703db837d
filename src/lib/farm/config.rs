//! Pipeline configuration.

use super::distributor::DistributionStrategy;
use super::merger::MergeStrategy;
use super::worker::WorkerErrorPolicy;
use crate::errors::{HashfarmError, Result};
use crate::validation::validate_positive;

/// Default capacity of every queue in the pipeline.
pub const DEFAULT_QUEUE_CAPACITY: usize = 4096;

/// Default number of results between collector progress log lines.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 10_000;

/// Configuration for a farm run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Number of worker replicas.
    pub workers: usize,
    /// Capacity of every queue.
    pub queue_capacity: usize,
    /// Fan-out strategy.
    pub distribution: DistributionStrategy,
    /// Fan-in strategy.
    pub merge: MergeStrategy,
    /// What workers do when their workload fails.
    pub error_policy: WorkerErrorPolicy,
    /// Results between progress log lines (0 disables).
    pub progress_interval: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: 1,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            distribution: DistributionStrategy::default(),
            merge: MergeStrategy::default(),
            error_policy: WorkerErrorPolicy::default(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl PipelineConfig {
    /// Default configuration with `workers` replicas.
    #[must_use]
    pub fn with_workers(workers: usize) -> Self {
        Self { workers, ..Default::default() }
    }

    /// Set the capacity of every queue.
    #[must_use]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Set the fan-out strategy.
    #[must_use]
    pub fn with_distribution(mut self, distribution: DistributionStrategy) -> Self {
        self.distribution = distribution;
        self
    }

    /// Set the fan-in strategy.
    #[must_use]
    pub fn with_merge(mut self, merge: MergeStrategy) -> Self {
        self.merge = merge;
        self
    }

    /// Set the worker error policy.
    #[must_use]
    pub fn with_error_policy(mut self, policy: WorkerErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Set the progress logging interval.
    #[must_use]
    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Check the configuration before anything is built.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no workers, the queue capacity is zero, or the
    /// non-blocking distributor is allowed zero full rounds.
    pub fn validate(&self) -> Result<()> {
        validate_positive(self.workers, "workers")?;
        validate_positive(self.queue_capacity, "queue-capacity")?;
        if let DistributionStrategy::NonBlockingRoundRobin { max_full_rounds: 0 } =
            self.distribution
        {
            return Err(HashfarmError::InvalidParameter {
                parameter: "max-full-rounds".to_string(),
                reason: "Must be positive (> 0), got: 0".to_string(),
            });
        }
        Ok(())
    }
}
