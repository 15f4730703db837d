//! Common CLI options shared across commands.
//!
//! This module provides shared argument structures that can be composed into
//! command structs using `#[command(flatten)]`.

use anyhow::Result;
use clap::{Args, ValueEnum};
use hashfarm_lib::farm::{
    DEFAULT_MAX_FULL_ROUNDS, DEFAULT_PROGRESS_INTERVAL, DEFAULT_QUEUE_CAPACITY,
    DistributionStrategy, MergeStrategy, PipelineConfig,
};
use hashfarm_lib::logging::log_run_summary;
use hashfarm_lib::timing::RunSeries;
use log::info;

/// Fan-out strategy selectable on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum DistributionArg {
    /// Skip full outputs, block only when every output stays full
    #[default]
    NonBlocking,
    /// Strict cyclic order, block on the current output
    Blocking,
}

/// Fan-in strategy selectable on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum MergeArg {
    /// Poll inputs in a spin loop (lowest latency, burns a core)
    #[default]
    BusyWait,
    /// Park until any input has data
    Blocking,
}

impl From<MergeArg> for MergeStrategy {
    fn from(arg: MergeArg) -> Self {
        match arg {
            MergeArg::BusyWait => Self::BusyWaitRoundRobin,
            MergeArg::Blocking => Self::Blocking,
        }
    }
}

/// Options shaping the farm itself.
#[derive(Debug, Clone, Args)]
pub struct FarmOptions {
    /// Number of worker threads
    #[arg(short = 't', long = "threads", default_value = "1")]
    pub threads: usize,

    /// Capacity of every queue in the pipeline
    #[arg(short = 'c', long = "capacity", default_value_t = DEFAULT_QUEUE_CAPACITY)]
    pub capacity: usize,

    /// Fan-in strategy
    #[arg(long = "merge", value_enum, default_value_t = MergeArg::BusyWait)]
    pub merge: MergeArg,

    /// Results between progress log lines (0 disables)
    #[arg(long = "progress-interval", default_value_t = DEFAULT_PROGRESS_INTERVAL)]
    pub progress_interval: u64,
}

impl FarmOptions {
    /// Build the pipeline configuration with the given fan-out strategy.
    #[must_use]
    pub fn to_config(&self, distribution: DistributionStrategy) -> PipelineConfig {
        PipelineConfig::with_workers(self.threads)
            .with_queue_capacity(self.capacity)
            .with_distribution(distribution)
            .with_merge(self.merge.into())
            .with_progress_interval(self.progress_interval)
    }
}

/// Fan-out options; only meaningful for commands that expose a distribution choice.
#[derive(Debug, Clone, Args)]
pub struct DistributionOptions {
    /// Fan-out strategy
    #[arg(long = "distribution", value_enum, default_value_t = DistributionArg::NonBlocking)]
    pub distribution: DistributionArg,

    /// All-full rotations before the non-blocking distributor blocks
    #[arg(long = "max-full-rounds", default_value_t = DEFAULT_MAX_FULL_ROUNDS)]
    pub max_full_rounds: usize,
}

impl DistributionOptions {
    /// The selected strategy.
    #[must_use]
    pub fn strategy(&self) -> DistributionStrategy {
        match self.distribution {
            DistributionArg::NonBlocking => {
                DistributionStrategy::NonBlockingRoundRobin {
                    max_full_rounds: self.max_full_rounds,
                }
            }
            DistributionArg::Blocking => DistributionStrategy::BlockingRoundRobin,
        }
    }
}

/// Warm-up and measured run counts.
#[derive(Debug, Clone, Args)]
pub struct RunOptions {
    /// Number of warm-up executions (not measured)
    #[arg(short = 'w', long = "warmup", default_value = "1")]
    pub warmup: usize,

    /// Number of measured executions
    #[arg(short = 'r', long = "runs", default_value = "3")]
    pub runs: usize,
}

impl RunOptions {
    /// Execute `run` through a warm-up/measured series and log each run plus the mean.
    ///
    /// `run` returns the result count, skipped count, and elapsed time of one pipeline
    /// run.
    pub fn execute_series<F>(&self, workers: usize, mut run: F) -> Result<RunSeries>
    where
        F: FnMut() -> Result<(u64, u64, std::time::Duration)>,
    {
        let mut series = RunSeries::new(self.warmup, self.runs)?;
        series.execute(|label| {
            let (results, skipped, elapsed) = run()?;
            log_run_summary(label, results, skipped, elapsed, workers);
            Ok::<_, anyhow::Error>(elapsed)
        })?;

        if let (Some(mean), Some(min)) = (series.mean_millis(), series.min_millis()) {
            info!(
                "Mean over {} runs: {mean:.1}ms (fastest {min}ms)",
                series.measurements().len()
            );
        }
        Ok(series)
    }
}
