//! CPU-bound benchmark: reverse MD5 digests of integers on a worker farm.

use anyhow::{Result, bail};
use clap::Parser;
use hashfarm_lib::farm::Pipeline;
use hashfarm_lib::logging::OperationTimer;
use hashfarm_lib::targets;
use hashfarm_lib::workload::Md5Workload;
use hashfarm_lib::{FAILURE_SENTINEL, MAX_BRUTEFORCE_INPUT};
use log::{info, warn};

use crate::commands::command::Command;
use crate::commands::common::{DistributionOptions, FarmOptions, RunOptions};

/// Reverse MD5 digests by brute force across a farm of worker threads.
#[derive(Debug, Parser)]
#[command(
    name = "cpu",
    about = "\x1b[38;5;72m[BENCHMARK]\x1b[0m      \x1b[36mBrute-force MD5 reversal on a worker farm\x1b[0m",
    long_about = r#"
Reverse MD5 digests of integers by brute force on a fan-out/fan-in worker farm.

The producer emits --num digests, the distributor spreads them over --threads workers,
and each worker searches [0, --max-input] for the integer whose four little-endian bytes
hash to the digest. Results are merged and collected; the elapsed time of each measured
run and the mean are reported.

Targets are either --num copies of the digest of --value, or --num digests of values
drawn uniformly from [--min, --max] (reproducible with --seed).

Example usage:
  hashfarm cpu --num 100 --value 10000000 --threads 10 --capacity 16
  hashfarm cpu --num 1000 --min 0 --max 100000 --seed 42 --threads 8 --merge blocking
"#
)]
pub struct Cpu {
    /// Number of digests to reverse
    #[arg(short = 'n', long = "num")]
    pub num: usize,

    /// Value whose digest is repeated --num times
    #[arg(short = 'v', long = "value", conflicts_with_all = ["min", "max"])]
    pub value: Option<i32>,

    /// Smallest value drawn for uniform targets
    #[arg(long = "min", requires = "max")]
    pub min: Option<i32>,

    /// Largest value drawn for uniform targets
    #[arg(long = "max", requires = "min")]
    pub max: Option<i32>,

    /// Random seed for uniform targets
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Upper bound of the search domain (inclusive)
    #[arg(long = "max-input", default_value_t = MAX_BRUTEFORCE_INPUT)]
    pub max_input: i32,

    /// Farm options
    #[command(flatten)]
    pub farm: FarmOptions,

    /// Fan-out options
    #[command(flatten)]
    pub distribution: DistributionOptions,

    /// Warm-up and measured runs
    #[command(flatten)]
    pub runs: RunOptions,
}

impl Command for Cpu {
    fn execute(&self, command_line: &str) -> Result<()> {
        if self.max_input < 0 {
            bail!("--max-input must be >= 0, got {}", self.max_input);
        }

        let inputs = match (self.value, self.min, self.max) {
            (Some(value), None, None) => targets::repeated(value, self.num),
            (None, Some(min), Some(max)) => targets::uniform(min, max, self.num, self.seed)?,
            (None, None, None) => bail!("Either --value or both --min and --max are required"),
            _ => bail!("--value cannot be combined with --min/--max"),
        };

        let config = self.farm.to_config(self.distribution.strategy());
        config.validate()?;

        info!("Command line: {command_line}");
        info!(
            "Configuration: num={}, threads={}, capacity={}, max-input={}, warmup={}, runs={}",
            self.num, config.workers, config.queue_capacity, self.max_input, self.runs.warmup,
            self.runs.runs
        );

        let timer = OperationTimer::new("CPU benchmark");
        let max_input = self.max_input;
        let mut sentinels = 0;
        let series = self.runs.execute_series(config.workers, || {
            let mut pipeline = Pipeline::with_config(config.clone(), inputs.clone(), |_| {
                Md5Workload::new(max_input)
            })?;
            let run = pipeline.run()?;
            if run.len() != inputs.len() {
                bail!("Expected {} results but collected {}", inputs.len(), run.len());
            }
            sentinels = run.results().iter().filter(|&&r| r == FAILURE_SENTINEL).count();
            Ok((run.len() as u64, run.skipped(), run.elapsed()))
        })?;

        if sentinels > 0 {
            warn!("{sentinels} targets had no preimage in [0, {max_input}]");
        }
        let total = (self.runs.warmup + series.measurements().len()) * inputs.len();
        timer.log_completion(total as u64);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cpu, clap::Error> {
        Cpu::try_parse_from(std::iter::once("cpu").chain(args.iter().copied()))
    }

    #[test]
    fn test_repeated_value_run() {
        let cmd = parse(&[
            "-n", "4", "-v", "37", "--max-input", "100", "-t", "2", "-w", "0", "-r", "1",
        ])
        .unwrap();
        cmd.execute("hashfarm cpu").unwrap();
    }

    #[test]
    fn test_uniform_run() {
        let cmd = parse(&[
            "-n", "8", "--min", "0", "--max", "50", "--seed", "1", "--max-input", "50", "-t", "3",
            "--merge", "blocking", "--distribution", "blocking", "-w", "0", "-r", "2",
        ])
        .unwrap();
        cmd.execute("hashfarm cpu").unwrap();
    }

    #[test]
    fn test_missing_target_is_error() {
        let cmd = parse(&["-n", "4"]).unwrap();
        let err = cmd.execute("hashfarm cpu").unwrap_err();
        assert!(err.to_string().contains("--value"));
    }

    #[test]
    fn test_value_conflicts_with_range() {
        assert!(parse(&["-n", "4", "-v", "3", "--min", "0", "--max", "5"]).is_err());
    }

    #[test]
    fn test_zero_threads_rejected() {
        let cmd = parse(&["-n", "1", "-v", "1", "-t", "0", "--max-input", "1"]).unwrap();
        assert!(cmd.execute("hashfarm cpu").is_err());
    }
}
