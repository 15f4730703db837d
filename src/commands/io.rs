//! I/O-bound benchmark: write, read back, and delete files on a worker farm.

use anyhow::{Result, bail};
use clap::{Parser, ValueEnum};
use hashfarm_lib::farm::{DistributionStrategy, Pipeline, WorkerErrorPolicy};
use hashfarm_lib::logging::OperationTimer;
use hashfarm_lib::validation::validate_dir_exists;
use hashfarm_lib::workload::FileRoundTrip;
use log::info;
use std::path::PathBuf;

use crate::commands::command::Command;
use crate::commands::common::{FarmOptions, RunOptions};

/// Predefined workload sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Grain {
    /// 100,000 files of 1 KiB
    Fine,
    /// 100,000 files of 4 KiB
    MediumFine,
    /// 1,000 files of 256 KiB
    Medium,
    /// 100 files of 1 MiB
    Coarse,
}

impl Grain {
    /// `(num, size)` for this grain.
    #[must_use]
    pub fn dimensions(self) -> (usize, usize) {
        match self {
            Self::Fine => (100_000, 1024),
            Self::MediumFine => (100_000, 4096),
            Self::Medium => (1_000, 256 * 1024),
            Self::Coarse => (100, 1024 * 1024),
        }
    }
}

/// Write, read back, and delete files across a farm of worker threads.
#[derive(Debug, Parser)]
#[command(
    name = "io",
    about = "\x1b[38;5;72m[BENCHMARK]\x1b[0m      \x1b[36mFile write/read round trips on a worker farm\x1b[0m",
    long_about = r#"
Measure a fan-out/fan-in worker farm on an I/O-bound workload.

Each input is a byte count. A worker writes that many bytes to a fresh file under --dir,
reads the file back, deletes it, and emits the number of bytes read. The elapsed time of
each measured run and the mean are reported.

Sizes come from --grain, and --num / --size override the preset.

Example usage:
  hashfarm io --grain medium --threads 4 --dir /tmp/hashfarm
  hashfarm io --num 500 --size 65536 --threads 8 --merge blocking
"#
)]
pub struct Io {
    /// Predefined workload size
    #[arg(short = 'g', long = "grain", value_enum)]
    pub grain: Option<Grain>,

    /// Number of files per run
    #[arg(short = 'n', long = "num")]
    pub num: Option<usize>,

    /// Size of each file in bytes
    #[arg(short = 's', long = "size")]
    pub size: Option<usize>,

    /// Working directory for the temporary files
    #[arg(short = 'd', long = "dir", default_value = ".")]
    pub dir: PathBuf,

    /// Log and skip failed round trips instead of failing the run
    #[arg(long = "skip-errors", default_value = "false")]
    pub skip_errors: bool,

    /// Farm options
    #[command(flatten)]
    pub farm: FarmOptions,

    /// Warm-up and measured runs
    #[command(flatten)]
    pub runs: RunOptions,
}

impl Io {
    fn dimensions(&self) -> Result<(usize, usize)> {
        let preset = self.grain.map(Grain::dimensions);
        let num = self.num.or(preset.map(|(n, _)| n));
        let size = self.size.or(preset.map(|(_, s)| s));
        match (num, size) {
            (Some(num), Some(size)) => Ok((num, size)),
            _ => bail!("Either --grain or both --num and --size are required"),
        }
    }
}

impl Command for Io {
    fn execute(&self, command_line: &str) -> Result<()> {
        validate_dir_exists(&self.dir, "Working directory")?;
        let (num, size) = self.dimensions()?;

        let policy =
            if self.skip_errors { WorkerErrorPolicy::Skip } else { WorkerErrorPolicy::Fail };
        let config = self.farm.to_config(DistributionStrategy::default()).with_error_policy(policy);
        config.validate()?;

        info!("Command line: {command_line}");
        info!(
            "Configuration: num={num}, size={size}, threads={}, capacity={}, dir={}",
            config.workers,
            config.queue_capacity,
            self.dir.display()
        );

        let timer = OperationTimer::new("I/O benchmark");
        let sizes = vec![size; num];
        let series = self.runs.execute_series(config.workers, || {
            let mut pipeline = Pipeline::with_config(config.clone(), sizes.clone(), |index| {
                FileRoundTrip::new(&self.dir, index)
            })?;
            let run = pipeline.run()?;
            if let Some(short) = run.results().iter().find(|&&read| read != size) {
                bail!("A round trip read {short} bytes instead of {size}");
            }
            Ok((run.len() as u64, run.skipped(), run.elapsed()))
        })?;

        let total = (self.runs.warmup + series.measurements().len()) * num;
        timer.log_completion(total as u64);
        Ok(())
    }
}
