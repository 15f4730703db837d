//! Worker stage: drives one [`Workload`] replica between its input and output queues.

use anyhow::Context;
use log::{debug, warn};

use super::queue::{QueueReceiver, QueueSender, QueueStats};
use crate::workload::Workload;

/// What a worker does when its workload returns an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WorkerErrorPolicy {
    /// Stop the worker; the failure is reported when the pipeline joins.
    #[default]
    Fail,
    /// Log a warning, drop the item, and keep going.
    ///
    /// Skipped items produce no result, so the collected count falls short of the input
    /// count by exactly the number of skips.
    Skip,
}

/// What a worker did during its run.
#[derive(Debug, Clone, Default)]
pub struct WorkerReport {
    /// Worker index.
    pub index: usize,
    /// Items whose result was forwarded.
    pub processed: u64,
    /// Items dropped under [`WorkerErrorPolicy::Skip`].
    pub skipped: u64,
    /// Statistics of the output queue.
    pub queue_stats: QueueStats,
}

/// One worker replica.
pub struct Worker<W: Workload> {
    index: usize,
    workload: W,
    input: QueueReceiver<W::Input>,
    output: QueueSender<W::Output>,
    policy: WorkerErrorPolicy,
}

impl<W: Workload> Worker<W> {
    /// Create worker `index`.
    pub fn new(
        index: usize,
        workload: W,
        input: QueueReceiver<W::Input>,
        output: QueueSender<W::Output>,
        policy: WorkerErrorPolicy,
    ) -> Self {
        Self { index, workload, input, output, policy }
    }

    /// Stage name, `worker-<index>`.
    #[must_use]
    pub fn name(&self) -> String {
        format!("worker-{}", self.index)
    }

    /// Process items one at a time until the input ends, then close the output.
    ///
    /// # Errors
    ///
    /// Returns the workload's error under [`WorkerErrorPolicy::Fail`], or an error if
    /// the output's consumer is gone.
    pub fn run(self) -> anyhow::Result<WorkerReport> {
        let name = self.name();
        let Self { index, mut workload, input, mut output, policy } = self;
        let mut report = WorkerReport { index, ..Default::default() };

        for (seq, item) in input.enumerate() {
            match workload.process(item) {
                Ok(result) => {
                    output.send(result)?;
                    report.processed += 1;
                }
                Err(e) => match policy {
                    WorkerErrorPolicy::Fail => {
                        return Err(e).with_context(|| format!("{name} failed on item #{seq}"));
                    }
                    WorkerErrorPolicy::Skip => {
                        warn!("{name} skipping item #{seq}: {e:#}");
                        report.skipped += 1;
                    }
                },
            }
        }

        output.close();
        report.queue_stats = output.stats();
        debug!("{name} processed {} items ({} skipped)", report.processed, report.skipped);
        Ok(report)
    }
}
