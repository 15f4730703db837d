//! Fan-in stage: k input queues, one output queue.
//!
//! The merger forwards results as they arrive and closes its output once every input
//! has signalled end-of-stream. Results are not restored to submission order.
//!
//! # Strategies
//!
//! - [`MergeStrategy::BusyWaitRoundRobin`] polls the inputs in cyclic order with
//!   non-blocking receives and never parks. The merger thread therefore burns a core
//!   while workers are busy; it trades that CPU for the lowest hand-off latency when
//!   results arrive in bursts. After a full rotation over empty inputs it yields its
//!   time slice so that it does not starve workers sharing its core.
//! - [`MergeStrategy::Blocking`] parks on all live inputs at once and wakes when any of
//!   them has data or closes. Use it when workers are slow or I/O bound.

use crossbeam_channel::Select;
use log::debug;
use std::hint;
use std::thread;

use super::queue::{QueueReceiver, QueueSender, QueueStats, TryRecv};
use crate::errors::{HashfarmError, Result};

/// How the merger pulls from its inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MergeStrategy {
    /// Cyclic non-blocking polling that spins instead of parking.
    #[default]
    BusyWaitRoundRobin,
    /// Park until any input is ready.
    Blocking,
}

/// What a merger did during its run.
#[derive(Debug, Clone, Default)]
pub struct MergerReport {
    /// Items forwarded from each input, indexed by port.
    pub forwarded: Vec<u64>,
    /// Polls that found an open input empty (busy-wait strategy only).
    pub empty_polls: u64,
    /// Statistics of the output queue.
    pub queue_stats: QueueStats,
}

/// Fan-in stage.
pub struct Merger<T> {
    name: String,
    inputs: Vec<QueueReceiver<T>>,
    output: QueueSender<T>,
    strategy: MergeStrategy,
}

impl<T: Send> Merger<T> {
    /// Create a merger with no inputs yet.
    #[must_use]
    pub fn new(name: impl Into<String>, output: QueueSender<T>, strategy: MergeStrategy) -> Self {
        Self { name: name.into(), inputs: Vec::new(), output, strategy }
    }

    /// Register an input queue; returns its port index.
    pub fn add_input(&mut self, input: QueueReceiver<T>) -> usize {
        self.inputs.push(input);
        self.inputs.len() - 1
    }

    /// Number of registered inputs.
    #[must_use]
    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// Check the wiring before the stage starts.
    ///
    /// # Errors
    ///
    /// Returns [`HashfarmError::NoPorts`] if no input was registered.
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            return Err(HashfarmError::NoPorts { stage: self.name.clone(), port: "input" });
        }
        Ok(())
    }

    /// Forward items until every input is exhausted, then close the output.
    ///
    /// # Errors
    ///
    /// Returns an error if no inputs are registered or the output's consumer is gone.
    pub fn run(self) -> Result<MergerReport> {
        self.validate()?;

        let Self { name, inputs, mut output, strategy } = self;
        let mut report = MergerReport { forwarded: vec![0; inputs.len()], ..Default::default() };

        match strategy {
            MergeStrategy::BusyWaitRoundRobin => {
                merge_busy_wait(&inputs, &output, &mut report)?;
            }
            MergeStrategy::Blocking => merge_blocking(&inputs, &output, &mut report)?,
        }

        output.close();
        report.queue_stats = output.stats();
        debug!("{name} forwarded {:?} ({} empty polls)", report.forwarded, report.empty_polls);
        Ok(report)
    }
}

fn merge_busy_wait<T>(
    inputs: &[QueueReceiver<T>],
    output: &QueueSender<T>,
    report: &mut MergerReport,
) -> Result<()> {
    let mut active: Vec<usize> = (0..inputs.len()).collect();
    let mut cursor = 0;
    let mut empty_streak = 0;

    while !active.is_empty() {
        let port = active[cursor];
        match inputs[port].try_recv() {
            TryRecv::Item(item) => {
                output.send(item)?;
                report.forwarded[port] += 1;
                empty_streak = 0;
                cursor = (cursor + 1) % active.len();
            }
            TryRecv::Empty => {
                report.empty_polls += 1;
                empty_streak += 1;
                cursor = (cursor + 1) % active.len();
                if empty_streak >= active.len() {
                    empty_streak = 0;
                    thread::yield_now();
                } else {
                    hint::spin_loop();
                }
            }
            TryRecv::Closed => {
                active.remove(cursor);
                if cursor >= active.len() {
                    cursor = 0;
                }
            }
        }
    }
    Ok(())
}

fn merge_blocking<T>(
    inputs: &[QueueReceiver<T>],
    output: &QueueSender<T>,
    report: &mut MergerReport,
) -> Result<()> {
    let mut select = Select::new();
    for input in inputs {
        select.recv(input.channel());
    }

    let mut remaining = inputs.len();
    while remaining > 0 {
        let operation = select.select();
        let port = operation.index();
        match operation.recv(inputs[port].channel()) {
            Ok(item) => {
                output.send(item)?;
                report.forwarded[port] += 1;
            }
            Err(_) => {
                select.remove(port);
                remaining -= 1;
            }
        }
    }
    Ok(())
}
