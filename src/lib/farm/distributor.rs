//! Fan-out stage: one input queue, k output queues, each item delivered to exactly one
//! output.
//!
//! # Strategies
//!
//! - [`DistributionStrategy::NonBlockingRoundRobin`] tries a non-blocking send on the
//!   output under the cursor and advances the cursor after every attempt, successful or
//!   not, so a slow worker with a full queue is simply skipped. When every output has
//!   been full for `max_full_rounds` consecutive rotations the distributor parks on all
//!   outputs at once and hands the item to whichever frees a slot first.
//! - [`DistributionStrategy::BlockingRoundRobin`] follows strict cyclic order and
//!   blocks on the current output until it has room.
//!
//! An output whose consumer has gone away (a failed worker) is dropped from the
//! rotation with a warning; the item that bounced off it is retried on the next output,
//! so nothing is lost while at least one output is alive.

use crossbeam_channel::Select;
use log::{debug, warn};
use std::time::Instant;

use super::queue::{QueueReceiver, QueueSender, QueueStats, TrySendError};
use crate::errors::{HashfarmError, Result};

/// Default number of all-full rotations before the non-blocking distributor blocks.
pub const DEFAULT_MAX_FULL_ROUNDS: usize = 64;

/// How the distributor picks an output for each item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistributionStrategy {
    /// Cursor-based non-blocking round robin.
    NonBlockingRoundRobin {
        /// Consecutive rotations with every output full before blocking on all of them.
        max_full_rounds: usize,
    },
    /// Strict cyclic order with a blocking send on the current output.
    BlockingRoundRobin,
}

impl Default for DistributionStrategy {
    fn default() -> Self {
        Self::NonBlockingRoundRobin { max_full_rounds: DEFAULT_MAX_FULL_ROUNDS }
    }
}

/// What a distributor did during its run.
#[derive(Debug, Clone, Default)]
pub struct DistributorReport {
    /// Items delivered to each output, indexed by port.
    pub delivered: Vec<u64>,
    /// Times the distributor blocked because every output was full.
    pub blocked_dispatches: u64,
    /// Ports removed from rotation because their consumer went away.
    pub disconnected: Vec<usize>,
    /// Statistics of each output queue.
    pub queue_stats: Vec<QueueStats>,
}

/// Fan-out stage.
pub struct Distributor<T> {
    name: String,
    input: QueueReceiver<T>,
    outputs: Vec<QueueSender<T>>,
    strategy: DistributionStrategy,
}

impl<T: Send> Distributor<T> {
    /// Create a distributor with no outputs yet.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        input: QueueReceiver<T>,
        strategy: DistributionStrategy,
    ) -> Self {
        Self { name: name.into(), input, outputs: Vec::new(), strategy }
    }

    /// Register an output queue; returns its port index.
    pub fn add_output(&mut self, output: QueueSender<T>) -> usize {
        self.outputs.push(output);
        self.outputs.len() - 1
    }

    /// Number of registered outputs.
    #[must_use]
    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    /// Check the wiring before the stage starts.
    ///
    /// # Errors
    ///
    /// Returns [`HashfarmError::NoPorts`] if no output was registered.
    pub fn validate(&self) -> Result<()> {
        if self.outputs.is_empty() {
            return Err(HashfarmError::NoPorts { stage: self.name.clone(), port: "output" });
        }
        Ok(())
    }

    /// Forward every input item to one output until the input ends, then close all
    /// outputs.
    ///
    /// # Errors
    ///
    /// Returns an error if no outputs are registered or if every output disconnected
    /// while items were still pending.
    pub fn run(self) -> Result<DistributorReport> {
        self.validate()?;

        let Self { name, input, mut outputs, strategy } = self;
        let mut rotation = Rotation::new(outputs.len());
        let mut report =
            DistributorReport { delivered: vec![0; outputs.len()], ..Default::default() };

        for item in input {
            match strategy {
                DistributionStrategy::NonBlockingRoundRobin { max_full_rounds } => {
                    dispatch_non_blocking(
                        &name,
                        &outputs,
                        &mut rotation,
                        &mut report,
                        item,
                        max_full_rounds,
                    )?;
                }
                DistributionStrategy::BlockingRoundRobin => {
                    dispatch_blocking(&name, &outputs, &mut rotation, &mut report, item)?;
                }
            }
        }

        for output in &mut outputs {
            output.close();
        }
        report.queue_stats = outputs.iter().map(QueueSender::stats).collect();
        debug!(
            "{name} delivered {:?} ({} blocked dispatches)",
            report.delivered, report.blocked_dispatches
        );
        Ok(report)
    }
}

/// Cursor over the ports still in rotation.
#[derive(Debug)]
struct Rotation {
    alive: Vec<usize>,
    cursor: usize,
}

impl Rotation {
    fn new(ports: usize) -> Self {
        Self { alive: (0..ports).collect(), cursor: 0 }
    }

    fn len(&self) -> usize {
        self.alive.len()
    }

    fn is_empty(&self) -> bool {
        self.alive.is_empty()
    }

    fn current(&self) -> usize {
        self.alive[self.cursor]
    }

    fn advance(&mut self) {
        self.cursor = (self.cursor + 1) % self.alive.len();
    }

    /// Place the cursor just after `port`.
    fn advance_past(&mut self, port: usize) {
        if let Some(pos) = self.alive.iter().position(|&p| p == port) {
            self.cursor = (pos + 1) % self.alive.len();
        }
    }

    /// Drop `port`; the cursor keeps pointing at the port that followed it.
    fn remove(&mut self, port: usize) {
        if let Some(pos) = self.alive.iter().position(|&p| p == port) {
            self.alive.remove(pos);
            if pos < self.cursor {
                self.cursor -= 1;
            }
            if self.cursor >= self.alive.len() {
                self.cursor = 0;
            }
        }
    }
}

fn drop_port<T>(
    name: &str,
    outputs: &[QueueSender<T>],
    rotation: &mut Rotation,
    report: &mut DistributorReport,
    port: usize,
) -> Result<()> {
    warn!("{name}: output '{}' disconnected, removing it from rotation", outputs[port].label());
    rotation.remove(port);
    report.disconnected.push(port);
    if rotation.is_empty() {
        return Err(HashfarmError::AllOutputsDisconnected {
            stage: name.to_string(),
            outputs: outputs.len(),
        });
    }
    Ok(())
}

fn closed_port<T>(outputs: &[QueueSender<T>], port: usize) -> HashfarmError {
    HashfarmError::SendAfterClose { queue: outputs[port].label().to_string() }
}

fn dispatch_non_blocking<T>(
    name: &str,
    outputs: &[QueueSender<T>],
    rotation: &mut Rotation,
    report: &mut DistributorReport,
    mut item: T,
    max_full_rounds: usize,
) -> Result<()> {
    let mut full_attempts = 0;
    loop {
        let port = rotation.current();
        rotation.advance();
        match outputs[port].try_send(item) {
            Ok(()) => {
                report.delivered[port] += 1;
                return Ok(());
            }
            Err(TrySendError::Full(returned)) => {
                item = returned;
                full_attempts += 1;
                if full_attempts % rotation.len() == 0 {
                    if full_attempts / rotation.len() >= max_full_rounds.max(1) {
                        report.blocked_dispatches += 1;
                        return dispatch_when_any_ready(name, outputs, rotation, report, item);
                    }
                    std::thread::yield_now();
                }
            }
            Err(TrySendError::Disconnected(returned)) => {
                item = returned;
                full_attempts = 0;
                drop_port(name, outputs, rotation, report, port)?;
            }
            Err(TrySendError::Closed(_)) => return Err(closed_port(outputs, port)),
        }
    }
}

/// Outcome of parking on every live output at once.
enum Selected<T> {
    Delivered(usize),
    Disconnected(usize, T),
}

/// Block until any live output can take `item`, then hand it over.
fn dispatch_when_any_ready<T>(
    name: &str,
    outputs: &[QueueSender<T>],
    rotation: &mut Rotation,
    report: &mut DistributorReport,
    mut item: T,
) -> Result<()> {
    loop {
        let outcome = {
            let ports: Vec<usize> = rotation.alive.clone();
            let mut select = Select::new();
            let mut channels = Vec::with_capacity(ports.len());
            for &port in &ports {
                let channel = outputs[port].channel().ok_or_else(|| closed_port(outputs, port))?;
                select.send(channel);
                channels.push(channel);
            }

            let start = Instant::now();
            let operation = select.select();
            let index = operation.index();
            let port = ports[index];
            let sent = operation.send(channels[index], item);
            outputs[port].record_blocked(start);
            match sent {
                Ok(()) => Selected::Delivered(port),
                Err(crossbeam_channel::SendError(returned)) => {
                    Selected::Disconnected(port, returned)
                }
            }
        };

        match outcome {
            Selected::Delivered(port) => {
                outputs[port].record_sent();
                report.delivered[port] += 1;
                rotation.advance_past(port);
                return Ok(());
            }
            Selected::Disconnected(port, returned) => {
                item = returned;
                drop_port(name, outputs, rotation, report, port)?;
            }
        }
    }
}

fn dispatch_blocking<T>(
    name: &str,
    outputs: &[QueueSender<T>],
    rotation: &mut Rotation,
    report: &mut DistributorReport,
    mut item: T,
) -> Result<()> {
    loop {
        let port = rotation.current();
        match outputs[port].send_or_reclaim(item) {
            Ok(()) => {
                report.delivered[port] += 1;
                rotation.advance();
                return Ok(());
            }
            Err(TrySendError::Disconnected(returned) | TrySendError::Full(returned)) => {
                item = returned;
                drop_port(name, outputs, rotation, report, port)?;
            }
            Err(TrySendError::Closed(_)) => return Err(closed_port(outputs, port)),
        }
    }
}
