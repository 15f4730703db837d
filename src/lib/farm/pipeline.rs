//! Pipeline assembly and execution.
//!
//! A [`Pipeline`] wires the fixed topology
//!
//! ```text
//! Producer -> Distributor -> { Worker 0 .. Worker n-1 } -> Merger -> Collector
//! ```
//!
//! with one bounded queue per link, starts one thread per stage, and joins them all
//! before returning. Draining is driven entirely by close signals: the producer closes
//! its output, the distributor closes every worker input once it sees end-of-stream,
//! each worker closes its output once its input is drained, and the merger closes the
//! collector's input once every worker output is exhausted.
//!
//! # Lifecycle
//!
//! `Assembled -> Started -> Draining -> Finished`, or `Failed` if any stage returned an
//! error or panicked. A pipeline runs once.

use hashfarm_bruteforce::{MAX_BRUTEFORCE_INPUT, Md5Digest};
use log::{error, info};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::collector::{Collector, CollectorOutput};
use super::config::PipelineConfig;
use super::distributor::Distributor;
use super::merger::Merger;
use super::producer::Producer;
use super::queue::{QueueStats, bounded_queue};
use super::stage::{FailureLog, PipelineState, SharedState, StageThread, StopHandle};
use super::worker::Worker;
use crate::errors::{HashfarmError, Result};
use crate::logging::{format_count, format_duration, log_queue_stats};
use crate::workload::{Md5Workload, Workload};

/// Results of one completed run plus its timing.
#[derive(Debug, Clone)]
pub struct CollectedResults<T> {
    results: Vec<T>,
    start: Instant,
    end: Instant,
    stopped: bool,
    skipped: u64,
    queue_stats: Vec<QueueStats>,
}

impl<T> CollectedResults<T> {
    /// Results in arrival order (not submission order).
    #[must_use]
    pub fn results(&self) -> &[T] {
        &self.results
    }

    /// Take ownership of the results.
    #[must_use]
    pub fn into_results(self) -> Vec<T> {
        self.results
    }

    /// Number of results.
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// True if no results were collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// When the stage threads were started.
    #[must_use]
    pub fn start(&self) -> Instant {
        self.start
    }

    /// When the collector saw end-of-stream.
    #[must_use]
    pub fn end(&self) -> Instant {
        self.end
    }

    /// Wall time of the run.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.end.duration_since(self.start)
    }

    /// Wall time of the run in whole milliseconds.
    #[must_use]
    pub fn elapsed_millis(&self) -> u64 {
        u64::try_from(self.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// True if a stop request cut the input short.
    #[must_use]
    pub fn was_stopped(&self) -> bool {
        self.stopped
    }

    /// Items dropped by workers under the skip error policy.
    #[must_use]
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Per-queue statistics, in pipeline order.
    #[must_use]
    pub fn queue_stats(&self) -> &[QueueStats] {
        &self.queue_stats
    }
}

/// A fan-out/fan-in farm over a finite input sequence.
pub struct Pipeline<W: Workload> {
    config: PipelineConfig,
    inputs: Option<Vec<W::Input>>,
    workloads: Vec<W>,
    state: SharedState,
    stop: StopHandle,
    collected: Option<CollectedResults<W::Output>>,
}

impl Pipeline<Md5Workload> {
    /// MD5 brute-force farm over the reference domain `[0, MAX_BRUTEFORCE_INPUT]`.
    ///
    /// # Errors
    ///
    /// Returns an error if `worker_count` or `queue_capacity` is zero.
    pub fn new(worker_count: usize, inputs: Vec<Md5Digest>, queue_capacity: usize) -> Result<Self> {
        Self::with_max_input(worker_count, inputs, queue_capacity, MAX_BRUTEFORCE_INPUT)
    }

    /// MD5 brute-force farm over `[0, max_input]`.
    ///
    /// # Errors
    ///
    /// Returns an error if `worker_count` or `queue_capacity` is zero.
    pub fn with_max_input(
        worker_count: usize,
        inputs: Vec<Md5Digest>,
        queue_capacity: usize,
        max_input: i32,
    ) -> Result<Self> {
        let config = PipelineConfig::with_workers(worker_count).with_queue_capacity(queue_capacity);
        Self::with_config(config, inputs, |_| Md5Workload::new(max_input))
    }
}

/// Stages wired together but not yet started.
struct Wiring<W: Workload> {
    producer: Producer<W::Input>,
    distributor: Distributor<W::Input>,
    workers: Vec<Worker<W>>,
    merger: Merger<W::Output>,
    collector: Collector<W::Output>,
}

impl<W: Workload + 'static> Pipeline<W> {
    /// Assemble a farm; `factory` builds the workload of each worker from its index.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` is invalid. No thread is started.
    pub fn with_config<F>(config: PipelineConfig, inputs: Vec<W::Input>, factory: F) -> Result<Self>
    where
        F: FnMut(usize) -> W,
    {
        config.validate()?;
        let workloads = (0..config.workers).map(factory).collect();
        Ok(Self {
            config,
            inputs: Some(inputs),
            workloads,
            state: SharedState::default(),
            stop: StopHandle::new(),
            collected: None,
        })
    }

    /// The configuration this pipeline was assembled with.
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> PipelineState {
        self.state.get()
    }

    /// Handle that makes the producer close its output early.
    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Results of the last successful run; empty before [`run`](Self::run).
    #[must_use]
    pub fn collected(&self) -> &[W::Output] {
        match &self.collected {
            Some(collected) => collected.results(),
            None => &[],
        }
    }

    /// Full results of the last successful run, if any.
    #[must_use]
    pub fn results(&self) -> Option<&CollectedResults<W::Output>> {
        self.collected.as_ref()
    }

    /// Run the farm to completion.
    ///
    /// Blocks until every stage thread has been joined.
    ///
    /// # Errors
    ///
    /// Returns [`HashfarmError::AlreadyRun`] on a second call, or the stage failure(s)
    /// if any stage returned an error or panicked.
    pub fn run(&mut self) -> Result<&CollectedResults<W::Output>> {
        if self.state.get() != PipelineState::Assembled {
            return Err(HashfarmError::AlreadyRun);
        }

        let wiring = match self.wire() {
            Ok(wiring) => wiring,
            Err(e) => {
                self.state.set(PipelineState::Failed);
                return Err(e);
            }
        };
        let Wiring { producer, distributor, workers, merger, collector } = wiring;
        let worker_count = workers.len();

        let failures = Arc::new(FailureLog::new(self.stop.clone()));
        info!(
            "Starting farm: {worker_count} workers, queue capacity {}, {:?} / {:?}",
            self.config.queue_capacity, self.config.distribution, self.config.merge
        );
        self.state.set(PipelineState::Started);
        let start = Instant::now();

        let collector_thread =
            StageThread::spawn("collector", &failures, move || Ok(collector.run()));
        let merger_thread = StageThread::spawn("merger", &failures, move || Ok(merger.run()?));
        let worker_threads: Vec<_> = workers
            .into_iter()
            .map(|worker| StageThread::spawn(worker.name(), &failures, move || worker.run()))
            .collect();
        let distributor_thread =
            StageThread::spawn("distributor", &failures, move || Ok(distributor.run()?));
        let producer_thread =
            StageThread::spawn("producer", &failures, move || Ok(producer.run()?));

        let producer_report = producer_thread.join(&failures).unwrap_or_default();
        let distributor_report = distributor_thread.join(&failures).unwrap_or_default();
        let worker_reports: Vec<_> =
            worker_threads.into_iter().filter_map(|thread| thread.join(&failures)).collect();
        let merger_report = merger_thread.join(&failures).unwrap_or_default();
        let collector_output = collector_thread.join(&failures);

        if let Err(e) = failures.take_result() {
            self.state.set(PipelineState::Failed);
            error!("Farm failed after {}: {e}", format_duration(start.elapsed()));
            return Err(e);
        }
        self.state.set(PipelineState::Finished);

        let mut queue_stats = vec![producer_report.queue_stats];
        queue_stats.extend(distributor_report.queue_stats);
        queue_stats.extend(worker_reports.iter().map(|r| r.queue_stats.clone()));
        queue_stats.push(merger_report.queue_stats);
        log_queue_stats(&queue_stats);

        let (results, end) = match collector_output {
            Some(CollectorOutput { results, finished_at }) => (results, finished_at),
            None => (Vec::new(), Instant::now()),
        };
        let skipped = worker_reports.iter().map(|r| r.skipped).sum();
        info!(
            "Farm finished: {} results in {}",
            format_count(results.len() as u64),
            format_duration(end.duration_since(start))
        );

        let collected = CollectedResults {
            results,
            start,
            end,
            stopped: producer_report.stopped,
            skipped,
            queue_stats,
        };
        Ok(&*self.collected.insert(collected))
    }

    /// Build every queue and stage. Nothing runs yet.
    fn wire(&mut self) -> Result<Wiring<W>> {
        let capacity = self.config.queue_capacity;
        let inputs = self.inputs.take().unwrap_or_default();
        let workloads = std::mem::take(&mut self.workloads);

        let (producer_tx, distributor_rx) = bounded_queue("producer.out", capacity)?;
        let (merger_tx, collector_rx) = bounded_queue("merger.out", capacity)?;

        let mut distributor =
            Distributor::new("distributor", distributor_rx, self.config.distribution);
        let mut merger = Merger::new("merger", merger_tx, self.config.merge);
        let mut workers = Vec::with_capacity(workloads.len());
        for (index, workload) in workloads.into_iter().enumerate() {
            let (in_tx, in_rx) = bounded_queue(format!("worker-{index}.in"), capacity)?;
            let (out_tx, out_rx) = bounded_queue(format!("worker-{index}.out"), capacity)?;
            distributor.add_output(in_tx);
            merger.add_input(out_rx);
            workers.push(Worker::new(index, workload, in_rx, out_tx, self.config.error_policy));
        }
        distributor.validate()?;
        merger.validate()?;

        Ok(Wiring {
            producer: Producer::new(inputs, producer_tx, self.stop.clone(), self.state.clone()),
            distributor,
            workers,
            merger,
            collector: Collector::new(collector_rx, self.config.progress_interval),
        })
    }
}
