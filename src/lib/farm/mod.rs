//! Fan-out/fan-in farm.
//!
//! # Architecture
//!
//! ```text
//!                          +--> Worker 0 --+
//! Producer --> Distributor +--> Worker 1 --+--> Merger --> Collector
//!                          +--> Worker n --+
//! ```
//!
//! Every arrow is a bounded queue ([`queue`]) with one sending and one receiving stage,
//! and every box runs on its own thread ([`stage`]). Queues are the only state shared
//! between stages; the close of a queue is the end-of-stream signal.
//!
//! # Guarantees
//!
//! - Each input is delivered to exactly one worker and yields exactly one result (or is
//!   counted as skipped under [`WorkerErrorPolicy::Skip`]).
//! - No queue ever holds more items than its capacity.
//! - FIFO within one queue; no ordering across workers.
//!
//! # Modules
//!
//! - [`queue`]: bounded queues and their statistics
//! - [`distributor`] / [`merger`]: fan-out and fan-in strategies
//! - [`worker`], [`producer`], [`collector`]: the remaining stages
//! - [`pipeline`]: assembly, lifecycle, and the run-to-completion entry point

pub mod collector;
pub mod config;
pub mod distributor;
pub mod merger;
pub mod pipeline;
pub mod producer;
pub mod queue;
pub mod stage;
pub mod worker;

pub use collector::{Collector, CollectorOutput};
pub use config::{DEFAULT_PROGRESS_INTERVAL, DEFAULT_QUEUE_CAPACITY, PipelineConfig};
pub use distributor::{
    DEFAULT_MAX_FULL_ROUNDS, DistributionStrategy, Distributor, DistributorReport,
};
pub use merger::{MergeStrategy, Merger, MergerReport};
pub use pipeline::{CollectedResults, Pipeline};
pub use producer::{Producer, ProducerReport};
pub use queue::{QueueReceiver, QueueSender, QueueStats, TryRecv, TrySendError, bounded_queue};
pub use stage::{
    FailureLog, PipelineState, SharedState, StageThread, StopHandle, extract_panic_message,
};
pub use worker::{Worker, WorkerErrorPolicy, WorkerReport};
