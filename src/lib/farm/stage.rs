//! Stage threads and the shared lifecycle signals.
//!
//! Every stage of the farm runs on its own named OS thread. Stages share exactly three
//! things besides their queues: a [`StopHandle`] for cooperative shutdown, the
//! [`SharedState`] of the pipeline they belong to, and a [`FailureLog`] recording the
//! first failures in the order they happened.

use log::debug;
use parking_lot::Mutex;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::thread::{self, JoinHandle};

use crate::errors::{HashfarmError, Result};

/// Cooperative stop signal.
///
/// Clones share the same flag. The producer checks it before every send and closes its
/// output early once it is set, which drains the rest of the pipeline normally.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    /// Create a new, unset handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown.
    pub fn stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// True once [`stop`](Self::stop) has been called on any clone.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Lifecycle of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PipelineState {
    /// Wired but not started.
    Assembled = 0,
    /// Stage threads are running.
    Started = 1,
    /// The producer closed its output; close signals are flowing downstream.
    Draining = 2,
    /// All stages terminated normally and were joined.
    Finished = 3,
    /// At least one stage failed.
    Failed = 4,
}

impl PipelineState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Assembled,
            1 => Self::Started,
            2 => Self::Draining,
            3 => Self::Finished,
            _ => Self::Failed,
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Assembled => "assembled",
            Self::Started => "started",
            Self::Draining => "draining",
            Self::Finished => "finished",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Pipeline state readable from any stage.
#[derive(Debug, Clone)]
pub struct SharedState {
    state: Arc<AtomicU8>,
}

impl Default for SharedState {
    fn default() -> Self {
        Self { state: Arc::new(AtomicU8::new(PipelineState::Assembled as u8)) }
    }
}

impl SharedState {
    /// Current state.
    #[must_use]
    pub fn get(&self) -> PipelineState {
        PipelineState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Unconditionally move to `next`.
    pub fn set(&self, next: PipelineState) {
        self.state.store(next as u8, Ordering::Release);
    }

    /// Move from `from` to `to`; returns false if the state was not `from`.
    pub fn transition(&self, from: PipelineState, to: PipelineState) -> bool {
        self.state
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

/// Failures recorded by stages as they happen.
///
/// Recording a failure also raises the stop signal so the producer stops feeding a
/// pipeline that can no longer complete.
#[derive(Debug)]
pub struct FailureLog {
    failures: Mutex<Vec<HashfarmError>>,
    stop: StopHandle,
}

impl FailureLog {
    /// Create an empty log tied to `stop`.
    #[must_use]
    pub fn new(stop: StopHandle) -> Self {
        Self { failures: Mutex::new(Vec::new()), stop }
    }

    /// Record a failure and request shutdown.
    pub fn record(&self, error: HashfarmError) {
        debug!("Recording failure: {error}");
        self.failures.lock().push(error);
        self.stop.stop();
    }

    /// Drain the log into a single result.
    ///
    /// # Errors
    ///
    /// Returns the only failure as-is, or [`HashfarmError::MultipleStagesFailed`] when
    /// several stages failed. The reported first failure is the earliest one that was
    /// not merely a neighbour disconnecting, so the root cause is surfaced.
    pub fn take_result(&self) -> Result<()> {
        let mut failures = std::mem::take(&mut *self.failures.lock());
        match failures.len() {
            0 => Ok(()),
            1 => Err(failures.remove(0)),
            count => {
                let root = failures.iter().position(|e| !e.is_disconnect()).unwrap_or(0);
                Err(HashfarmError::MultipleStagesFailed {
                    count,
                    first: Box::new(failures.swap_remove(root)),
                })
            }
        }
    }
}

/// Extracts a message from a panic payload.
///
/// Handles the common cases of `&str` and `String` payloads, with a fallback for other
/// types.
#[must_use]
pub fn extract_panic_message(panic_info: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// A running stage thread.
pub struct StageThread<T> {
    name: String,
    handle: Option<JoinHandle<Option<T>>>,
}

impl<T: Send + 'static> StageThread<T> {
    /// Spawn `body` on a thread named after the stage.
    ///
    /// An error returned by `body` is recorded in `failures` as
    /// [`HashfarmError::StageFailed`] and a panic as [`HashfarmError::StagePanicked`],
    /// both the moment they happen. A failure to spawn the thread is recorded as a
    /// stage failure.
    pub fn spawn<F>(name: impl Into<String>, failures: &Arc<FailureLog>, body: F) -> Self
    where
        F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    {
        let name = name.into();
        let thread_name = name.clone();
        let thread_failures = Arc::clone(failures);

        let spawned = thread::Builder::new().name(name.clone()).spawn(move || {
            debug!("{thread_name} started");
            match panic::catch_unwind(AssertUnwindSafe(body)) {
                Ok(Ok(report)) => {
                    debug!("{thread_name} terminated");
                    Some(report)
                }
                Ok(Err(source)) => {
                    thread_failures
                        .record(HashfarmError::StageFailed { stage: thread_name, source });
                    None
                }
                Err(panic_info) => {
                    let message = extract_panic_message(panic_info);
                    thread_failures
                        .record(HashfarmError::StagePanicked { stage: thread_name, message });
                    None
                }
            }
        });

        match spawned {
            Ok(handle) => Self { name, handle: Some(handle) },
            Err(e) => {
                failures.record(HashfarmError::StageFailed {
                    stage: name.clone(),
                    source: anyhow::Error::new(e).context("failed to spawn stage thread"),
                });
                Self { name, handle: None }
            }
        }
    }

    /// Wait for the stage to terminate.
    ///
    /// Returns the stage's report, or `None` if it failed or panicked. A panic that
    /// escaped the stage body is recorded in `failures` as
    /// [`HashfarmError::StagePanicked`].
    pub fn join(self, failures: &FailureLog) -> Option<T> {
        let handle = self.handle?;
        match handle.join() {
            Ok(report) => report,
            Err(panic_info) => {
                let message = extract_panic_message(panic_info);
                failures.record(HashfarmError::StagePanicked { stage: self.name, message });
                None
            }
        }
    }
}

impl<T> fmt::Debug for StageThread<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StageThread")
            .field("name", &self.name)
            .field("spawned", &self.handle.is_some())
            .finish()
    }
}
