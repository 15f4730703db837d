//! Source stage: feeds a finite sequence into the pipeline.

use log::{debug, info};

use super::queue::{QueueSender, QueueStats};
use super::stage::{PipelineState, SharedState, StopHandle};
use crate::errors::Result;

/// What the producer did during its run.
#[derive(Debug, Clone, Default)]
pub struct ProducerReport {
    /// Items sent downstream.
    pub sent: u64,
    /// True if the stop signal cut the sequence short.
    pub stopped: bool,
    /// Statistics of the output queue.
    pub queue_stats: QueueStats,
}

/// Sends every item of its sequence, then closes its output.
///
/// Closing the output is what starts the drain: the distributor sees end-of-stream,
/// closes the worker inputs, and so on down to the collector.
pub struct Producer<T> {
    items: Box<dyn Iterator<Item = T> + Send>,
    output: QueueSender<T>,
    stop: StopHandle,
    state: SharedState,
}

impl<T: Send + 'static> Producer<T> {
    /// Create a producer over `items`.
    pub fn new<I>(items: I, output: QueueSender<T>, stop: StopHandle, state: SharedState) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: Send + 'static,
    {
        Self { items: Box::new(items.into_iter()), output, stop, state }
    }

    /// Send every item unless stopped, then close the output.
    ///
    /// # Errors
    ///
    /// Returns an error if the distributor went away before the sequence was sent.
    pub fn run(self) -> Result<ProducerReport> {
        let Self { items, mut output, stop, state } = self;
        let mut report = ProducerReport::default();

        for item in items {
            if stop.is_stopped() {
                report.stopped = true;
                break;
            }
            output.send(item)?;
            report.sent += 1;
        }

        output.close();
        state.transition(PipelineState::Started, PipelineState::Draining);
        if report.stopped {
            info!("Stop requested: producer closed its output after {} items", report.sent);
        } else {
            debug!("producer sent {} items", report.sent);
        }
        report.queue_stats = output.stats();
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::HashfarmError;
    use crate::farm::queue::bounded_queue;

    #[test]
    fn test_sends_everything_then_closes() {
        let (tx, rx) = bounded_queue("producer.out", 8).unwrap();
        let state = SharedState::default();
        state.set(PipelineState::Started);

        let report = Producer::new(0..5, tx, StopHandle::new(), state.clone()).run().unwrap();
        assert_eq!(report.sent, 5);
        assert!(!report.stopped);
        assert_eq!(state.get(), PipelineState::Draining);
        assert_eq!(rx.collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_stop_closes_output_early() {
        let (tx, rx) = bounded_queue("producer.out", 8).unwrap();
        let stop = StopHandle::new();
        stop.stop();

        let report = Producer::new(vec![1, 2, 3], tx, stop, SharedState::default()).run().unwrap();
        assert!(report.stopped);
        assert_eq!(report.sent, 0);
        assert_eq!(rx.recv(), None);
    }

    #[test]
    fn test_missing_consumer_is_error() {
        let (tx, rx) = bounded_queue("producer.out", 1).unwrap();
        drop(rx);
        let err =
            Producer::new([7], tx, StopHandle::new(), SharedState::default()).run().unwrap_err();
        assert!(matches!(err, HashfarmError::QueueDisconnected { .. }));
    }
}
