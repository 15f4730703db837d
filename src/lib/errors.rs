//! Custom error types for hashfarm operations.

use thiserror::Error;

/// Result type alias for hashfarm operations
pub type Result<T> = std::result::Result<T, HashfarmError>;

/// Error type for hashfarm operations
#[derive(Error, Debug)]
pub enum HashfarmError {
    /// Invalid parameter value provided
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// The parameter name
        parameter: String,
        /// Explanation of why it's invalid
        reason: String,
    },

    /// A fan-out or fan-in stage was started with no registered queues
    #[error("{stage} has no registered {port} queues")]
    NoPorts {
        /// Stage name
        stage: String,
        /// "output" or "input"
        port: &'static str,
    },

    /// An item was sent on a queue after its sender closed it
    #[error("Send on closed queue '{queue}'")]
    SendAfterClose {
        /// Queue label
        queue: String,
    },

    /// The consumer of a queue went away while items were still being sent
    #[error("Queue '{queue}' has no receiver")]
    QueueDisconnected {
        /// Queue label
        queue: String,
    },

    /// Every output of a distributor went away before the input was exhausted
    #[error("{stage}: all {outputs} outputs disconnected with items still pending")]
    AllOutputsDisconnected {
        /// Stage name
        stage: String,
        /// Number of registered outputs
        outputs: usize,
    },

    /// `run()` was called on a pipeline that already ran
    #[error("Pipeline has already been run")]
    AlreadyRun,

    /// A stage returned an error
    #[error("Stage '{stage}' failed: {source:#}")]
    StageFailed {
        /// Stage name
        stage: String,
        /// Underlying failure
        #[source]
        source: anyhow::Error,
    },

    /// A stage thread panicked
    #[error("Stage '{stage}' panicked: {message}")]
    StagePanicked {
        /// Stage name
        stage: String,
        /// Panic payload rendered as text
        message: String,
    },

    /// More than one stage failed; the first failure is kept as the source
    #[error("{count} stages failed; first: {first}")]
    MultipleStagesFailed {
        /// Number of failed stages
        count: usize,
        /// The first failure observed at join
        #[source]
        first: Box<HashfarmError>,
    },
}

impl HashfarmError {
    /// True for errors raised while assembling, before any thread starts.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::InvalidParameter { .. } | Self::NoPorts { .. })
    }

    /// True for failures caused by a neighbouring stage going away rather than by the
    /// failing stage itself.
    #[must_use]
    pub fn is_disconnect(&self) -> bool {
        match self {
            Self::QueueDisconnected { .. } | Self::AllOutputsDisconnected { .. } => true,
            Self::StageFailed { source, .. } => {
                source.downcast_ref::<HashfarmError>().is_some_and(HashfarmError::is_disconnect)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter() {
        let error = HashfarmError::InvalidParameter {
            parameter: "workers".to_string(),
            reason: "must be >= 1".to_string(),
        };
        let msg = format!("{error}");
        assert!(msg.contains("Invalid parameter 'workers'"));
        assert!(msg.contains("must be >= 1"));
        assert!(error.is_configuration_error());
    }

    #[test]
    fn test_no_ports() {
        let error = HashfarmError::NoPorts { stage: "distributor".to_string(), port: "output" };
        assert_eq!(error.to_string(), "distributor has no registered output queues");
        assert!(error.is_configuration_error());
    }

    #[test]
    fn test_stage_failed_keeps_source() {
        let error = HashfarmError::StageFailed {
            stage: "worker-3".to_string(),
            source: anyhow::anyhow!("disk full"),
        };
        let msg = error.to_string();
        assert!(msg.contains("worker-3"));
        assert!(msg.contains("disk full"));
        assert!(!error.is_configuration_error());
    }

    #[test]
    fn test_is_disconnect() {
        let direct = HashfarmError::QueueDisconnected { queue: "worker-1.out".to_string() };
        assert!(direct.is_disconnect());

        let wrapped = HashfarmError::StageFailed {
            stage: "producer".to_string(),
            source: anyhow::Error::new(HashfarmError::AllOutputsDisconnected {
                stage: "distributor".to_string(),
                outputs: 2,
            }),
        };
        assert!(wrapped.is_disconnect());

        let root = HashfarmError::StageFailed {
            stage: "worker-0".to_string(),
            source: anyhow::anyhow!("bad item"),
        };
        assert!(!root.is_disconnect());
    }

    #[test]
    fn test_multiple_failures_reports_first() {
        let first = HashfarmError::StagePanicked {
            stage: "worker-0".to_string(),
            message: "boom".to_string(),
        };
        let error = HashfarmError::MultipleStagesFailed { count: 2, first: Box::new(first) };
        let msg = error.to_string();
        assert!(msg.starts_with("2 stages failed"));
        assert!(msg.contains("worker-0"));
    }
}
