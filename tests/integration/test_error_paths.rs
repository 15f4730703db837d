//! Error path integration tests.
//!
//! These tests verify that configuration errors are caught before any thread starts,
//! and that worker failures surface from `run()` without hanging the farm.

use hashfarm_lib::errors::HashfarmError;
use hashfarm_lib::farm::{
    DistributionStrategy, Pipeline, PipelineConfig, PipelineState, WorkerErrorPolicy,
};
use hashfarm_lib::targets;
use hashfarm_lib::workload::FileRoundTrip;
use tempfile::TempDir;

use crate::helpers::{Picky, Square};

fn picky(modulus: u64, panic_on: Option<u64>) -> impl FnMut(usize) -> Picky {
    move |_| Picky { modulus, panic_on }
}

// ==================== Configuration Errors ====================

#[test]
fn test_zero_workers_rejected() {
    let err = Pipeline::with_max_input(0, targets::repeated(1, 3), 4, 10).err().unwrap();
    assert!(err.is_configuration_error());
}

#[test]
fn test_zero_capacity_rejected() {
    let err = Pipeline::with_max_input(2, targets::repeated(1, 3), 0, 10).err().unwrap();
    assert!(err.is_configuration_error());
    assert!(err.to_string().contains("queue-capacity"), "unexpected message: {err}");
}

#[test]
fn test_zero_full_rounds_rejected() {
    let config = PipelineConfig::with_workers(2)
        .with_distribution(DistributionStrategy::NonBlockingRoundRobin { max_full_rounds: 0 });
    let result =
        Pipeline::with_config(config, vec![1u64], |_| Square { delay: Default::default() });
    assert!(result.is_err());
}

#[test]
fn test_second_run_rejected() {
    let mut pipeline = Pipeline::with_max_input(2, targets::for_values(&[1, 2]), 2, 10).unwrap();
    assert_eq!(pipeline.run().unwrap().len(), 2);

    let err = pipeline.run().err().unwrap();
    assert!(matches!(err, HashfarmError::AlreadyRun));
    assert_eq!(pipeline.collected().len(), 2, "first run's results stay available");
}

// ==================== Worker Failures ====================

#[test]
fn test_worker_error_fails_run() {
    let config = PipelineConfig::with_workers(3).with_queue_capacity(2);
    let mut pipeline = Pipeline::with_config(config, (1..=500).collect(), picky(97, None)).unwrap();

    let err = pipeline.run().err().unwrap();
    let message = err.to_string();

    assert!(message.contains("multiple of 97"), "root cause missing: {message}");
    assert!(!err.is_disconnect(), "root cause should win over disconnects: {message}");
    assert_eq!(pipeline.state(), PipelineState::Failed);
    assert!(pipeline.results().is_none());
}

#[test]
fn test_worker_panic_fails_run() {
    let config = PipelineConfig::with_workers(2).with_queue_capacity(2);
    let mut pipeline =
        Pipeline::with_config(config, (1..=200).collect(), picky(u64::MAX, Some(50))).unwrap();

    let err = pipeline.run().err().unwrap();

    assert!(err.to_string().contains("picky worker refused 50"), "unexpected: {err}");
    assert_eq!(pipeline.state(), PipelineState::Failed);
}

#[test]
fn test_skip_policy_drops_failed_items() {
    let config = PipelineConfig::with_workers(3)
        .with_queue_capacity(2)
        .with_error_policy(WorkerErrorPolicy::Skip);
    let mut pipeline = Pipeline::with_config(config, (1..=100).collect(), picky(10, None)).unwrap();

    let run = pipeline.run().unwrap();

    assert_eq!(run.len(), 90);
    assert_eq!(run.skipped(), 10);
    assert!(run.results().iter().all(|x| x % 10 != 0));
}

#[test]
fn test_file_workload_in_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("gone");
    let config = PipelineConfig::with_workers(2).with_queue_capacity(2);
    let mut pipeline = Pipeline::with_config(config, vec![16usize; 10], |index| {
        FileRoundTrip::new(&missing, index)
    })
    .unwrap();

    let err = pipeline.run().err().unwrap();

    assert!(err.to_string().contains("Failed to create"), "unexpected: {err}");
}
