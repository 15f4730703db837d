//! End-to-end tests of the MD5 brute-force farm.

use hashfarm_lib::farm::{
    DistributionStrategy, MergeStrategy, Pipeline, PipelineConfig, PipelineState,
};
use hashfarm_lib::targets;
use hashfarm_lib::workload::Md5Workload;
use hashfarm_lib::{FAILURE_SENTINEL, Md5Digest};
use rstest::rstest;

use crate::helpers::assert_same_multiset;

// ============================================================================
// Reference scenarios
// ============================================================================

#[test]
fn test_single_worker_reverses_every_target() {
    let values = [5, 50, 1000, 1234, 9999];
    let mut pipeline =
        Pipeline::with_max_input(1, targets::for_values(&values), 8, 10_000).unwrap();

    let run = pipeline.run().unwrap();

    assert_same_multiset(run.results(), &values);
    assert!(!run.was_stopped());
    assert_eq!(pipeline.state(), PipelineState::Finished);
}

#[test]
fn test_many_workers_on_identical_targets() {
    // Full 10,000,000 domain; the search stops at the preimage.
    let mut pipeline = Pipeline::new(10, targets::repeated(1234, 100), 16).unwrap();
    assert_eq!(pipeline.config().workers, 10);
    assert_eq!(pipeline.config().queue_capacity, 16);

    let run = pipeline.run().unwrap();

    assert_eq!(run.len(), 100);
    assert!(run.results().iter().all(|&r| r == 1234));
}

#[test]
fn test_preimage_at_domain_upper_bound() {
    let mut pipeline =
        Pipeline::with_max_input(2, targets::repeated(100_000, 4), 2, 100_000).unwrap();

    let run = pipeline.run().unwrap();

    assert_eq!(run.results(), &[100_000; 4]);
}

#[test]
fn test_target_outside_domain_yields_sentinel() {
    let inputs = targets::for_values(&[7, 500, 3]);
    let mut pipeline = Pipeline::with_max_input(2, inputs, 4, 100).unwrap();

    let run = pipeline.run().unwrap();

    assert_same_multiset(run.results(), &[7, FAILURE_SENTINEL, 3]);
}

#[test]
fn test_unreachable_digest_yields_sentinel() {
    let digest: Md5Digest = "d41d8cd98f00b204e9800998ecf8427e".parse().unwrap();
    let mut pipeline = Pipeline::with_max_input(1, vec![digest], 1, 1_000).unwrap();

    let run = pipeline.run().unwrap();

    assert_eq!(run.results(), &[FAILURE_SENTINEL]);
}

#[test]
fn test_empty_input_finishes_with_no_results() {
    let mut pipeline = Pipeline::with_max_input(4, Vec::new(), 2, 10).unwrap();

    let run = pipeline.run().unwrap();

    assert!(run.is_empty());
    assert!(run.end() >= run.start());
}

// ============================================================================
// Strategy combinations
// ============================================================================

#[rstest]
#[case::non_blocking_busy_wait(
    DistributionStrategy::default(),
    MergeStrategy::BusyWaitRoundRobin
)]
#[case::non_blocking_blocking(DistributionStrategy::default(), MergeStrategy::Blocking)]
#[case::blocking_busy_wait(
    DistributionStrategy::BlockingRoundRobin,
    MergeStrategy::BusyWaitRoundRobin
)]
#[case::blocking_blocking(DistributionStrategy::BlockingRoundRobin, MergeStrategy::Blocking)]
#[case::impatient_non_blocking(
    DistributionStrategy::NonBlockingRoundRobin { max_full_rounds: 1 },
    MergeStrategy::Blocking
)]
fn test_every_strategy_pair_is_complete(
    #[case] distribution: DistributionStrategy,
    #[case] merge: MergeStrategy,
) {
    let values: Vec<i32> = (0..300).map(|i| (i * 37) % 2_000).collect();
    let config = PipelineConfig::with_workers(4)
        .with_queue_capacity(3)
        .with_distribution(distribution)
        .with_merge(merge)
        .with_progress_interval(0);
    let mut pipeline =
        Pipeline::with_config(config, targets::for_values(&values), |_| Md5Workload::new(2_000))
            .unwrap();

    let run = pipeline.run().unwrap();

    assert_same_multiset(run.results(), &values);
}

#[test]
fn test_capacity_one_queues_still_complete() {
    let values: Vec<i32> = (0..64).collect();
    let mut pipeline = Pipeline::with_max_input(3, targets::for_values(&values), 1, 64).unwrap();

    let run = pipeline.run().unwrap();

    assert_same_multiset(run.results(), &values);
}

// ============================================================================
// Reported metadata
// ============================================================================

#[test]
fn test_queue_stats_cover_every_queue() {
    let values: Vec<i32> = (0..50).collect();
    let mut pipeline = Pipeline::with_max_input(3, targets::for_values(&values), 4, 50).unwrap();

    let run = pipeline.run().unwrap();
    let stats = run.queue_stats();

    // producer.out, three worker inputs, three worker outputs, merger.out
    assert_eq!(stats.len(), 8);
    assert_eq!(stats[0].label, "producer.out");
    assert_eq!(stats[0].sent, 50);
    assert_eq!(stats[7].label, "merger.out");
    assert_eq!(stats[7].sent, 50);
    let delivered: u64 = stats[1..4].iter().map(|s| s.sent).sum();
    assert_eq!(delivered, 50);
    assert!(stats.iter().all(|s| s.capacity == 4));
}

#[test]
fn test_seeded_uniform_targets_are_reproducible() {
    let first = targets::uniform(0, 5_000, 40, Some(11)).unwrap();
    let second = targets::uniform(0, 5_000, 40, Some(11)).unwrap();
    assert_eq!(first, second);

    let mut pipeline = Pipeline::with_max_input(4, first, 8, 5_000).unwrap();
    let run = pipeline.run().unwrap();
    assert_eq!(run.len(), 40);
    assert!(run.results().iter().all(|&r| (0..=5_000).contains(&r)));
}
