//! Custom assertion helpers for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Count occurrences of every distinct item.
pub fn multiset<T: Eq + Hash + Clone>(items: &[T]) -> HashMap<T, usize> {
    let mut counts = HashMap::new();
    for item in items {
        *counts.entry(item.clone()).or_insert(0) += 1;
    }
    counts
}

/// Asserts that two result sets hold the same items with the same multiplicities,
/// ignoring order.
///
/// # Panics
///
/// Panics if the multisets differ.
pub fn assert_same_multiset<T: Eq + Hash + Clone + Debug>(actual: &[T], expected: &[T]) {
    assert_eq!(actual.len(), expected.len(), "result count mismatch");
    assert_eq!(multiset(actual), multiset(expected), "result multiset mismatch");
}

/// Asserts that a tagged result set was spread exactly evenly over `workers` workers.
///
/// # Panics
///
/// Panics if any worker handled a different number of items than the others.
pub fn assert_even_spread(per_worker: &[usize], total: usize) {
    let workers = per_worker.len();
    for (index, &count) in per_worker.iter().enumerate() {
        let floor = total / workers;
        let expected = if index < total % workers { floor + 1 } else { floor };
        assert_eq!(count, expected, "worker {index} handled {count} items, expected {expected}");
    }
}
