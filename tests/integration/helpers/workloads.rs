//! Test workloads with controllable cost and failure behavior.

#![allow(dead_code)]

use anyhow::bail;
use hashfarm_lib::workload::Workload;
use std::thread;
use std::time::Duration;

/// Emits `(worker index, input)` so tests can see which worker handled what.
pub struct Tagging {
    pub index: usize,
    pub delay: Duration,
}

impl Tagging {
    pub fn fast(index: usize) -> Self {
        Self { index, delay: Duration::ZERO }
    }

    /// Worker 0 sleeps `delay` per item; every other worker is instant.
    pub fn skewed(index: usize, delay: Duration) -> Self {
        Self { index, delay: if index == 0 { delay } else { Duration::ZERO } }
    }
}

impl Workload for Tagging {
    type Input = u64;
    type Output = (usize, u64);

    fn process(&mut self, input: u64) -> anyhow::Result<(usize, u64)> {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        Ok((self.index, input))
    }
}

/// Count how many outputs each of `workers` workers produced.
pub fn per_worker_counts(results: &[(usize, u64)], workers: usize) -> Vec<usize> {
    let mut counts = vec![0; workers];
    for &(index, _) in results {
        counts[index] += 1;
    }
    counts
}

/// Squares its input after an optional per-item delay.
pub struct Square {
    pub delay: Duration,
}

impl Workload for Square {
    type Input = u64;
    type Output = u64;

    fn process(&mut self, input: u64) -> anyhow::Result<u64> {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        Ok(input * input)
    }
}

/// Fails on multiples of `modulus` and panics on `panic_on`.
pub struct Picky {
    pub modulus: u64,
    pub panic_on: Option<u64>,
}

impl Workload for Picky {
    type Input = u64;
    type Output = u64;

    fn process(&mut self, input: u64) -> anyhow::Result<u64> {
        if self.panic_on == Some(input) {
            panic!("picky worker refused {input}");
        }
        if input % self.modulus == 0 {
            bail!("{input} is a multiple of {}", self.modulus);
        }
        Ok(input)
    }
}
