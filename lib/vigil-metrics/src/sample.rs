/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use crate::stats;

/// Bounded-memory accumulator of raw recorded values.
///
/// Implementations synchronize internally; every method takes `&self`
/// and may be called from any thread. The reservoir strategy is up to
/// the implementation, a `Histogram` only relies on this contract.
pub trait Sample: Send + Sync {
    fn update(&self, value: i64);
    fn clear(&self);
    fn count(&self) -> i64;
    fn min(&self) -> i64;
    fn max(&self) -> i64;
    fn mean(&self) -> f64;
    fn std_dev(&self) -> f64;
    fn variance(&self) -> f64;
    fn sum(&self) -> i64;
    fn percentile(&self, p: f64) -> f64;
    fn percentiles(&self, ps: &[f64]) -> Vec<f64>;
    fn snapshot(&self) -> SampleSnapshot;
}

/// Frozen copy of a [`Sample`] at a point in time.
///
/// Values are sorted once at construction, all statistics afterwards are
/// pure reads. The mutating half of the `Sample` contract panics here.
#[derive(Clone, Debug)]
pub struct SampleSnapshot {
    count: i64,
    values: Vec<i64>,
}

impl SampleSnapshot {
    pub fn new(count: i64, mut values: Vec<i64>) -> Self {
        stats::sort_values(&mut values);
        SampleSnapshot { count, values }
    }

    /// The sampled values in ascending order.
    pub fn values(&self) -> &[i64] {
        &self.values
    }
}

impl Sample for SampleSnapshot {
    fn update(&self, _value: i64) {
        panic!("update called on a sample snapshot");
    }

    fn clear(&self) {
        panic!("clear called on a sample snapshot");
    }

    fn count(&self) -> i64 {
        self.count
    }

    fn min(&self) -> i64 {
        stats::min(&self.values)
    }

    fn max(&self) -> i64 {
        stats::max(&self.values)
    }

    fn mean(&self) -> f64 {
        stats::mean(&self.values)
    }

    fn std_dev(&self) -> f64 {
        stats::std_dev(&self.values)
    }

    fn variance(&self) -> f64 {
        stats::variance(&self.values)
    }

    fn sum(&self) -> i64 {
        stats::sum(&self.values)
    }

    fn percentile(&self, p: f64) -> f64 {
        stats::percentile_of_sorted(&self.values, p)
    }

    fn percentiles(&self, ps: &[f64]) -> Vec<f64> {
        stats::percentiles_of_sorted(&self.values, ps)
    }

    fn snapshot(&self) -> SampleSnapshot {
        self.clone()
    }
}
