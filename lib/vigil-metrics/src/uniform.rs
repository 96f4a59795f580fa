/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::Mutex;

use crate::sample::{Sample, SampleSnapshot};
use crate::stats;

const DEFAULT_RESERVOIR_SIZE: usize = 1028;

/// Uniform random reservoir over the full stream (Vitter's algorithm R).
///
/// Holds at most `reservoir_size` values; once full, each new value
/// replaces a random slot with probability `reservoir_size / count`.
pub struct UniformSample {
    reservoir_size: usize,
    inner: Mutex<UniformInner>,
}

struct UniformInner {
    count: i64,
    values: Vec<i64>,
}

impl UniformSample {
    pub fn new(reservoir_size: usize) -> Self {
        UniformSample {
            reservoir_size,
            inner: Mutex::new(UniformInner {
                count: 0,
                values: Vec::with_capacity(reservoir_size),
            }),
        }
    }
}

impl Default for UniformSample {
    fn default() -> Self {
        UniformSample::new(DEFAULT_RESERVOIR_SIZE)
    }
}

impl Sample for UniformSample {
    fn update(&self, value: i64) {
        let mut inner = self.inner.lock().unwrap();
        inner.count += 1;
        if inner.values.len() < self.reservoir_size {
            inner.values.push(value);
        } else {
            let r = fastrand::i64(0..inner.count) as usize;
            if r < self.reservoir_size {
                inner.values[r] = value;
            }
        }
    }

    fn clear(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.count = 0;
        inner.values.clear();
    }

    fn count(&self) -> i64 {
        self.inner.lock().unwrap().count
    }

    fn min(&self) -> i64 {
        stats::min(&self.inner.lock().unwrap().values)
    }

    fn max(&self) -> i64 {
        stats::max(&self.inner.lock().unwrap().values)
    }

    fn mean(&self) -> f64 {
        stats::mean(&self.inner.lock().unwrap().values)
    }

    fn std_dev(&self) -> f64 {
        stats::std_dev(&self.inner.lock().unwrap().values)
    }

    fn variance(&self) -> f64 {
        stats::variance(&self.inner.lock().unwrap().values)
    }

    fn sum(&self) -> i64 {
        stats::sum(&self.inner.lock().unwrap().values)
    }

    fn percentile(&self, p: f64) -> f64 {
        let mut sorted = self.inner.lock().unwrap().values.clone();
        stats::sort_values(&mut sorted);
        stats::percentile_of_sorted(&sorted, p)
    }

    fn percentiles(&self, ps: &[f64]) -> Vec<f64> {
        let mut sorted = self.inner.lock().unwrap().values.clone();
        stats::sort_values(&mut sorted);
        stats::percentiles_of_sorted(&sorted, ps)
    }

    fn snapshot(&self) -> SampleSnapshot {
        let inner = self.inner.lock().unwrap();
        SampleSnapshot::new(inner.count, inner.values.clone())
    }
}
