/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;

use crate::config::MetricsConfig;
use crate::registry::{Metric, MetricRegistry, RegistryError};
use crate::sample::{Sample, SampleSnapshot};

/// Distribution statistics over a stream of `i64` values, with memory
/// bounded by the owned [`Sample`].
///
/// The variant is fixed at construction time: an enabled config yields
/// `Active`, a disabled one yields `Disabled`, and [`Histogram::snapshot`]
/// yields `Frozen`. Handles are cheap to clone and share the same
/// underlying state.
#[derive(Clone)]
pub enum Histogram {
    Active(Arc<dyn Sample>),
    Frozen(Arc<SampleSnapshot>),
    Disabled,
}

impl Histogram {
    pub fn new(config: &MetricsConfig, sample: Arc<dyn Sample>) -> Histogram {
        if !config.is_enabled() {
            return Histogram::Disabled;
        }
        Histogram::Active(sample)
    }

    /// Record one value.
    pub fn update(&self, value: i64) {
        match self {
            Histogram::Active(sample) => sample.update(value),
            Histogram::Frozen(_) => panic!("update called on a frozen histogram"),
            Histogram::Disabled => {}
        }
    }

    /// Reset the underlying sample to empty.
    pub fn clear(&self) {
        match self {
            Histogram::Active(sample) => sample.clear(),
            Histogram::Frozen(_) => panic!("clear called on a frozen histogram"),
            Histogram::Disabled => {}
        }
    }

    pub fn count(&self) -> i64 {
        match self {
            Histogram::Active(sample) => sample.count(),
            Histogram::Frozen(snapshot) => snapshot.count(),
            Histogram::Disabled => 0,
        }
    }

    pub fn min(&self) -> i64 {
        match self {
            Histogram::Active(sample) => sample.min(),
            Histogram::Frozen(snapshot) => snapshot.min(),
            Histogram::Disabled => 0,
        }
    }

    pub fn max(&self) -> i64 {
        match self {
            Histogram::Active(sample) => sample.max(),
            Histogram::Frozen(snapshot) => snapshot.max(),
            Histogram::Disabled => 0,
        }
    }

    pub fn mean(&self) -> f64 {
        match self {
            Histogram::Active(sample) => sample.mean(),
            Histogram::Frozen(snapshot) => snapshot.mean(),
            Histogram::Disabled => 0.0,
        }
    }

    pub fn std_dev(&self) -> f64 {
        match self {
            Histogram::Active(sample) => sample.std_dev(),
            Histogram::Frozen(snapshot) => snapshot.std_dev(),
            Histogram::Disabled => 0.0,
        }
    }

    pub fn variance(&self) -> f64 {
        match self {
            Histogram::Active(sample) => sample.variance(),
            Histogram::Frozen(snapshot) => snapshot.variance(),
            Histogram::Disabled => 0.0,
        }
    }

    pub fn sum(&self) -> i64 {
        match self {
            Histogram::Active(sample) => sample.sum(),
            Histogram::Frozen(snapshot) => snapshot.sum(),
            Histogram::Disabled => 0,
        }
    }

    pub fn percentile(&self, p: f64) -> f64 {
        match self {
            Histogram::Active(sample) => sample.percentile(p),
            Histogram::Frozen(snapshot) => snapshot.percentile(p),
            Histogram::Disabled => 0.0,
        }
    }

    pub fn percentiles(&self, ps: &[f64]) -> Vec<f64> {
        match self {
            Histogram::Active(sample) => sample.percentiles(ps),
            Histogram::Frozen(snapshot) => snapshot.percentiles(ps),
            Histogram::Disabled => vec![0.0; ps.len()],
        }
    }

    /// Immutable point-in-time copy. Idempotent on an already frozen
    /// histogram.
    pub fn snapshot(&self) -> Histogram {
        match self {
            Histogram::Active(sample) => Histogram::Frozen(Arc::new(sample.snapshot())),
            Histogram::Frozen(snapshot) => Histogram::Frozen(Arc::clone(snapshot)),
            Histogram::Disabled => Histogram::Disabled,
        }
    }

    /// The underlying sample. Callers must not record into it directly.
    pub fn sample(&self) -> Option<Arc<dyn Sample>> {
        match self {
            Histogram::Active(sample) => Some(Arc::clone(sample)),
            Histogram::Frozen(snapshot) => Some(Arc::clone(snapshot) as Arc<dyn Sample>),
            Histogram::Disabled => None,
        }
    }
}

/// Return the histogram registered under `name`, or build and register a
/// new one from `sample`.
///
/// Panics if `name` is bound to a metric of a different kind.
pub fn get_or_register_histogram(
    name: &str,
    registry: &dyn MetricRegistry,
    config: &MetricsConfig,
    sample: Arc<dyn Sample>,
) -> Histogram {
    let metric = registry.get_or_register(name, &|| {
        Metric::Histogram(Histogram::new(config, sample.clone()))
    });
    match metric {
        Metric::Histogram(h) => h,
        other => panic!("metric {name} is already registered as a {}", other.kind()),
    }
}

/// Build a new histogram and register it under `name`.
pub fn new_registered_histogram(
    name: &str,
    registry: &dyn MetricRegistry,
    config: &MetricsConfig,
    sample: Arc<dyn Sample>,
) -> Result<Histogram, RegistryError> {
    let histogram = Histogram::new(config, sample);
    registry.register(name, Metric::Histogram(histogram.clone()))?;
    Ok(histogram)
}
