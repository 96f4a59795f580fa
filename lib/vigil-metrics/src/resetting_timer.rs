/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::mem;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::config::MetricsConfig;
use crate::ext::DurationExt;
use crate::registry::{Metric, MetricRegistry, RegistryError};
use crate::stats;

const INITIAL_VALUES_CAP: usize = 10;

/// Timer whose live buffer is handed over to the snapshot that takes it.
///
/// Durations are stored as signed nanosecond counts in an unbounded
/// buffer. [`ResettingTimer::snapshot`] swaps in a fresh empty buffer, so
/// each recorded value is visible in exactly one snapshot.
///
/// Statistics (`mean`, `percentiles`) are only available on a snapshot:
/// their computation sorts the buffer, which must never touch live data.
#[derive(Clone)]
pub enum ResettingTimer {
    Active(Arc<ActiveResettingTimer>),
    Frozen(Arc<ResettingTimerSnapshot>),
    Disabled,
}

pub struct ActiveResettingTimer {
    values: Mutex<Vec<i64>>,
}

impl ActiveResettingTimer {
    fn record(&self, nanos: i64) {
        let mut values = self.values.lock().unwrap();
        values.push(nanos);
    }
}

impl ResettingTimer {
    pub fn new(config: &MetricsConfig) -> ResettingTimer {
        if !config.is_enabled() {
            return ResettingTimer::Disabled;
        }
        ResettingTimer::Active(Arc::new(ActiveResettingTimer {
            values: Mutex::new(Vec::with_capacity(INITIAL_VALUES_CAP)),
        }))
    }

    /// Record the duration of an event.
    pub fn update(&self, duration: Duration) {
        match self {
            ResettingTimer::Active(timer) => timer.record(duration.as_nanos_i64()),
            ResettingTimer::Frozen(_) => {
                panic!("update called on a resetting timer snapshot")
            }
            ResettingTimer::Disabled => {}
        }
    }

    /// Record the duration of an event that started at `start` and ends
    /// now.
    pub fn update_since(&self, start: Instant) {
        self.update(start.elapsed())
    }

    /// Record the wall-clock duration of `f` and return its result.
    ///
    /// Recording happens only after `f` returns; a panic inside `f`
    /// propagates and nothing is recorded.
    pub fn time<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        match self {
            ResettingTimer::Active(timer) => {
                let start = Instant::now();
                let r = f();
                timer.record(start.elapsed().as_nanos_i64());
                r
            }
            ResettingTimer::Frozen(_) => {
                panic!("time called on a resetting timer snapshot")
            }
            ResettingTimer::Disabled => f(),
        }
    }

    /// The recorded durations in nanoseconds.
    ///
    /// On an active timer this copies the live buffer under its lock, so
    /// the result is a consistent prefix of what concurrent writers have
    /// recorded.
    pub fn values(&self) -> Vec<i64> {
        match self {
            ResettingTimer::Active(timer) => timer.values.lock().unwrap().clone(),
            ResettingTimer::Frozen(snapshot) => snapshot.values(),
            ResettingTimer::Disabled => Vec::new(),
        }
    }

    /// Take the accumulated values into a read-only snapshot and reset
    /// the live buffer to empty. Idempotent on an already frozen timer.
    pub fn snapshot(&self) -> ResettingTimer {
        match self {
            ResettingTimer::Active(timer) => {
                let mut values = timer.values.lock().unwrap();
                let taken = mem::replace(&mut *values, Vec::with_capacity(INITIAL_VALUES_CAP));
                drop(values);
                ResettingTimer::Frozen(Arc::new(ResettingTimerSnapshot::new(taken)))
            }
            ResettingTimer::Frozen(snapshot) => ResettingTimer::Frozen(Arc::clone(snapshot)),
            ResettingTimer::Disabled => ResettingTimer::Disabled,
        }
    }

    /// Nearest-rank boundaries for the requested percentiles.
    ///
    /// Snapshot only. A negative percentile counts from the top.
    pub fn percentiles(&self, ps: &[f64]) -> Vec<i64> {
        match self {
            ResettingTimer::Frozen(snapshot) => snapshot.percentiles(ps),
            ResettingTimer::Active(_) => {
                panic!("percentiles called on an active resetting timer")
            }
            ResettingTimer::Disabled => {
                panic!("percentiles called on a disabled resetting timer")
            }
        }
    }

    /// Mean of the snapshotted values. Snapshot only.
    pub fn mean(&self) -> f64 {
        match self {
            ResettingTimer::Frozen(snapshot) => snapshot.mean(),
            ResettingTimer::Active(_) => {
                panic!("mean called on an active resetting timer")
            }
            ResettingTimer::Disabled => {
                panic!("mean called on a disabled resetting timer")
            }
        }
    }
}

/// Point-in-time copy of a [`ResettingTimer`].
///
/// The sort and mean are computed once, on the first statistics read, and
/// memoized; percentile boundaries are then index reads against the
/// sorted buffer.
pub struct ResettingTimerSnapshot {
    inner: Mutex<SnapshotInner>,
}

struct SnapshotInner {
    values: Vec<i64>,
    mean: f64,
    calculated: bool,
}

impl ResettingTimerSnapshot {
    fn new(values: Vec<i64>) -> Self {
        ResettingTimerSnapshot {
            inner: Mutex::new(SnapshotInner {
                values,
                mean: 0.0,
                calculated: false,
            }),
        }
    }

    /// The snapshotted values, in ascending order once any statistic has
    /// been read.
    pub fn values(&self) -> Vec<i64> {
        self.inner.lock().unwrap().values.clone()
    }

    pub fn mean(&self) -> f64 {
        let mut inner = self.inner.lock().unwrap();
        Self::calc(&mut inner);
        inner.mean
    }

    pub fn percentiles(&self, ps: &[f64]) -> Vec<i64> {
        let mut inner = self.inner.lock().unwrap();
        Self::calc(&mut inner);
        stats::threshold_boundaries(&inner.values, ps)
    }

    fn calc(inner: &mut SnapshotInner) {
        if inner.calculated {
            return;
        }
        stats::sort_values(&mut inner.values);
        inner.mean = stats::mean(&inner.values);
        inner.calculated = true;
    }
}

/// Return the resetting timer registered under `name`, or build and
/// register a new one.
///
/// Panics if `name` is bound to a metric of a different kind.
pub fn get_or_register_resetting_timer(
    name: &str,
    registry: &dyn MetricRegistry,
    config: &MetricsConfig,
) -> ResettingTimer {
    let metric =
        registry.get_or_register(name, &|| Metric::ResettingTimer(ResettingTimer::new(config)));
    match metric {
        Metric::ResettingTimer(t) => t,
        other => panic!("metric {name} is already registered as a {}", other.kind()),
    }
}

/// Build a new resetting timer and register it under `name`.
pub fn new_registered_resetting_timer(
    name: &str,
    registry: &dyn MetricRegistry,
    config: &MetricsConfig,
) -> Result<ResettingTimer, RegistryError> {
    let timer = ResettingTimer::new(config);
    registry.register(name, Metric::ResettingTimer(timer.clone()))?;
    Ok(timer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::StaticRegistry;
    use std::panic::{AssertUnwindSafe, catch_unwind};
    use std::thread;

    fn active_timer() -> ResettingTimer {
        ResettingTimer::new(&MetricsConfig::enabled())
    }

    fn record_nanos(t: &ResettingTimer, nanos: &[u64]) {
        for &n in nanos {
            t.update(Duration::from_nanos(n));
        }
    }

    #[test]
    fn update_and_values() {
        let t = active_timer();
        record_nanos(&t, &[10, 20, 30]);
        assert_eq!(t.values(), vec![10, 20, 30]);
    }

    #[test]
    fn snapshot_drains() {
        let t = active_timer();
        record_nanos(&t, &[10, 20, 30]);
        let s = t.snapshot();
        assert!(t.values().is_empty());
        assert_eq!(s.values(), vec![10, 20, 30]);

        let empty = t.snapshot();
        assert!(empty.values().is_empty());
        assert_eq!(empty.mean(), 0.0);
        assert_eq!(empty.percentiles(&[50.0, 90.0]), vec![0, 0]);
    }

    #[test]
    fn snapshot_idempotent() {
        let t = active_timer();
        record_nanos(&t, &[30, 10, 20]);
        let s1 = t.snapshot();
        let s2 = s1.snapshot();
        assert_eq!(s1.values(), s2.values());
        assert_eq!(s1.mean(), s2.mean());
    }

    #[test]
    fn mean_and_percentiles() {
        let t = active_timer();
        record_nanos(&t, &[50, 10, 40, 20, 30]);
        let s = t.snapshot();
        assert_eq!(s.mean(), 30.0);
        assert_eq!(s.percentiles(&[50.0]), vec![30]);
        assert_eq!(s.percentiles(&[-10.0]), vec![50]);
        // the buffer is sorted in place by the first statistics read
        assert_eq!(s.values(), vec![10, 20, 30, 40, 50]);
    }

    #[test]
    fn single_value() {
        let t = active_timer();
        record_nanos(&t, &[42]);
        let s = t.snapshot();
        assert_eq!(s.percentiles(&[0.0, 50.0, 99.9, -10.0]), vec![42, 42, 42, 42]);
        assert_eq!(s.mean(), 42.0);
    }

    #[test]
    fn update_since_records() {
        let t = active_timer();
        t.update_since(Instant::now());
        let values = t.values();
        assert_eq!(values.len(), 1);
        assert!(values[0] >= 0);
    }

    #[test]
    fn time_records_and_returns() {
        let t = active_timer();
        let r = t.time(|| 7);
        assert_eq!(r, 7);
        assert_eq!(t.values().len(), 1);
    }

    #[test]
    fn time_panic_records_nothing() {
        let t = active_timer();
        let r = catch_unwind(AssertUnwindSafe(|| {
            t.time(|| panic!("inner failure"));
        }));
        assert!(r.is_err());
        assert!(t.values().is_empty());
    }

    #[test]
    fn disabled_is_noop() {
        let t = ResettingTimer::new(&MetricsConfig::disabled());
        t.update(Duration::from_nanos(1));
        t.update_since(Instant::now());
        assert_eq!(t.time(|| 5), 5);
        assert!(t.values().is_empty());
        assert!(matches!(t.snapshot(), ResettingTimer::Disabled));
    }

    #[test]
    #[should_panic(expected = "update called on a resetting timer snapshot")]
    fn frozen_update_panics() {
        let t = active_timer();
        t.snapshot().update(Duration::from_nanos(1));
    }

    #[test]
    #[should_panic(expected = "time called on a resetting timer snapshot")]
    fn frozen_time_panics() {
        let t = active_timer();
        t.snapshot().time(|| ());
    }

    #[test]
    #[should_panic(expected = "percentiles called on an active resetting timer")]
    fn active_percentiles_panics() {
        active_timer().percentiles(&[50.0]);
    }

    #[test]
    #[should_panic(expected = "mean called on an active resetting timer")]
    fn active_mean_panics() {
        active_timer().mean();
    }

    #[test]
    #[should_panic(expected = "mean called on a disabled resetting timer")]
    fn disabled_mean_panics() {
        ResettingTimer::new(&MetricsConfig::disabled()).mean();
    }

    #[test]
    #[should_panic(expected = "percentiles called on a disabled resetting timer")]
    fn disabled_percentiles_panics() {
        ResettingTimer::new(&MetricsConfig::disabled()).percentiles(&[50.0]);
    }

    #[test]
    fn concurrent_updates() {
        let t = active_timer();
        let mut handles = Vec::new();
        for _ in 0..4 {
            let t = t.clone();
            handles.push(thread::spawn(move || {
                for _ in 0..250 {
                    t.update(Duration::from_nanos(1));
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(t.values().len(), 1000);
    }

    #[test]
    fn concurrent_snapshots_lose_nothing() {
        let t = active_timer();
        let mut handles = Vec::new();
        for _ in 0..4 {
            let t = t.clone();
            handles.push(thread::spawn(move || {
                for _ in 0..500 {
                    t.update(Duration::from_nanos(1));
                }
            }));
        }

        let mut seen = 0usize;
        while handles.iter().any(|h| !h.is_finished()) {
            seen += t.snapshot().values().len();
        }
        for h in handles {
            h.join().unwrap();
        }
        seen += t.snapshot().values().len();
        assert_eq!(seen, 2000);
    }

    #[test]
    fn registry_helpers() {
        let registry = StaticRegistry::new();
        let config = MetricsConfig::enabled();
        let t1 = get_or_register_resetting_timer("req_time", &registry, &config);
        let t2 = get_or_register_resetting_timer("req_time", &registry, &config);
        t1.update(Duration::from_nanos(3));
        assert_eq!(t2.values(), vec![3]);

        assert!(matches!(
            new_registered_resetting_timer("req_time", &registry, &config),
            Err(RegistryError::AlreadyRegistered(_))
        ));
    }
}
