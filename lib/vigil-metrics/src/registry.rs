/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::collections::HashMap;
use std::sync::Mutex;

use foldhash::fast::FixedState;
use thiserror::Error;

use crate::histogram::Histogram;
use crate::resetting_timer::ResettingTimer;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("metric {0} is already registered")]
    AlreadyRegistered(String),
}

/// A named metric instance of any kind.
#[derive(Clone)]
pub enum Metric {
    Histogram(Histogram),
    ResettingTimer(ResettingTimer),
}

impl Metric {
    pub fn kind(&self) -> &'static str {
        match self {
            Metric::Histogram(_) => "histogram",
            Metric::ResettingTimer(_) => "resetting timer",
        }
    }
}

/// Name-to-instance mapping with get-or-create semantics.
pub trait MetricRegistry {
    /// Return the metric registered under `name`, or store and return
    /// the one built by `build`.
    fn get_or_register(&self, name: &str, build: &dyn Fn() -> Metric) -> Metric;

    /// Store `metric` under `name`, failing if the name is taken.
    fn register(&self, name: &str, metric: Metric) -> Result<(), RegistryError>;

    fn get(&self, name: &str) -> Option<Metric>;
}

/// In-process [`MetricRegistry`] backed by a locked hash map.
///
/// Const-constructible, so it can live in a `static`:
///
/// ```
/// use vigil_metrics::StaticRegistry;
///
/// static REGISTRY: StaticRegistry = StaticRegistry::new();
/// ```
pub struct StaticRegistry {
    inner: Mutex<HashMap<String, Metric, FixedState>>,
}

impl StaticRegistry {
    pub const fn new() -> Self {
        StaticRegistry {
            inner: Mutex::new(HashMap::with_hasher(FixedState::with_seed(0))),
        }
    }

    pub fn foreach<F>(&self, mut f: F)
    where
        F: FnMut(&str, &Metric),
    {
        let ht = self.inner.lock().unwrap();
        for (name, metric) in ht.iter() {
            f(name, metric)
        }
    }
}

impl Default for StaticRegistry {
    fn default() -> Self {
        StaticRegistry::new()
    }
}

impl MetricRegistry for StaticRegistry {
    fn get_or_register(&self, name: &str, build: &dyn Fn() -> Metric) -> Metric {
        let mut ht = self.inner.lock().unwrap();
        ht.entry(name.to_string()).or_insert_with(build).clone()
    }

    fn register(&self, name: &str, metric: Metric) -> Result<(), RegistryError> {
        let mut ht = self.inner.lock().unwrap();
        if ht.contains_key(name) {
            return Err(RegistryError::AlreadyRegistered(name.to_string()));
        }
        ht.insert(name.to_string(), metric);
        Ok(())
    }

    fn get(&self, name: &str) -> Option<Metric> {
        let ht = self.inner.lock().unwrap();
        ht.get(name).cloned()
    }
}
