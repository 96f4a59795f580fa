/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

mod config;
pub use config::MetricsConfig;

mod ext;
pub use ext::DurationExt;

mod stats;

mod sample;
pub use sample::{Sample, SampleSnapshot};

mod uniform;
pub use uniform::UniformSample;

mod histogram;
pub use histogram::{Histogram, get_or_register_histogram, new_registered_histogram};

mod resetting_timer;
pub use resetting_timer::{
    ActiveResettingTimer, ResettingTimer, ResettingTimerSnapshot,
    get_or_register_resetting_timer, new_registered_resetting_timer,
};

mod registry;
pub use registry::{Metric, MetricRegistry, RegistryError, StaticRegistry};
