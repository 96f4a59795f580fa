/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

/// Collection switch consulted once at metric construction time.
///
/// Constructors handed a disabled config return the no-op variant of the
/// requested metric, so call sites record unconditionally while a
/// disabled process accumulates nothing. The flag is not re-read after
/// construction: an instance keeps the mode it was built with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MetricsConfig {
    enabled: bool,
}

impl MetricsConfig {
    pub fn enabled() -> Self {
        MetricsConfig { enabled: true }
    }

    pub fn disabled() -> Self {
        MetricsConfig { enabled: false }
    }

    #[inline]
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        MetricsConfig::disabled()
    }
}
