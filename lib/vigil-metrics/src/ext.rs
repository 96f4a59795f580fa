/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::time::Duration;

pub trait DurationExt {
    fn as_nanos_i64(&self) -> i64;
}

impl DurationExt for Duration {
    fn as_nanos_i64(&self) -> i64 {
        i64::try_from(self.as_nanos()).unwrap_or(i64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nanos() {
        assert_eq!(Duration::from_nanos(25).as_nanos_i64(), 25);
        assert_eq!(Duration::from_micros(3).as_nanos_i64(), 3_000);
    }

    #[test]
    fn saturating() {
        assert_eq!(Duration::MAX.as_nanos_i64(), i64::MAX);
    }
}
