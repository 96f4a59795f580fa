/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use log::debug;

/// Ascending in-place sort shared by every snapshot type.
pub(crate) fn sort_values(values: &mut [i64]) {
    values.sort_unstable();
}

pub(crate) fn sum(values: &[i64]) -> i64 {
    values.iter().sum()
}

pub(crate) fn mean(values: &[i64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    sum(values) as f64 / values.len() as f64
}

pub(crate) fn min(values: &[i64]) -> i64 {
    values.iter().min().copied().unwrap_or(0)
}

pub(crate) fn max(values: &[i64]) -> i64 {
    values.iter().max().copied().unwrap_or(0)
}

/// Population variance.
pub(crate) fn variance(values: &[i64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let sq_sum = values
        .iter()
        .map(|&v| {
            let d = v as f64 - m;
            d * d
        })
        .sum::<f64>();
    sq_sum / values.len() as f64
}

pub(crate) fn std_dev(values: &[i64]) -> f64 {
    variance(values).sqrt()
}

/// Nearest-rank index for percentile `p` over `count` sorted values.
///
/// A negative `p` counts from the top: `-10.0` is the 90th percentile
/// boundary without the zero-based index shift. Ranks falling outside
/// `0..count` are clamped to the nearest valid index.
pub(crate) fn nearest_rank_index(p: f64, count: usize) -> usize {
    let abs = if p >= 0.0 { p } else { 100.0 + p };
    // round half up
    let mut rank = ((abs / 100.0) * count as f64 + 0.5).floor() as isize;
    if p >= 0.0 {
        // convert to a zero-based index; top-relative ranks are not shifted
        rank -= 1;
    }
    let last = count as isize - 1;
    if rank < 0 || rank > last {
        debug!("percentile {p} has rank {rank} outside of 0..{count}, clamping");
        rank = rank.clamp(0, last);
    }
    rank as usize
}

/// Boundary values for the requested percentiles of an ascending buffer.
pub(crate) fn threshold_boundaries(sorted: &[i64], percentiles: &[f64]) -> Vec<i64> {
    let count = sorted.len();
    if count == 0 {
        return vec![0; percentiles.len()];
    }
    let max = sorted[count - 1];
    percentiles
        .iter()
        .map(|&p| {
            if count > 1 {
                sorted[nearest_rank_index(p, count)]
            } else {
                max
            }
        })
        .collect()
}

pub(crate) fn percentile_of_sorted(sorted: &[i64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    if sorted.len() == 1 {
        return sorted[0] as f64;
    }
    sorted[nearest_rank_index(p, sorted.len())] as f64
}

pub(crate) fn percentiles_of_sorted(sorted: &[i64], ps: &[f64]) -> Vec<f64> {
    threshold_boundaries(sorted, ps)
        .into_iter()
        .map(|v| v as f64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_mid() {
        let sorted = [10, 20, 30, 40, 50];
        // rank = floor(0.5 * 5 + 0.5) = 3, index 2
        assert_eq!(threshold_boundaries(&sorted, &[50.0]), vec![30]);
    }

    #[test]
    fn rank_extremes() {
        let sorted = [10, 20, 30, 40, 50];
        assert_eq!(threshold_boundaries(&sorted, &[0.0]), vec![10]);
        assert_eq!(threshold_boundaries(&sorted, &[100.0]), vec![50]);
    }

    #[test]
    fn rank_top_relative() {
        let sorted = [10, 20, 30, 40, 50];
        // abs = 90, rank 5 is past the last index and clamps to it
        assert_eq!(threshold_boundaries(&sorted, &[-10.0]), vec![50]);
        assert_eq!(threshold_boundaries(&sorted, &[-50.0]), vec![40]);
    }

    #[test]
    fn rank_out_of_range_input() {
        let sorted = [10, 20, 30, 40, 50];
        assert_eq!(threshold_boundaries(&sorted, &[130.0]), vec![50]);
        assert_eq!(threshold_boundaries(&sorted, &[-130.0]), vec![10]);
    }

    #[test]
    fn single_value() {
        let sorted = [42];
        assert_eq!(
            threshold_boundaries(&sorted, &[0.0, 50.0, 99.0, -10.0]),
            vec![42, 42, 42, 42]
        );
    }

    #[test]
    fn empty() {
        assert_eq!(threshold_boundaries(&[], &[50.0, 90.0]), vec![0, 0]);
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(variance(&[]), 0.0);
        assert_eq!(min(&[]), 0);
        assert_eq!(max(&[]), 0);
        assert_eq!(percentile_of_sorted(&[], 95.0), 0.0);
    }

    #[test]
    fn summary() {
        let values = [10, 20, 30, 40, 50];
        assert_eq!(sum(&values), 150);
        assert_eq!(mean(&values), 30.0);
        assert_eq!(min(&values), 10);
        assert_eq!(max(&values), 50);
        assert_eq!(variance(&values), 200.0);
        assert!((std_dev(&values) - 200.0_f64.sqrt()).abs() < f64::EPSILON);
    }
}
