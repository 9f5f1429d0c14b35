use std::ops::Range;

use argminmax::ArgMinMax;
use statrs::statistics::Statistics;

pub fn get_max(vec: &[f64]) -> f64 {
    let max_index: usize = vec.argmax();
    vec[max_index]
}

pub fn get_min(vec: &[f64]) -> f64 {
    let min_index: usize = vec.argmin();
    vec[min_index]
}

/// Index range of the trailing window of (up to) `window` bars ending at `idx` inclusive.
#[inline]
pub fn trailing_window(idx: usize, window: usize) -> Range<usize> {
    (idx + 1).saturating_sub(window)..idx + 1
}

/// Rolling maximum with a partial window at the start (every bar gets a value).
pub fn rolling_max(values: &[f64], window: usize) -> Vec<f64> {
    (0..values.len())
        .map(|i| get_max(&values[trailing_window(i, window)]))
        .collect()
}

/// Rolling minimum with a partial window at the start (every bar gets a value).
pub fn rolling_min(values: &[f64], window: usize) -> Vec<f64> {
    (0..values.len())
        .map(|i| get_min(&values[trailing_window(i, window)]))
        .collect()
}

/// Rolling mean that stays undefined until a full window is available.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            if i + 1 < window {
                None
            } else {
                Some(values[trailing_window(i, window)].iter().mean())
            }
        })
        .collect()
}

/// Inclusive overlap test between two price intervals. Bounds may arrive in either order.
pub fn ranges_overlap(a: (f64, f64), b: (f64, f64)) -> bool {
    let (a_low, a_high) = if a.0 <= a.1 { a } else { (a.1, a.0) };
    let (b_low, b_high) = if b.0 <= b.1 { b } else { (b.1, b.0) };
    a_low <= b_high && b_low <= a_high
}
