//! Series normalization and order statistics.
//!
//! Normalization puts series with unrelated units (a percentage and a
//! reciprocal integer, say) on a comparable scale before they are subtracted.
//! A constant series carries no information and maps to all zeros under both
//! schemes.

use crate::domain::Normalization;

/// Spread below which a series is treated as constant.
const FLAT_EPS: f64 = 1e-12;

/// Rescale to `[0, 1]`.
pub fn min_max(values: &[f64]) -> Vec<f64> {
    let (lo, hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = hi - lo;
    if !(range > FLAT_EPS) {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v - lo) / range).collect()
}

/// Center on the mean and divide by the population standard deviation.
pub fn z_score(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let std = (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt();
    if !(std > FLAT_EPS) {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v - mean) / std).collect()
}

pub fn normalize(values: &[f64], method: Normalization) -> Vec<f64> {
    match method {
        Normalization::MinMax => min_max(values),
        Normalization::ZScore => z_score(values),
    }
}

/// `q`-quantile (`q` in `[0, 1]`) with linear interpolation between order
/// statistics. Returns `None` for an empty input.
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}
