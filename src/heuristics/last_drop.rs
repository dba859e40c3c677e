//! Method 2: the k just before the last significant drop.
//!
//! A percent delta is significant when it reaches the 75th percentile of all
//! percent deltas. The vote is the cluster count immediately preceding the last
//! significant improvement.

use crate::domain::{Curve, Method, Vote};
use crate::heuristics::{HeuristicInput, argmax};
use crate::math::percentile;

/// Quantile of the percent deltas a drop must reach to count as significant.
pub const SIGNIFICANT_QUANTILE: f64 = 0.75;

pub fn estimate(input: &HeuristicInput<'_>) -> Vote {
    let pd = input.percent_deltas;
    let scores = pd.points().to_vec();

    let last_significant = percentile(&pd.values(), SIGNIFICANT_QUANTILE)
        .and_then(|threshold| scores.iter().rev().find(|p| p.value >= threshold).copied())
        // Interpolation rounding can nudge the threshold above the maximum.
        .or_else(|| argmax(&scores));

    match last_significant {
        Some(p) => Vote {
            method: Method::LastSignificantDrop,
            k: p.k - 1,
            scores,
            fallback: false,
        },
        None => input.fallback_vote(Method::LastSignificantDrop, scores),
    }
}
