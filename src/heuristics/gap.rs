//! Method 1: max gap between the improvement rate and inverted complexity.
//!
//! Percent deltas are percentages while complexity `1/k` is a reciprocal
//! integer, so both are normalized (min-max by default) before the gap
//! `norm_pd[k] - norm_complexity[k]` is taken over `k > kmin`.

use crate::domain::{Curve, CurvePoint, Method, Vote};
use crate::heuristics::{HeuristicInput, argmax};
use crate::math::normalize;

pub fn estimate(input: &HeuristicInput<'_>) -> Vote {
    let pd = input.percent_deltas;
    let ks = pd.ks();
    let complexity: Vec<f64> = ks.iter().map(|&k| 1.0 / k as f64).collect();

    let norm_pd = normalize(&pd.values(), input.normalization);
    let norm_complexity = normalize(&complexity, input.normalization);

    let scores: Vec<CurvePoint> = ks
        .iter()
        .zip(norm_pd.iter().zip(&norm_complexity))
        .map(|(&k, (p, c))| CurvePoint::new(k, p - c))
        .collect();

    match argmax(&scores) {
        Some(best) => Vote {
            method: Method::GapVsComplexity,
            k: best.k,
            scores,
            fallback: false,
        },
        None => input.fallback_vote(Method::GapVsComplexity, scores),
    }
}
