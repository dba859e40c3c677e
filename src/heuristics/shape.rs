//! Methods 4 and 5: local shape of the distortion curve.
//!
//! Both look at each interior k together with its two neighbours. The curve is
//! first mapped to unit-free coordinates `(k / kmax, d / max d)`; without this,
//! distortions in the thousands would swamp unit steps in k and every local
//! triangle would look like a vertical sliver. Heights and angles are
//! therefore measured on the scaled points, not on raw `(k, d[k])` vertices.
//!
//! A perfectly straight curve has zero height and a 180 degree angle
//! everywhere. Neither method can pick anything then, so both vote for the
//! midpoint of the k range and mark the vote as a fallback.

use nalgebra::Vector2;

use crate::domain::{Curve, CurvePoint, DistortionCurve, Method, Vote};
use crate::heuristics::{HeuristicInput, argmax, argmin};
use crate::math::{angle_deg, triangle_height};

/// Largest scaled height still considered "no bend".
pub const FLAT_HEIGHT_EPS: f64 = 1e-9;

/// Smallest deviation from 180 degrees considered a bend.
pub const FLAT_ANGLE_EPS_DEG: f64 = 1e-3;

/// Method 4: argmax of the perpendicular distance from `(k, d[k])` to the
/// chord joining its neighbours.
pub fn estimate_height(input: &HeuristicInput<'_>) -> Vote {
    let scores = local_scores(input.distortion, triangle_height);
    match argmax(&scores) {
        Some(best) if best.value > FLAT_HEIGHT_EPS => Vote {
            method: Method::TriangleHeight,
            k: best.k,
            scores,
            fallback: false,
        },
        _ => input.fallback_vote(Method::TriangleHeight, scores),
    }
}

/// Method 5: argmin of the angle at `(k, d[k])` between the segments to its
/// neighbours (the sharpest bend).
pub fn estimate_angle(input: &HeuristicInput<'_>) -> Vote {
    let scores = local_scores(input.distortion, angle_deg);
    match argmin(&scores) {
        Some(best) if best.value < 180.0 - FLAT_ANGLE_EPS_DEG => Vote {
            method: Method::MinAngle,
            k: best.k,
            scores,
            fallback: false,
        },
        _ => input.fallback_vote(Method::MinAngle, scores),
    }
}

/// Curve points in unit-free coordinates.
pub fn scaled_points(curve: &DistortionCurve) -> Vec<Vector2<f64>> {
    let kmax = curve.kmax() as f64;
    let max_d = curve.max_distance();
    curve
        .points()
        .iter()
        .map(|p| {
            let y = if max_d > 0.0 { p.value / max_d } else { 0.0 };
            Vector2::new(p.k as f64 / kmax, y)
        })
        .collect()
}

fn local_scores(
    curve: &DistortionCurve,
    score: impl Fn(Vector2<f64>, Vector2<f64>, Vector2<f64>) -> f64,
) -> Vec<CurvePoint> {
    let scaled = scaled_points(curve);
    curve
        .points()
        .windows(3)
        .zip(scaled.windows(3))
        .map(|(raw, xy)| CurvePoint::new(raw[1].k, score(xy[0], xy[1], xy[2])))
        .collect()
}
