//! First- and second-order change curves.
//!
//! - `percent_deltas`: percentage decrease of distortion from `k - 1` to `k`
//! - `second_deltas`: change of the percent decrease from `k - 1` to `k`

use crate::domain::{Curve, CurvePoint, DistortionCurve, PercentDeltaCurve, SecondDeltaCurve};

/// `pd[k] = (d[k-1] - d[k]) / d[k-1] * 100`, defined as 0 when `d[k-1] = 0`.
pub fn percent_deltas(curve: &DistortionCurve) -> PercentDeltaCurve {
    let points = curve
        .points()
        .windows(2)
        .map(|w| {
            let (prev, cur) = (w[0], w[1]);
            let pct = if prev.value == 0.0 {
                0.0
            } else {
                (prev.value - cur.value) / prev.value * 100.0
            };
            CurvePoint::new(cur.k, pct)
        })
        .collect();
    PercentDeltaCurve::new(points)
}

/// `sd[k] = pd[k] - pd[k-1]`.
pub fn second_deltas(percent_deltas: &PercentDeltaCurve) -> SecondDeltaCurve {
    let points = percent_deltas
        .points()
        .windows(2)
        .map(|w| CurvePoint::new(w[1].k, w[1].value - w[0].value))
        .collect();
    SecondDeltaCurve::new(points)
}
