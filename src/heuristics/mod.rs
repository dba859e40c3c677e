//! The five elbow estimators.
//!
//! Every estimator reads the same curves and returns a `Vote`: one k plus the
//! per-k score series it optimized (kept so a renderer can redraw the
//! diagnostic plot without recomputing anything).
//!
//! - Method 1 (`gap`): normalized percent delta minus normalized `1/k`
//! - Method 2 (`last_drop`): k before the last top-quartile percent delta
//! - Method 3 (`acceleration`): max second delta
//! - Methods 4 and 5 (`shape`): local triangle height and local angle

pub mod acceleration;
pub mod gap;
pub mod last_drop;
pub mod shape;

use tracing::{debug, warn};

use crate::domain::{
    Curve, CurvePoint, DistortionCurve, Method, Normalization, PercentDeltaCurve,
    SecondDeltaCurve, Vote,
};
use crate::error::KFinderError;

/// Curves shared by all estimators.
#[derive(Debug, Clone, Copy)]
pub struct HeuristicInput<'a> {
    pub distortion: &'a DistortionCurve,
    pub percent_deltas: &'a PercentDeltaCurve,
    pub second_deltas: &'a SecondDeltaCurve,
    pub normalization: Normalization,
}

/// Run one estimator.
pub fn estimate(method: Method, input: &HeuristicInput<'_>) -> Result<Vote, KFinderError> {
    ensure_points(method, input.distortion.len())?;

    let vote = match method {
        Method::GapVsComplexity => gap::estimate(input),
        Method::LastSignificantDrop => last_drop::estimate(input),
        Method::MaxSecondDelta => acceleration::estimate(input),
        Method::TriangleHeight => shape::estimate_height(input),
        Method::MinAngle => shape::estimate_angle(input),
    };

    if vote.fallback {
        warn!(
            method = %method,
            k = vote.k,
            "curve has no distinguishing feature; using the midpoint of the range"
        );
    } else {
        debug!(method = %method, k = vote.k, "heuristic vote");
    }
    Ok(vote)
}

/// Run all five estimators in `Method::ALL` order.
pub fn estimate_all(input: &HeuristicInput<'_>) -> Result<[Vote; 5], KFinderError> {
    let [m1, m2, m3, m4, m5] = Method::ALL.map(|m| estimate(m, input));
    Ok([m1?, m2?, m3?, m4?, m5?])
}

/// Fail with `InsufficientRange` when the curve is too short for `method`.
pub fn ensure_points(method: Method, points: usize) -> Result<(), KFinderError> {
    let required = method.min_points();
    if points < required {
        return Err(KFinderError::InsufficientRange {
            method,
            points,
            required,
        });
    }
    Ok(())
}

/// First point with the largest value (smallest k wins ties).
pub(crate) fn argmax(scores: &[CurvePoint]) -> Option<CurvePoint> {
    scores
        .iter()
        .copied()
        .reduce(|best, p| if p.value > best.value { p } else { best })
}

/// First point with the smallest value (smallest k wins ties).
pub(crate) fn argmin(scores: &[CurvePoint]) -> Option<CurvePoint> {
    scores
        .iter()
        .copied()
        .reduce(|best, p| if p.value < best.value { p } else { best })
}

/// Fallback pick for curves without a distinguishing feature.
pub fn midpoint(kmin: usize, kmax: usize) -> usize {
    kmin + (kmax - kmin) / 2
}

impl HeuristicInput<'_> {
    /// Vote for the midpoint of the k range, flagged as a fallback.
    pub(crate) fn fallback_vote(&self, method: Method, scores: Vec<CurvePoint>) -> Vote {
        Vote {
            method,
            k: midpoint(self.distortion.kmin(), self.distortion.kmax()),
            scores,
            fallback: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{percent_deltas, second_deltas};

    fn votes_for(distances: Vec<f64>) -> [Vote; 5] {
        let curve = DistortionCurve::from_values(1, distances).unwrap();
        let pd = percent_deltas(&curve);
        let sd = second_deltas(&pd);
        let input = HeuristicInput {
            distortion: &curve,
            percent_deltas: &pd,
            second_deltas: &sd,
            normalization: Normalization::MinMax,
        };
        estimate_all(&input).unwrap()
    }

    #[test]
    fn sharp_elbow_is_found_by_most_methods() {
        // Big drops until k = 4, then a slow tail.
        let votes = votes_for(vec![
            1000.0, 500.0, 260.0, 10.0, 8.8, 7.7, 6.6, 5.9, 5.2, 4.9,
        ]);
        let ks: Vec<usize> = votes.iter().map(|v| v.k).collect();
        assert_eq!(ks[0], 4, "method 1");
        assert_eq!(ks[2], 4, "method 3");
        assert_eq!(ks[3], 4, "method 4");
        assert_eq!(ks[4], 4, "method 5");
        assert!(votes.iter().all(|v| !v.fallback));
    }

    #[test]
    fn votes_come_back_in_method_order() {
        let votes = votes_for(vec![100.0, 40.0, 20.0, 15.0, 12.0]);
        for (vote, method) in votes.iter().zip(Method::ALL) {
            assert_eq!(vote.method, method);
            assert!((1..=5).contains(&vote.k));
        }
    }

    #[test]
    fn two_points_only_support_method_2() {
        let curve = DistortionCurve::from_values(4, vec![10.0, 6.0]).unwrap();
        let pd = percent_deltas(&curve);
        let sd = second_deltas(&pd);
        let input = HeuristicInput {
            distortion: &curve,
            percent_deltas: &pd,
            second_deltas: &sd,
            normalization: Normalization::MinMax,
        };

        let vote = estimate(Method::LastSignificantDrop, &input).unwrap();
        assert_eq!(vote.k, 4);

        for method in [
            Method::GapVsComplexity,
            Method::MaxSecondDelta,
            Method::TriangleHeight,
            Method::MinAngle,
        ] {
            let err = estimate(method, &input).unwrap_err();
            assert!(matches!(
                err,
                KFinderError::InsufficientRange {
                    points: 2,
                    required: 3,
                    ..
                }
            ));
        }
        assert!(estimate_all(&input).is_err());
    }

    #[test]
    fn single_point_is_too_short_even_for_method_2() {
        let err = ensure_points(Method::LastSignificantDrop, 1).unwrap_err();
        assert!(matches!(err, KFinderError::InsufficientRange { required: 2, .. }));
    }

    #[test]
    fn argmax_and_argmin_prefer_smallest_k_on_ties() {
        let scores = vec![
            CurvePoint::new(2, 1.0),
            CurvePoint::new(3, 5.0),
            CurvePoint::new(4, 5.0),
            CurvePoint::new(5, 1.0),
        ];
        assert_eq!(argmax(&scores).map(|p| p.k), Some(3));
        assert_eq!(argmin(&scores).map(|p| p.k), Some(2));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn midpoint_rounds_down() {
        assert_eq!(midpoint(1, 10), 5);
        assert_eq!(midpoint(2, 8), 5);
        assert_eq!(midpoint(3, 3), 3);
    }
}
