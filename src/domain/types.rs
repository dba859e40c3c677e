//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed stage to stage during a run (each stage builds a new value)
//! - exported to JSON for external plotting
//! - reloaded later for reporting

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::KFinderError;

/// Default seed threaded into every oracle call when none is configured.
pub const DEFAULT_SEED: u64 = 13;

/// Default upper bound of the k search range.
pub const DEFAULT_KMAX: usize = 30;

/// One `(k, value)` sample on a curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub k: usize,
    pub value: f64,
}

impl CurvePoint {
    pub fn new(k: usize, value: f64) -> Self {
        Self { k, value }
    }
}

/// Read access shared by all curves indexed by k.
pub trait Curve {
    fn points(&self) -> &[CurvePoint];

    fn len(&self) -> usize {
        self.points().len()
    }

    fn is_empty(&self) -> bool {
        self.points().is_empty()
    }

    fn ks(&self) -> Vec<usize> {
        self.points().iter().map(|p| p.k).collect()
    }

    fn values(&self) -> Vec<f64> {
        self.points().iter().map(|p| p.value).collect()
    }

    /// Value at `k`, if `k` is on the curve.
    fn get(&self, k: usize) -> Option<f64> {
        let first = self.points().first()?.k;
        let idx = k.checked_sub(first)?;
        self.points().get(idx).map(|p| p.value)
    }
}

/// Distortion as a function of k over a contiguous `[kmin, kmax]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistortionCurve {
    points: Vec<CurvePoint>,
}

impl DistortionCurve {
    /// Build a curve from distortions measured at `kmin, kmin + 1, ...`.
    ///
    /// Distances must be finite and non-negative; monotonicity is not checked.
    pub fn from_values(kmin: usize, distances: Vec<f64>) -> Result<Self, KFinderError> {
        if kmin < 1 || distances.is_empty() {
            return Err(KFinderError::InvalidRange {
                kmin,
                kmax: (kmin + distances.len()).saturating_sub(1),
            });
        }
        if let Some((i, d)) = distances
            .iter()
            .enumerate()
            .find(|(_, d)| !(d.is_finite() && **d >= 0.0))
        {
            return Err(KFinderError::oracle(
                kmin + i,
                format!("distortion must be finite and non-negative, got {d}"),
            ));
        }

        let points = distances
            .into_iter()
            .enumerate()
            .map(|(i, d)| CurvePoint::new(kmin + i, d))
            .collect();
        Ok(Self { points })
    }

    pub fn kmin(&self) -> usize {
        self.points[0].k
    }

    pub fn kmax(&self) -> usize {
        self.points[self.points.len() - 1].k
    }

    /// Largest distortion on the curve (used to scale the geometric heuristics).
    pub fn max_distance(&self) -> f64 {
        self.points.iter().fold(0.0, |acc, p| acc.max(p.value))
    }
}

impl Curve for DistortionCurve {
    fn points(&self) -> &[CurvePoint] {
        &self.points
    }
}

/// Percentage decrease of distortion from `k - 1` to `k`, over `(kmin, kmax]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentDeltaCurve {
    points: Vec<CurvePoint>,
}

impl PercentDeltaCurve {
    pub(crate) fn new(points: Vec<CurvePoint>) -> Self {
        Self { points }
    }
}

impl Curve for PercentDeltaCurve {
    fn points(&self) -> &[CurvePoint] {
        &self.points
    }
}

/// Difference of consecutive percent deltas, over `(kmin + 1, kmax]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondDeltaCurve {
    points: Vec<CurvePoint>,
}

impl SecondDeltaCurve {
    pub(crate) fn new(points: Vec<CurvePoint>) -> Self {
        Self { points }
    }
}

impl Curve for SecondDeltaCurve {
    fn points(&self) -> &[CurvePoint] {
        &self.points
    }
}

/// The five elbow estimators.
///
/// This is a closed set: every run evaluates all five, in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Max gap between normalized percent delta and normalized `1/k`.
    GapVsComplexity,
    /// k just before the last drop in the top quartile of percent deltas.
    LastSignificantDrop,
    /// Sharpest change of the improvement rate.
    MaxSecondDelta,
    /// Max height of the triangle formed with both neighbours.
    TriangleHeight,
    /// Smallest angle between the segments to both neighbours.
    MinAngle,
}

impl Method {
    pub const ALL: [Method; 5] = [
        Method::GapVsComplexity,
        Method::LastSignificantDrop,
        Method::MaxSecondDelta,
        Method::TriangleHeight,
        Method::MinAngle,
    ];

    /// 1-based method number, as shown in reports.
    pub fn number(self) -> usize {
        match self {
            Method::GapVsComplexity => 1,
            Method::LastSignificantDrop => 2,
            Method::MaxSecondDelta => 3,
            Method::TriangleHeight => 4,
            Method::MinAngle => 5,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Method::GapVsComplexity => "gap vs complexity",
            Method::LastSignificantDrop => "last significant drop",
            Method::MaxSecondDelta => "max second delta",
            Method::TriangleHeight => "triangle height",
            Method::MinAngle => "min angle",
        }
    }

    /// Minimum number of distortion curve points the method can work with.
    pub fn min_points(self) -> usize {
        match self {
            Method::LastSignificantDrop => 2,
            _ => 3,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "method {} ({})", self.number(), self.display_name())
    }
}

/// How Method 1 puts percent deltas and `1/k` on a common scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum Normalization {
    /// Rescale each series to `[0, 1]`.
    #[default]
    MinMax,
    /// Center each series and divide by its standard deviation.
    ZScore,
}

/// One heuristic's pick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    pub method: Method,
    pub k: usize,
    /// Per-k score series the method optimized, for plotting.
    pub scores: Vec<CurvePoint>,
    /// True when the curve gave the method nothing to distinguish and the
    /// midpoint of the range was used instead.
    pub fallback: bool,
}

/// Record of how a tie among modes was broken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TieBreak {
    /// Every k that shared the top vote count, ascending.
    pub tied: Vec<usize>,
    pub count: usize,
}

/// Final answer plus every individual vote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VotingResult {
    pub final_k: usize,
    pub votes: [Vote; 5],
    pub tie_break: Option<TieBreak>,
}

impl VotingResult {
    pub fn vote(&self, method: Method) -> &Vote {
        &self.votes[method.number() - 1]
    }

    /// Number of methods that agree with the final k.
    pub fn support(&self) -> usize {
        self.votes.iter().filter(|v| v.k == self.final_k).count()
    }
}

/// Everything computed in one run: the curves and the vote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub distortion: DistortionCurve,
    pub percent_deltas: PercentDeltaCurve,
    pub second_deltas: SecondDeltaCurve,
    pub result: VotingResult,
}

/// A run's configuration as understood by the finder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinderConfig {
    pub kmin: usize,
    pub kmax: usize,
    /// Seed passed to every oracle call.
    pub seed: u64,
    /// Evaluate the oracle for different k values on the rayon pool.
    pub parallel: bool,
    pub normalization: Normalization,
}

impl FinderConfig {
    pub fn new(kmin: usize, kmax: usize) -> Self {
        Self {
            kmin,
            kmax,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = normalization;
        self
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            kmin: 1,
            kmax: DEFAULT_KMAX,
            seed: DEFAULT_SEED,
            parallel: true,
            normalization: Normalization::MinMax,
        }
    }
}
