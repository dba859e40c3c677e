//! Distortion curve construction.
//!
//! The builder validates the k range and the dataset first, then asks the
//! oracle once per k. Each k is independent, so the oracle calls can run on the
//! rayon pool; results are collected back in k order either way.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::domain::{Dataset, DistortionCurve, DEFAULT_SEED};
use crate::error::KFinderError;
use crate::oracle::DistortionOracle;

/// Check `1 <= kmin <= kmax`.
pub fn validate_range(kmin: usize, kmax: usize) -> Result<(), KFinderError> {
    if kmin < 1 || kmin > kmax {
        return Err(KFinderError::InvalidRange { kmin, kmax });
    }
    Ok(())
}

pub struct CurveBuilder<'a, O: ?Sized> {
    oracle: &'a O,
    seed: u64,
    parallel: bool,
}

impl<'a, O: DistortionOracle + ?Sized> CurveBuilder<'a, O> {
    pub fn new(oracle: &'a O) -> Self {
        Self {
            oracle,
            seed: DEFAULT_SEED,
            parallel: false,
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

    /// Distortion for every k in `[kmin, kmax]`.
    pub fn build(
        &self,
        data: &Dataset,
        kmin: usize,
        kmax: usize,
    ) -> Result<DistortionCurve, KFinderError> {
        validate_range(kmin, kmax)?;

        let distinct = data.distinct_points();
        if distinct < kmax {
            return Err(KFinderError::InsufficientData { distinct, kmax });
        }

        info!(
            kmin,
            kmax,
            seed = self.seed,
            parallel = self.parallel,
            n_points = data.n_points(),
            "building distortion curve"
        );

        let distances: Vec<f64> = if self.parallel {
            // Collect every outcome first so the reported failure is the
            // smallest failing k, as in the sequential path.
            let outcomes: Vec<Result<f64, KFinderError>> = (kmin..=kmax)
                .into_par_iter()
                .map(|k| self.evaluate(data, k))
                .collect();
            outcomes.into_iter().collect::<Result<_, _>>()?
        } else {
            (kmin..=kmax)
                .map(|k| self.evaluate(data, k))
                .collect::<Result<_, _>>()?
        };

        DistortionCurve::from_values(kmin, distances)
    }

    fn evaluate(&self, data: &Dataset, k: usize) -> Result<f64, KFinderError> {
        let distortion = self
            .oracle
            .distortion(data, k, self.seed)
            .map_err(|source| KFinderError::OracleFailure { k, source })?;

        if !(distortion.is_finite() && distortion >= 0.0) {
            return Err(KFinderError::oracle(
                k,
                format!("distortion must be finite and non-negative, got {distortion}"),
            ));
        }

        debug!(k, distortion, "oracle evaluated");
        Ok(distortion)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::domain::Curve;
    use crate::error::OracleError;

    fn line_data(n: usize) -> Dataset {
        let rows: Vec<Vec<f64>> = (0..n).map(|i| vec![i as f64]).collect();
        Dataset::from_rows(&rows).unwrap()
    }

    fn hyperbola(_: &Dataset, k: usize, _: u64) -> Result<f64, OracleError> {
        Ok(120.0 / k as f64)
    }

    #[test]
    fn curve_covers_the_whole_range() {
        let data = line_data(20);
        for (kmin, kmax) in [(1, 1), (1, 10), (3, 7), (5, 20)] {
            let curve = CurveBuilder::new(&hyperbola).build(&data, kmin, kmax).unwrap();
            assert_eq!(curve.len(), kmax - kmin + 1);
            assert_eq!(curve.kmin(), kmin);
            assert_eq!(curve.kmax(), kmax);
        }
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let data = line_data(12);
        let seq = CurveBuilder::new(&hyperbola).build(&data, 1, 12).unwrap();
        let par = CurveBuilder::new(&hyperbola)
            .with_parallel(true)
            .build(&data, 1, 12)
            .unwrap();
        assert_eq!(seq, par);
        assert_eq!(par.ks(), (1..=12).collect::<Vec<_>>());
    }

    #[test]
    fn invalid_range_is_rejected_before_any_oracle_call() {
        let calls = Mutex::new(0usize);
        let counting = |_: &Dataset, _: usize, _: u64| -> Result<f64, OracleError> {
            *calls.lock().unwrap() += 1;
            Ok(1.0)
        };
        let data = line_data(10);
        let builder = CurveBuilder::new(&counting);

        let err = builder.build(&data, 5, 3).unwrap_err();
        assert!(matches!(err, KFinderError::InvalidRange { kmin: 5, kmax: 3 }));
        let err = builder.build(&data, 0, 3).unwrap_err();
        assert!(matches!(err, KFinderError::InvalidRange { kmin: 0, .. }));
        let err = builder.build(&data, 1, 11).unwrap_err();
        assert!(matches!(
            err,
            KFinderError::InsufficientData {
                distinct: 10,
                kmax: 11
            }
        ));
        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[test]
    fn duplicates_do_not_count_as_data() {
        let data = Dataset::from_rows(&vec![vec![1.0, 1.0]; 50]).unwrap();
        let err = CurveBuilder::new(&hyperbola).build(&data, 1, 2).unwrap_err();
        assert!(matches!(err, KFinderError::InsufficientData { distinct: 1, .. }));
    }

    #[test]
    fn oracle_called_once_per_k() {
        let seen = Mutex::new(Vec::new());
        let recording = |_: &Dataset, k: usize, seed: u64| -> Result<f64, OracleError> {
            seen.lock().unwrap().push((k, seed));
            Ok(1.0 / k as f64)
        };
        let data = line_data(10);
        CurveBuilder::new(&recording)
            .with_seed(99)
            .build(&data, 2, 6)
            .unwrap();

        let mut seen = seen.into_inner().unwrap();
        seen.sort();
        assert_eq!(seen, vec![(2, 99), (3, 99), (4, 99), (5, 99), (6, 99)]);
    }

    #[test]
    fn parallel_failure_reports_smallest_failing_k() {
        let failing = |_: &Dataset, k: usize, _: u64| -> Result<f64, OracleError> {
            if k % 3 == 0 {
                Err(format!("failed at {k}").into())
            } else {
                Ok(10.0 / k as f64)
            }
        };
        let data = line_data(30);
        for _ in 0..20 {
            let err = CurveBuilder::new(&failing)
                .with_parallel(true)
                .build(&data, 1, 30)
                .unwrap_err();
            assert!(matches!(err, KFinderError::OracleFailure { k: 3, .. }));
        }
    }

    #[test]
    fn oracle_failure_is_propagated_unchanged() {
        let failing = |_: &Dataset, k: usize, _: u64| -> Result<f64, OracleError> {
            if k == 4 {
                Err("did not converge".into())
            } else {
                Ok(10.0)
            }
        };
        let data = line_data(10);
        let err = CurveBuilder::new(&failing).build(&data, 1, 6).unwrap_err();
        match err {
            KFinderError::OracleFailure { k, source } => {
                assert_eq!(k, 4);
                assert_eq!(source.to_string(), "did not converge");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn nan_distortion_is_an_oracle_failure() {
        let broken = |_: &Dataset, _: usize, _: u64| -> Result<f64, OracleError> { Ok(f64::NAN) };
        let data = line_data(5);
        let err = CurveBuilder::new(&broken).build(&data, 1, 3).unwrap_err();
        assert!(matches!(err, KFinderError::OracleFailure { k: 1, .. }));
    }
}
