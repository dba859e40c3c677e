//! Distortion oracles.
//!
//! The finder never clusters anything itself. It asks an oracle for the
//! distortion of `data` split into `k` groups, passing the seed explicitly so a
//! run is reproducible without any process-wide random state.
//!
//! - `DistortionOracle`: the contract (also implemented for plain closures)
//! - `KMeansOracle`: the default seeded k-means implementation

pub mod kmeans;

pub use kmeans::*;

use crate::domain::Dataset;
use crate::error::OracleError;

/// Computes the distortion of a clustering of `data` into `k` groups.
///
/// Implementations must return a finite, non-negative value and should be
/// deterministic for a fixed `seed`. `Sync` lets the curve builder query
/// several k values concurrently.
pub trait DistortionOracle: Sync {
    fn distortion(&self, data: &Dataset, k: usize, seed: u64) -> Result<f64, OracleError>;
}

impl<F> DistortionOracle for F
where
    F: Fn(&Dataset, usize, u64) -> Result<f64, OracleError> + Sync,
{
    fn distortion(&self, data: &Dataset, k: usize, seed: u64) -> Result<f64, OracleError> {
        self(data, k, seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_oracles() {
        let oracle = |_: &Dataset, k: usize, seed: u64| -> Result<f64, OracleError> {
            Ok(100.0 / k as f64 + seed as f64)
        };
        let data = Dataset::from_rows(&[vec![0.0], vec![1.0]]).unwrap();
        let value = oracle.distortion(&data, 4, 1).unwrap();
        assert_eq!(value, 26.0);
    }
}
