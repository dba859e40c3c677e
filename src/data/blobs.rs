//! Synthetic Gaussian blob generation.
//!
//! Used by the `kfind blobs` command and by tests that need a dataset with a
//! known number of groups. Everything is driven by one explicit seed.

use nalgebra::DMatrix;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

use crate::domain::Dataset;
use crate::error::KFinderError;

/// Attempts at placing a center before giving up on the separation constraint.
const MAX_PLACEMENT_ATTEMPTS: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlobConfig {
    pub centers: usize,
    pub points_per_center: usize,
    pub dim: usize,
    /// Standard deviation of every coordinate around its center.
    pub std: f64,
    /// Centers are drawn uniformly from `[-box_size, box_size]^dim`.
    pub box_size: f64,
    /// Minimum distance between two centers, in units of `std`.
    pub min_separation: f64,
    pub seed: u64,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            centers: 4,
            points_per_center: 50,
            dim: 2,
            std: 1.0,
            box_size: 20.0,
            min_separation: 8.0,
            seed: 13,
        }
    }
}

/// Generated points with their ground truth.
#[derive(Debug, Clone)]
pub struct Blobs {
    pub data: Dataset,
    /// Index of the generating center for each point.
    pub labels: Vec<usize>,
    /// One center per row.
    pub centers: DMatrix<f64>,
}

pub fn generate_blobs(config: &BlobConfig) -> Result<Blobs, KFinderError> {
    validate(config)?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let centers = place_centers(config, &mut rng)?;
    sample_around(&centers, config.points_per_center, config.std, &mut rng)
}

/// Blobs around explicit centers (one per row).
pub fn blobs_around(
    centers: &DMatrix<f64>,
    points_per_center: usize,
    std: f64,
    seed: u64,
) -> Result<Blobs, KFinderError> {
    if centers.nrows() == 0 || points_per_center == 0 {
        return Err(KFinderError::InvalidConfig(
            "blobs need at least one center and one point per center".to_string(),
        ));
    }
    if !(std.is_finite() && std > 0.0) {
        return Err(KFinderError::InvalidConfig(format!(
            "blob std must be finite and > 0, got {std}"
        )));
    }
    let mut rng = StdRng::seed_from_u64(seed);
    sample_around(centers, points_per_center, std, &mut rng)
}

fn validate(config: &BlobConfig) -> Result<(), KFinderError> {
    if config.centers == 0 || config.points_per_center == 0 || config.dim == 0 {
        return Err(KFinderError::InvalidConfig(
            "centers, points per center and dim must all be > 0".to_string(),
        ));
    }
    if !(config.std.is_finite() && config.std > 0.0) {
        return Err(KFinderError::InvalidConfig(format!(
            "blob std must be finite and > 0, got {}",
            config.std
        )));
    }
    if !(config.box_size.is_finite() && config.box_size > 0.0) {
        return Err(KFinderError::InvalidConfig(format!(
            "box size must be finite and > 0, got {}",
            config.box_size
        )));
    }
    if !(config.min_separation.is_finite() && config.min_separation >= 0.0) {
        return Err(KFinderError::InvalidConfig(format!(
            "min separation must be finite and >= 0, got {}",
            config.min_separation
        )));
    }
    Ok(())
}

fn place_centers(config: &BlobConfig, rng: &mut StdRng) -> Result<DMatrix<f64>, KFinderError> {
    let min_dist_sq = (config.min_separation * config.std).powi(2);
    let mut centers = DMatrix::<f64>::zeros(config.centers, config.dim);

    let mut placed = 0;
    let mut attempts = 0;
    while placed < config.centers {
        attempts += 1;
        if attempts > MAX_PLACEMENT_ATTEMPTS {
            return Err(KFinderError::InvalidConfig(format!(
                "could not place {} centers {}*std apart inside a box of half-width {}",
                config.centers, config.min_separation, config.box_size
            )));
        }

        let candidate: Vec<f64> = (0..config.dim)
            .map(|_| rng.gen_range(-config.box_size..=config.box_size))
            .collect();
        let far_enough = (0..placed).all(|c| {
            let d2: f64 = candidate
                .iter()
                .enumerate()
                .map(|(j, v)| (v - centers[(c, j)]).powi(2))
                .sum();
            d2 >= min_dist_sq
        });
        if far_enough {
            for (j, v) in candidate.into_iter().enumerate() {
                centers[(placed, j)] = v;
            }
            placed += 1;
        }
    }

    Ok(centers)
}

fn sample_around(
    centers: &DMatrix<f64>,
    points_per_center: usize,
    std: f64,
    rng: &mut StdRng,
) -> Result<Blobs, KFinderError> {
    let normal = Normal::new(0.0, std)
        .map_err(|e| KFinderError::InvalidConfig(format!("noise distribution error: {e}")))?;

    let (g, dim) = (centers.nrows(), centers.ncols());
    let n = g * points_per_center;
    let mut points = DMatrix::<f64>::zeros(n, dim);
    let mut labels = Vec::with_capacity(n);

    for c in 0..g {
        for p in 0..points_per_center {
            let row = c * points_per_center + p;
            for j in 0..dim {
                points[(row, j)] = centers[(c, j)] + normal.sample(rng);
            }
            labels.push(c);
        }
    }

    Ok(Blobs {
        data: Dataset::new(points)?,
        labels,
        centers: centers.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_match_config() {
        let config = BlobConfig {
            centers: 3,
            points_per_center: 20,
            dim: 4,
            ..BlobConfig::default()
        };
        let blobs = generate_blobs(&config).unwrap();
        assert_eq!(blobs.data.n_points(), 60);
        assert_eq!(blobs.data.dim(), 4);
        assert_eq!(blobs.labels.len(), 60);
        assert_eq!(blobs.centers.nrows(), 3);
    }

    #[test]
    fn centers_respect_separation() {
        let config = BlobConfig::default();
        let blobs = generate_blobs(&config).unwrap();
        let min = config.min_separation * config.std;
        for a in 0..config.centers {
            for b in (a + 1)..config.centers {
                let d = (blobs.centers.row(a) - blobs.centers.row(b)).norm();
                assert!(d >= min, "centers {a} and {b} only {d} apart");
            }
        }
    }

    #[test]
    fn same_seed_same_points() {
        let config = BlobConfig::default();
        let a = generate_blobs(&config).unwrap();
        let b = generate_blobs(&config).unwrap();
        assert_eq!(a.data, b.data);

        let other = generate_blobs(&BlobConfig { seed: 14, ..config }).unwrap();
        assert_ne!(a.data, other.data);
    }

    #[test]
    fn impossible_separation_is_reported() {
        let config = BlobConfig {
            centers: 50,
            box_size: 1.0,
            min_separation: 10.0,
            ..BlobConfig::default()
        };
        assert!(matches!(
            generate_blobs(&config),
            Err(KFinderError::InvalidConfig(_))
        ));
    }

    #[test]
    fn rejects_non_positive_std() {
        let config = BlobConfig {
            std: 0.0,
            ..BlobConfig::default()
        };
        assert!(generate_blobs(&config).is_err());
        assert!(blobs_around(&DMatrix::zeros(2, 2), 5, -1.0, 1).is_err());
    }
}
