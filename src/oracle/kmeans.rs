//! Seeded k-means (k-means++ seeding, Lloyd iterations, best of `n_init` restarts).
//!
//! The restart seeds are derived from `(seed, k, restart)` by hashing, so every
//! k value gets its own independent but reproducible random stream. This keeps
//! the curve identical whether the k values are evaluated sequentially or in
//! parallel.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use nalgebra::DMatrix;
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Dataset;
use crate::error::OracleError;
use crate::oracle::DistortionOracle;

/// What the oracle reports as "distortion".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistortionScale {
    /// Sum of squared distances to the assigned centroid.
    #[default]
    Inertia,
    /// Square root of the inertia.
    RootInertia,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KMeansConfig {
    /// Independent restarts per k; the lowest inertia wins.
    pub n_init: usize,
    pub max_iter: usize,
    /// Convergence tolerance on squared centroid movement, relative to the
    /// mean per-coordinate variance of the data.
    pub tol: f64,
    pub scale: DistortionScale,
}

impl KMeansConfig {
    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_scale(mut self, scale: DistortionScale) -> Self {
        self.scale = scale;
        self
    }
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            n_init: 10,
            max_iter: 300,
            tol: 1e-4,
            scale: DistortionScale::Inertia,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KMeansError {
    #[error("k must be at least 1")]
    ZeroClusters,
    #[error("cannot form {k} clusters from {n} points")]
    TooManyClusters { k: usize, n: usize },
    #[error("n_init and max_iter must be at least 1")]
    InvalidConfig,
}

/// A fitted clustering.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansModel {
    pub k: usize,
    /// One centroid per row.
    pub centroids: DMatrix<f64>,
    /// Cluster index per input point.
    pub labels: Vec<usize>,
    pub inertia: f64,
    pub iterations: usize,
}

impl KMeansModel {
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.k];
        for &l in &self.labels {
            sizes[l] += 1;
        }
        sizes
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct KMeansOracle {
    pub config: KMeansConfig,
}

impl KMeansOracle {
    pub fn new(config: KMeansConfig) -> Self {
        Self { config }
    }

    /// Fit k-means with `k` clusters; the best of `n_init` restarts is returned.
    pub fn fit(&self, data: &Dataset, k: usize, seed: u64) -> Result<KMeansModel, KMeansError> {
        let n = data.n_points();
        if k == 0 {
            return Err(KMeansError::ZeroClusters);
        }
        if k > n {
            return Err(KMeansError::TooManyClusters { k, n });
        }
        if self.config.n_init == 0 || self.config.max_iter == 0 {
            return Err(KMeansError::InvalidConfig);
        }

        let tol = self.config.tol.max(0.0) * mean_variance(data);

        let mut best: Option<KMeansModel> = None;
        for restart in 0..self.config.n_init {
            let mut rng = StdRng::seed_from_u64(restart_seed(seed, k, restart));
            let model = lloyd(data, k, &mut rng, self.config.max_iter, tol);
            // Strict comparison keeps the earliest restart on ties.
            if best.as_ref().is_none_or(|b| model.inertia < b.inertia) {
                best = Some(model);
            }
        }

        best.ok_or(KMeansError::InvalidConfig)
    }
}

impl DistortionOracle for KMeansOracle {
    fn distortion(&self, data: &Dataset, k: usize, seed: u64) -> Result<f64, OracleError> {
        let model = self.fit(data, k, seed)?;
        Ok(match self.config.scale {
            DistortionScale::Inertia => model.inertia,
            DistortionScale::RootInertia => model.inertia.sqrt(),
        })
    }
}

fn restart_seed(seed: u64, k: usize, restart: usize) -> u64 {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    k.hash(&mut hasher);
    restart.hash(&mut hasher);
    hasher.finish()
}

fn lloyd(data: &Dataset, k: usize, rng: &mut StdRng, max_iter: usize, tol: f64) -> KMeansModel {
    let x = data.matrix();
    let (n, dim) = (x.nrows(), x.ncols());

    let mut centroids = init_plus_plus(x, k, rng);
    let mut labels = vec![0usize; n];
    let mut iterations = 0;

    for _ in 0..max_iter {
        iterations += 1;
        for (i, label) in labels.iter_mut().enumerate() {
            *label = nearest(x, i, &centroids).0;
        }

        let mut sums = DMatrix::<f64>::zeros(k, dim);
        let mut counts = vec![0usize; k];
        for (i, &l) in labels.iter().enumerate() {
            counts[l] += 1;
            for j in 0..dim {
                sums[(l, j)] += x[(i, j)];
            }
        }

        let mut shift = 0.0f64;
        for c in 0..k {
            // Empty clusters keep their previous centroid.
            if counts[c] == 0 {
                continue;
            }
            let mut moved = 0.0;
            for j in 0..dim {
                let updated = sums[(c, j)] / counts[c] as f64;
                moved += (updated - centroids[(c, j)]).powi(2);
                centroids[(c, j)] = updated;
            }
            shift = shift.max(moved);
        }

        if shift <= tol {
            break;
        }
    }

    let mut inertia = 0.0;
    for (i, label) in labels.iter_mut().enumerate() {
        let (c, d2) = nearest(x, i, &centroids);
        *label = c;
        inertia += d2;
    }

    KMeansModel {
        k,
        centroids,
        labels,
        inertia,
        iterations,
    }
}

/// k-means++ seeding: each new centroid is drawn with probability proportional
/// to its squared distance from the closest centroid chosen so far.
fn init_plus_plus(x: &DMatrix<f64>, k: usize, rng: &mut StdRng) -> DMatrix<f64> {
    let (n, dim) = (x.nrows(), x.ncols());
    let mut centroids = DMatrix::<f64>::zeros(k, dim);

    let first = rng.gen_range(0..n);
    centroids.row_mut(0).copy_from(&x.row(first));

    let mut d2: Vec<f64> = (0..n).map(|i| sq_dist(x, i, &centroids, 0)).collect();
    for c in 1..k {
        // All remaining weights are zero when the data has fewer distinct
        // points than k; any point is as good as another then.
        let next = match WeightedIndex::new(&d2) {
            Ok(dist) => dist.sample(rng),
            Err(_) => rng.gen_range(0..n),
        };
        centroids.row_mut(c).copy_from(&x.row(next));
        for (i, d) in d2.iter_mut().enumerate() {
            *d = d.min(sq_dist(x, i, &centroids, c));
        }
    }

    centroids
}

fn nearest(x: &DMatrix<f64>, i: usize, centroids: &DMatrix<f64>) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for c in 0..centroids.nrows() {
        let d = sq_dist(x, i, centroids, c);
        if d < best.1 {
            best = (c, d);
        }
    }
    best
}

fn sq_dist(x: &DMatrix<f64>, i: usize, centroids: &DMatrix<f64>, c: usize) -> f64 {
    (0..x.ncols())
        .map(|j| (x[(i, j)] - centroids[(c, j)]).powi(2))
        .sum()
}

fn mean_variance(data: &Dataset) -> f64 {
    let x = data.matrix();
    let n = x.nrows() as f64;
    let total: f64 = x
        .column_iter()
        .map(|col| {
            let mean = col.mean();
            col.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
        })
        .sum();
    total / x.ncols() as f64
}
