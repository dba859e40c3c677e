//! Input point matrix.

use std::cmp::Ordering;

use nalgebra::DMatrix;

use crate::error::KFinderError;

/// Points to cluster, one row per point.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    points: DMatrix<f64>,
}

impl Dataset {
    /// Wrap a matrix whose rows are points.
    pub fn new(points: DMatrix<f64>) -> Result<Self, KFinderError> {
        if points.nrows() == 0 {
            return Err(KFinderError::InvalidDataset("no points".to_string()));
        }
        if points.ncols() == 0 {
            return Err(KFinderError::InvalidDataset(
                "points must have at least one coordinate".to_string(),
            ));
        }
        if let Some(idx) = points.iter().position(|v| !v.is_finite()) {
            // nalgebra storage is column-major.
            let row = idx % points.nrows();
            return Err(KFinderError::InvalidDataset(format!(
                "non-finite coordinate in point {row}"
            )));
        }
        Ok(Self { points })
    }

    /// Build from row vectors; every row must have the same length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, KFinderError> {
        let dim = rows.first().map(Vec::len).unwrap_or(0);
        if let Some(i) = rows.iter().position(|r| r.len() != dim) {
            return Err(KFinderError::InvalidDataset(format!(
                "point {i} has {} coordinates, expected {dim}",
                rows[i].len()
            )));
        }
        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        Self::new(DMatrix::from_row_slice(rows.len(), dim, &flat))
    }

    pub fn n_points(&self) -> usize {
        self.points.nrows()
    }

    pub fn dim(&self) -> usize {
        self.points.ncols()
    }

    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.points
    }

    /// Number of pairwise-distinct points.
    pub fn distinct_points(&self) -> usize {
        let mut rows: Vec<Vec<f64>> = self
            .points
            .row_iter()
            // Adding 0.0 folds -0.0 into 0.0 so sorting agrees with `==`.
            .map(|r| r.iter().map(|&v| v + 0.0).collect())
            .collect();
        rows.sort_by(|a, b| cmp_rows(a, b));
        rows.dedup();
        rows.len()
    }
}

fn cmp_rows(a: &[f64], b: &[f64]) -> Ordering {
    a.iter()
        .zip(b)
        .map(|(x, y)| x.total_cmp(y))
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}
