//! Shared "blob run" logic used by the CLI and its tests.
//!
//! Workflow: blob generation -> k-means distortion curve -> voting -> refit

use tracing::info;

use crate::data::{BlobConfig, Blobs, generate_blobs};
use crate::domain::FinderConfig;
use crate::error::KFinderError;
use crate::finder::{BestFit, KFinder};
use crate::io::RunMeta;
use crate::oracle::{KMeansConfig, KMeansOracle};

/// All computed outputs of a single `kfind blobs` run.
#[derive(Debug, Clone)]
pub struct BlobRun {
    pub blobs: Blobs,
    pub best: BestFit,
    pub meta: RunMeta,
}

pub fn run_blobs(
    blobs: &BlobConfig,
    finder: &FinderConfig,
    kmeans: &KMeansConfig,
) -> Result<BlobRun, KFinderError> {
    let generated = generate_blobs(blobs)?;
    info!(
        n = generated.data.n_points(),
        dim = generated.data.dim(),
        centers = blobs.centers,
        "blobs generated"
    );

    let best = KFinder::new(KMeansOracle::new(kmeans.clone()))
        .with_config(finder.clone())
        .fit_best(&generated.data)?;

    let meta = RunMeta {
        n_points: generated.data.n_points(),
        dim: generated.data.dim(),
        finder: finder.clone(),
        kmeans: Some(kmeans.clone()),
        blobs: Some(blobs.clone()),
    };

    Ok(BlobRun {
        blobs: generated,
        best,
        meta,
    })
}
