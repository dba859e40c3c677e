//! Top-level k finding.
//!
//! Keeping the workflow in one place means the CLI and library callers share it:
//! validate -> distortion curve -> derivative curves -> five votes -> majority
//!
//! All input checks (k range, range length, distinct points) run before the
//! oracle is called even once.

use tracing::info;

use crate::curve::{CurveBuilder, percent_deltas, second_deltas, validate_range};
use crate::domain::{Analysis, Dataset, FinderConfig, Method, VotingResult};
use crate::error::KFinderError;
use crate::heuristics::{HeuristicInput, ensure_points, estimate_all};
use crate::oracle::{DistortionOracle, KMeansModel, KMeansOracle};
use crate::voting::aggregate;

/// Best k for `data` over `[kmin, kmax]`, using the default seed.
pub fn find_best_k<O: DistortionOracle + ?Sized>(
    data: &Dataset,
    kmin: usize,
    kmax: usize,
    oracle: &O,
) -> Result<VotingResult, KFinderError> {
    analyze_with(data, &FinderConfig::new(kmin, kmax), oracle).map(|a| a.result)
}

/// Run the whole pipeline and keep every intermediate curve.
pub fn analyze_with<O: DistortionOracle + ?Sized>(
    data: &Dataset,
    config: &FinderConfig,
    oracle: &O,
) -> Result<Analysis, KFinderError> {
    validate_range(config.kmin, config.kmax)?;
    let points = config.kmax - config.kmin + 1;
    for method in Method::ALL {
        ensure_points(method, points)?;
    }

    let distortion = CurveBuilder::new(oracle)
        .with_seed(config.seed)
        .with_parallel(config.parallel)
        .build(data, config.kmin, config.kmax)?;
    let percent_deltas = percent_deltas(&distortion);
    let second_deltas = second_deltas(&percent_deltas);

    let votes = estimate_all(&HeuristicInput {
        distortion: &distortion,
        percent_deltas: &percent_deltas,
        second_deltas: &second_deltas,
        normalization: config.normalization,
    })?;
    let result = aggregate(votes);

    Ok(Analysis {
        distortion,
        percent_deltas,
        second_deltas,
        result,
    })
}

/// An oracle bundled with its run configuration.
#[derive(Debug, Clone)]
pub struct KFinder<O> {
    oracle: O,
    config: FinderConfig,
}

impl<O: DistortionOracle> KFinder<O> {
    pub fn new(oracle: O) -> Self {
        Self {
            oracle,
            config: FinderConfig::default(),
        }
    }

    pub fn with_config(mut self, config: FinderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn analyze(&self, data: &Dataset) -> Result<Analysis, KFinderError> {
        analyze_with(data, &self.config, &self.oracle)
    }

    pub fn find_best_k(&self, data: &Dataset) -> Result<VotingResult, KFinderError> {
        self.analyze(data).map(|a| a.result)
    }
}

/// Analysis plus the clustering refit at the selected k.
#[derive(Debug, Clone)]
pub struct BestFit {
    pub analysis: Analysis,
    pub model: KMeansModel,
}

impl KFinder<KMeansOracle> {
    /// Find the best k, then fit k-means once more at that k with the same seed.
    pub fn fit_best(&self, data: &Dataset) -> Result<BestFit, KFinderError> {
        let analysis = self.analyze(data)?;
        let k = analysis.result.final_k;
        let model = self
            .oracle
            .fit(data, k, self.config.seed)
            .map_err(|e| KFinderError::oracle(k, e))?;

        info!(k, inertia = model.inertia, "refit at best k");
        Ok(BestFit { analysis, model })
    }
}
