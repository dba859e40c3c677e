//! Command-line parsing for `kfind`.
//!
//! Argument parsing and command dispatch stay separate from the curve and
//! heuristic code; `app` turns these structs into library configs.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::data::BlobConfig;
use crate::domain::{DEFAULT_SEED, FinderConfig, Normalization};
use crate::oracle::{DistortionScale, KMeansConfig};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "kfind", version, about = "Pick the number of clusters by elbow voting")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate Gaussian blobs, find the best k and print a report.
    Blobs(BlobArgs),
    /// Print the report of a previously exported analysis.
    Show(ShowArgs),
}

#[derive(Debug, Args, Clone)]
pub struct BlobArgs {
    /// Number of blob centers (the expected answer).
    #[arg(short = 'g', long, default_value_t = 4)]
    pub centers: usize,

    #[arg(short = 'n', long, default_value_t = 50)]
    pub points_per_center: usize,

    /// Standard deviation of every blob.
    #[arg(long, default_value_t = 1.0)]
    pub std: f64,

    #[arg(long, default_value_t = 2)]
    pub dim: usize,

    #[arg(long, default_value_t = 1)]
    pub kmin: usize,

    /// Defaults to 2 * centers + 2.
    #[arg(long)]
    pub kmax: Option<usize>,

    /// Seed for both blob generation and the oracle.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// k-means restarts per k.
    #[arg(long, default_value_t = 10)]
    pub n_init: usize,

    /// Lloyd iteration cap per restart.
    #[arg(long, default_value_t = 300)]
    pub max_iter: usize,

    /// Report the square root of the inertia instead of the inertia.
    #[arg(long)]
    pub sqrt: bool,

    /// Evaluate k values one after another instead of on the thread pool.
    #[arg(long)]
    pub sequential: bool,

    #[arg(long, value_enum, default_value_t = Normalization::MinMax)]
    pub normalization: Normalization,

    /// Write curves, votes and run settings to a JSON file.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}

impl BlobArgs {
    pub fn blob_config(&self) -> BlobConfig {
        BlobConfig {
            centers: self.centers,
            points_per_center: self.points_per_center,
            dim: self.dim,
            std: self.std,
            seed: self.seed,
            ..BlobConfig::default()
        }
    }

    pub fn finder_config(&self) -> FinderConfig {
        let kmax = self
            .kmax
            .unwrap_or_else(|| self.centers.saturating_mul(2).saturating_add(2));
        FinderConfig::new(self.kmin, kmax)
            .with_seed(self.seed)
            .with_parallel(!self.sequential)
            .with_normalization(self.normalization)
    }

    pub fn kmeans_config(&self) -> KMeansConfig {
        let scale = if self.sqrt {
            DistortionScale::RootInertia
        } else {
            DistortionScale::Inertia
        };
        KMeansConfig::default()
            .with_n_init(self.n_init)
            .with_max_iter(self.max_iter)
            .with_scale(scale)
    }
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Analysis JSON produced by `kfind blobs --export`.
    #[arg(long, value_name = "JSON")]
    pub analysis: PathBuf,
}
