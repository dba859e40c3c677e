//! `kfinder` library crate.
//!
//! Picks the number of clusters for a dataset by computing a distortion curve
//! over a k range and letting five elbow heuristics vote.
//!
//! The binary (`kfind`) is a thin wrapper around this library so that:
//!
//! - the curve and voting logic is testable without spawning processes
//! - any clustering routine can be plugged in through `DistortionOracle`

pub mod app;
pub mod cli;
pub mod curve;
pub mod data;
pub mod domain;
pub mod error;
pub mod finder;
pub mod heuristics;
pub mod io;
pub mod math;
pub mod oracle;
pub mod report;
pub mod voting;

pub use domain::{Analysis, Dataset, FinderConfig, Method, VotingResult};
pub use error::KFinderError;
pub use finder::{KFinder, find_best_k};
pub use oracle::DistortionOracle;
