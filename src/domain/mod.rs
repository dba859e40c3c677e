//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the curves indexed by k (`DistortionCurve`, `PercentDeltaCurve`, `SecondDeltaCurve`)
//! - the heuristic identifiers and their votes (`Method`, `Vote`, `VotingResult`)
//! - the input point matrix (`Dataset`) and run configuration (`FinderConfig`)

pub mod dataset;
pub mod types;

pub use dataset::*;
pub use types::*;
