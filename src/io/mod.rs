//! Input/output helpers.
//!
//! - analysis JSON read/write (`analysis`)

pub mod analysis;

pub use analysis::*;
