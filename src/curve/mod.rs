//! Distortion curve and its derivatives.
//!
//! Responsibilities:
//!
//! - query the oracle over the k range (`builder`)
//! - derive the percent first-difference and second-difference curves (`derivative`)

pub mod builder;
pub mod derivative;

pub use builder::*;
pub use derivative::*;
