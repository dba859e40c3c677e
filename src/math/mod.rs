//! Numeric helpers: series scaling, percentiles and planar geometry.

pub mod geometry;
pub mod scaling;

pub use geometry::*;
pub use scaling::*;
