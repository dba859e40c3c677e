//! Synthetic datasets with a known number of groups.

pub mod blobs;

pub use blobs::*;
