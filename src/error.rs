//! Error taxonomy for the k finder.
//!
//! Every variant maps onto a process exit code so the `kfind` binary can tell
//! "bad input" apart from "oracle failure" without string matching.

use thiserror::Error;

use crate::domain::Method;

/// Boxed error raised by a distortion oracle.
pub type OracleError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum KFinderError {
    /// `kmin < 1` or `kmin > kmax`.
    #[error("Invalid k range: kmin={kmin}, kmax={kmax} (need 1 <= kmin <= kmax).")]
    InvalidRange { kmin: usize, kmax: usize },

    /// The dataset cannot be split into `kmax` groups.
    #[error("Insufficient data: {distinct} distinct points cannot support kmax={kmax} clusters.")]
    InsufficientData { distinct: usize, kmax: usize },

    /// A heuristic needs more curve points than the k range provides.
    #[error("{method} needs at least {required} curve points, got {points}.")]
    InsufficientRange {
        method: Method,
        points: usize,
        required: usize,
    },

    /// The distortion oracle failed; its error is kept as the source.
    #[error("Distortion oracle failed at k={k}: {source}")]
    OracleFailure {
        k: usize,
        #[source]
        source: OracleError,
    },

    /// Empty, ragged or non-finite input points.
    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    /// A configuration value outside its valid domain.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl KFinderError {
    /// Process exit code for the `kfind` binary.
    pub fn exit_code(&self) -> u8 {
        match self {
            KFinderError::InvalidRange { .. }
            | KFinderError::InvalidDataset(_)
            | KFinderError::InvalidConfig(_) => 2,
            KFinderError::InsufficientData { .. } | KFinderError::InsufficientRange { .. } => 3,
            KFinderError::OracleFailure { .. } => 4,
            KFinderError::Io { .. } | KFinderError::Json { .. } => 5,
        }
    }

    /// True when the caller can recover by changing its inputs (k range or data).
    pub fn is_input_error(&self) -> bool {
        matches!(self.exit_code(), 2 | 3)
    }

    pub(crate) fn oracle(k: usize, source: impl Into<OracleError>) -> Self {
        KFinderError::OracleFailure {
            k,
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_separate_input_from_oracle_faults() {
        let bad_range = KFinderError::InvalidRange { kmin: 5, kmax: 3 };
        let too_small = KFinderError::InsufficientData { distinct: 2, kmax: 4 };
        let oracle = KFinderError::oracle(3, "boom");

        assert_eq!(bad_range.exit_code(), 2);
        assert_eq!(too_small.exit_code(), 3);
        assert_eq!(oracle.exit_code(), 4);
        assert!(bad_range.is_input_error());
        assert!(!oracle.is_input_error());
    }

    #[test]
    fn oracle_failure_keeps_source() {
        let err = KFinderError::oracle(7, "diverged");
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("diverged"));
        assert!(err.to_string().contains("k=7"));
    }
}
