//! Read/write analysis JSON files.
//!
//! An analysis file is the portable record of one run:
//! - the three curves and all five votes
//! - the finder/oracle/dataset settings that produced them
//! - a UTC generation timestamp

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::data::BlobConfig;
use crate::domain::{Analysis, FinderConfig};
use crate::error::KFinderError;
use crate::oracle::KMeansConfig;

pub const TOOL_NAME: &str = "kfind";

/// Settings of the run that produced an analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMeta {
    pub n_points: usize,
    pub dim: usize,
    pub finder: FinderConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kmeans: Option<KMeansConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blobs: Option<BlobConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub meta: RunMeta,
    pub analysis: Analysis,
}

pub fn write_analysis_json(
    path: &Path,
    analysis: &Analysis,
    meta: RunMeta,
) -> Result<AnalysisFile, KFinderError> {
    let file = File::create(path).map_err(|source| KFinderError::Io {
        context: format!("Failed to create analysis JSON '{}'", path.display()),
        source,
    })?;

    let record = AnalysisFile {
        tool: TOOL_NAME.to_string(),
        generated_at: Utc::now(),
        meta,
        analysis: analysis.clone(),
    };

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &record).map_err(|source| KFinderError::Json {
        context: format!("Failed to write analysis JSON '{}'", path.display()),
        source,
    })?;
    writer.flush().map_err(|source| KFinderError::Io {
        context: format!("Failed to flush analysis JSON '{}'", path.display()),
        source,
    })?;

    Ok(record)
}

pub fn read_analysis_json(path: &Path) -> Result<AnalysisFile, KFinderError> {
    let file = File::open(path).map_err(|source| KFinderError::Io {
        context: format!("Failed to open analysis JSON '{}'", path.display()),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| KFinderError::Json {
        context: format!("Invalid analysis JSON '{}'", path.display()),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::domain::{Curve, Dataset, Method};
    use crate::error::OracleError;
    use crate::finder::analyze_with;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("kfind-{}-{name}.json", std::process::id()))
    }

    fn sample_analysis() -> (Analysis, FinderConfig) {
        let elbow = |_: &Dataset, k: usize, _: u64| -> Result<f64, OracleError> {
            Ok([1000.0, 500.0, 260.0, 10.0, 8.8, 7.7, 6.6, 5.9][k - 1])
        };
        let data = Dataset::from_rows(&(0..10).map(|i| vec![i as f64]).collect::<Vec<_>>()).unwrap();
        let config = FinderConfig::new(1, 8).with_parallel(false);
        (analyze_with(&data, &config, &elbow).unwrap(), config)
    }

    #[test]
    fn written_file_reads_back() {
        let (analysis, finder) = sample_analysis();
        let path = scratch("roundtrip");
        let meta = RunMeta {
            n_points: 10,
            dim: 1,
            finder,
            kmeans: None,
            blobs: Some(BlobConfig::default()),
        };

        let written = write_analysis_json(&path, &analysis, meta).unwrap();
        let read = read_analysis_json(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(read, written);
        assert_eq!(read.tool, TOOL_NAME);
        assert_eq!(read.analysis.result.final_k, 4);
        assert_eq!(read.analysis.result.vote(Method::LastSignificantDrop).k, 3);
    }

    #[test]
    fn floats_survive_the_file_bit_for_bit() {
        let (analysis, finder) = sample_analysis();
        let path = scratch("bits");
        let meta = RunMeta {
            n_points: 10,
            dim: 1,
            finder,
            kmeans: None,
            blobs: None,
        };
        write_analysis_json(&path, &analysis, meta).unwrap();
        let read = read_analysis_json(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let bits = |a: &Analysis| -> Vec<u64> {
            let mut out: Vec<u64> = a.percent_deltas.values().iter().map(|v| v.to_bits()).collect();
            out.extend(a.second_deltas.values().iter().map(|v| v.to_bits()));
            for vote in &a.result.votes {
                out.extend(vote.scores.iter().map(|p| p.value.to_bits()));
            }
            out
        };
        assert_eq!(bits(&read.analysis), bits(&analysis));

        let value = 11.999999999999991_f64;
        let back: f64 = serde_json::from_str(&serde_json::to_string(&value).unwrap()).unwrap();
        assert_eq!(back.to_bits(), value.to_bits());
    }

    #[test]
    fn json_uses_readable_names() {
        let (analysis, _) = sample_analysis();
        let json = serde_json::to_string(&analysis).unwrap();
        assert!(json.contains("\"final_k\":4"));
        assert!(json.contains("\"percent_deltas\""));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_analysis_json(&scratch("does-not-exist")).unwrap_err();
        assert!(matches!(err, KFinderError::Io { .. }));
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn garbage_is_json_error() {
        let path = scratch("garbage");
        std::fs::write(&path, "{ not json").unwrap();
        let err = read_analysis_json(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, KFinderError::Json { .. }));
    }
}
