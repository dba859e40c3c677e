//! Reporting utilities: curve tables and vote summaries.
//!
//! Formatting is kept in one place so:
//! - the curve/heuristic code stays free of presentation concerns
//! - output changes are localized

use crate::domain::{Analysis, Curve};

pub mod format;

pub use format::*;

/// One line of the curve table. Deltas are missing where undefined.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveRow {
    pub k: usize,
    pub distortion: f64,
    pub percent_delta: Option<f64>,
    pub second_delta: Option<f64>,
}

/// Join the three curves on k.
pub fn curve_rows(analysis: &Analysis) -> Vec<CurveRow> {
    analysis
        .distortion
        .points()
        .iter()
        .map(|p| CurveRow {
            k: p.k,
            distortion: p.value,
            percent_delta: analysis.percent_deltas.get(p.k),
            second_delta: analysis.second_deltas.get(p.k),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Dataset, FinderConfig};
    use crate::error::OracleError;
    use crate::finder::analyze_with;

    #[test]
    fn rows_line_up_on_k() {
        let oracle =
            |_: &Dataset, k: usize, _: u64| -> Result<f64, OracleError> { Ok(120.0 / k as f64) };
        let data = Dataset::from_rows(&(0..8).map(|i| vec![i as f64]).collect::<Vec<_>>()).unwrap();
        let analysis = analyze_with(&data, &FinderConfig::new(2, 5), &oracle).unwrap();

        let rows = curve_rows(&analysis);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].k, 2);
        assert_eq!(rows[0].percent_delta, None);
        assert_eq!(rows[0].second_delta, None);
        // 60 -> 40
        assert_eq!(rows[1].percent_delta.map(|v| v.round()), Some(33.0));
        assert_eq!(rows[1].second_delta, None);
        assert!(rows[2].second_delta.is_some());
        assert_eq!(rows[3].k, 5);
    }
}
