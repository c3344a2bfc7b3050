//! Comparison of similarity trends across case studies.

use chemtrend_core::{Annotated, Result, Summarizable, TrendError};
use chemtrend_stats::{align, CorrelationMatrix, CorrelationResult, Estimator};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::case_study::CaseStudy;
use crate::config::AnalysisConfig;

/// Correlation between two named profiles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairComparison {
    pub left: String,
    pub right: String,
    pub result: CorrelationResult,
}

/// Outcome of comparing a set of profiles.
#[derive(Debug, Clone, Serialize)]
pub struct TrendReport {
    pub estimator: Estimator,
    pub names: Vec<String>,
    /// Raw similarity profiles, one per study.
    pub profiles: Vec<Vec<f64>>,
    /// Profiles resampled to `target_length`.
    pub aligned: Vec<Vec<f64>>,
    pub target_length: usize,
    /// Every pair `(i, j)` with `i < j`, in row order.
    pub comparisons: Vec<PairComparison>,
}

impl TrendReport {
    /// The comparison of `a` and `b`, in either order.
    pub fn pair(&self, a: &str, b: &str) -> Option<&PairComparison> {
        self.comparisons
            .iter()
            .find(|c| (c.left == a && c.right == b) || (c.left == b && c.right == a))
    }
}

impl Summarizable for TrendReport {
    fn summary(&self) -> String {
        format!(
            "TrendReport ({}): {} profiles aligned to {} steps, {} pairs",
            self.estimator,
            self.names.len(),
            self.target_length,
            self.comparisons.len()
        )
    }
}

/// Profile every case study and correlate each pair of aligned profiles.
#[instrument(
    skip_all,
    name = "compare_case_studies",
    fields(studies = studies.len(), estimator = %config.estimator)
)]
pub fn compare_case_studies(studies: &[CaseStudy], config: &AnalysisConfig) -> Result<TrendReport> {
    if studies.len() < 2 {
        return Err(TrendError::InvalidInput(format!(
            "need at least 2 case studies to compare (got {})",
            studies.len()
        )));
    }

    let source = config.fingerprint.source()?;
    let mut profiles = Vec::with_capacity(studies.len());
    for study in studies {
        let profile = study.profile(&source)?;
        debug!(study = study.name(), steps = profile.len(), "Computed similarity profile.");
        profiles.push(profile);
    }

    let names: Vec<&str> = studies.iter().map(Annotated::name).collect();
    compare_profiles_named(&names, profiles, config.estimator)
}

/// Align named profiles to a common length and correlate every pair.
#[instrument(
    skip_all,
    name = "compare_profiles",
    fields(profiles = profiles.len(), estimator = %estimator)
)]
pub fn compare_profiles_named<N: AsRef<str>>(
    names: &[N],
    profiles: Vec<Vec<f64>>,
    estimator: Estimator,
) -> Result<TrendReport> {
    if names.len() != profiles.len() {
        return Err(TrendError::InvalidInput(format!(
            "{} names for {} profiles",
            names.len(),
            profiles.len()
        )));
    }
    if profiles.len() < 2 {
        return Err(TrendError::InvalidInput(format!(
            "need at least 2 profiles to compare (got {})",
            profiles.len()
        )));
    }

    let aligned = align(&profiles)?;
    let target_length = aligned.first().map_or(0, Vec::len);
    debug!(target_length, "Aligned profiles.");

    let matrix = CorrelationMatrix::from_rows_labeled(&aligned, names, estimator)?;
    let comparisons: Vec<PairComparison> = matrix
        .pairs()
        .map(|(i, j, result)| PairComparison {
            left: names[i].as_ref().to_string(),
            right: names[j].as_ref().to_string(),
            result: result.clone(),
        })
        .collect();

    for c in &comparisons {
        debug!(
            left = %c.left,
            right = %c.right,
            coefficient = c.result.coefficient,
            p_value = ?c.result.p_value,
            "Pair correlated."
        );
    }

    let report = TrendReport {
        estimator,
        names: names.iter().map(|n| n.as_ref().to_string()).collect(),
        profiles,
        aligned,
        target_length,
        comparisons,
    };
    info!("{}", report.summary());
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FingerprintConfig;

    fn studies() -> Vec<CaseStudy> {
        vec![
            CaseStudy::new(
                "phenoxyacetic",
                [
                    "c1ccccc1O",
                    "c1ccc(cc1)OC",
                    "c1ccc(cc1)OCC(=O)O",
                    "Clc1ccc(cc1)OCC(=O)O",
                    "Clc1ccc(cc1)OCC(=O)Nc1ccccn1",
                ],
            ),
            CaseStudy::new(
                "aminopyridine",
                [
                    "Nc1ccccn1",
                    "CNc1ccccn1",
                    "CC(=O)Nc1ccccn1",
                    "CC(=O)Nc1ccc(C)cn1",
                    "Clc1ccc(cc1)CC(=O)Nc1ccc(C)cn1",
                    "Clc1ccc(cc1)OCC(=O)Nc1ccc(C)cn1",
                    "FC(F)(F)c1ccc(cc1)OCC(=O)Nc1ccc(C)cn1",
                ],
            ),
            CaseStudy::new(
                "alcohols",
                [
                    "CCO",
                    "CCCO",
                    "CCCCO",
                    "CCCCCO",
                    "CCCCCCO",
                    "CCCCCCCO",
                    "CCCCCCCCO",
                    "CCCCCCCCCO",
                    "CCCCCCCCCCO",
                ],
            ),
        ]
    }

    #[test]
    fn three_studies_three_pairs() {
        let report = compare_case_studies(&studies(), &AnalysisConfig::default()).unwrap();
        // lengths 5, 7, 9 → round(7)
        assert_eq!(report.target_length, 7);
        assert!(report.aligned.iter().all(|p| p.len() == 7));
        assert_eq!(report.profiles[2].len(), 9);
        assert_eq!(report.comparisons.len(), 3);
        assert_eq!(report.comparisons[0].left, "phenoxyacetic");
        assert_eq!(report.comparisons[0].right, "aminopyridine");
        for c in &report.comparisons {
            assert!((-1.0..=1.0).contains(&c.result.coefficient));
            assert_eq!(c.result.p_value, None);
            assert_eq!(c.result.n, 7);
        }
        assert!(report.pair("alcohols", "phenoxyacetic").is_some());
        assert_eq!(
            report.summary(),
            "TrendReport (pearson): 3 profiles aligned to 7 steps, 3 pairs"
        );
    }

    #[test]
    fn spearman_with_morgan_reports_p_values() {
        let config = AnalysisConfig::new(
            Estimator::Spearman,
            FingerprintConfig::Morgan { radius: 2, nbits: 2048 },
        );
        let report = compare_case_studies(&studies(), &config).unwrap();
        for c in &report.comparisons {
            let p = c.result.p_value.unwrap();
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn identical_profiles_correlate_perfectly() {
        let p = vec![1.0, 0.4, 0.55, 0.3, 0.7];
        let report =
            compare_profiles_named(&["a", "b"], vec![p.clone(), p], Estimator::Pearson).unwrap();
        assert!((report.comparisons[0].result.coefficient - 1.0).abs() < 1e-12);
    }

    #[test]
    fn too_few_inputs() {
        let one = &studies()[..1];
        assert!(matches!(
            compare_case_studies(one, &AnalysisConfig::default()),
            Err(TrendError::InvalidInput(_))
        ));
        assert!(matches!(
            compare_profiles_named(&["a", "b"], vec![vec![1.0, 2.0]], Estimator::Pearson),
            Err(TrendError::InvalidInput(_))
        ));
    }

    #[test]
    fn failures_propagate() {
        let mut bad = studies();
        bad.push(CaseStudy::new("typo", ["CCO", "C(C"]));
        assert!(matches!(
            compare_case_studies(&bad, &AnalysisConfig::default()),
            Err(TrendError::Parse(_))
        ));

        let err = compare_profiles_named(
            &["flat", "rising"],
            vec![vec![1.0, 1.0, 1.0], vec![1.0, 2.0, 3.0]],
            Estimator::Pearson,
        )
        .unwrap_err();
        assert!(matches!(err, TrendError::DegenerateInput(_)));

        let err = compare_profiles_named(
            &["a", "b"],
            vec![vec![1.0], vec![1.0, 2.0]],
            Estimator::Pearson,
        )
        .unwrap_err();
        assert!(matches!(err, TrendError::DegenerateProfile { len: 1 }));
    }
}
