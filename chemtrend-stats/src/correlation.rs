//! Correlation of aligned profiles.
//!
//! Provides the Pearson and Spearman estimators behind [`correlate`], the
//! length-tolerant [`compare_profiles`], and a [`CorrelationMatrix`] for all
//! pairs of a set of profiles. Undefined correlations (constant input, fewer
//! than two points) are errors rather than NaN.

use std::fmt;
use std::str::FromStr;

use chemtrend_core::{Result, Scored, Summarizable, TrendError};

use crate::align;
use crate::descriptive::{self, is_constant};
use crate::distribution::t_two_tailed_p;
use crate::rank::average_ranks;

// ── Estimators ─────────────────────────────────────────────────────────────

/// Correlation estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Estimator {
    /// Product-moment coefficient.
    #[default]
    Pearson,
    /// Rank-based coefficient with a two-sided p-value.
    Spearman,
}

impl Estimator {
    pub const ALL: [Estimator; 2] = [Estimator::Pearson, Estimator::Spearman];

    /// Configuration name (`"pearson"` / `"spearman"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Estimator::Pearson => "pearson",
            Estimator::Spearman => "spearman",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Estimator::Pearson => "product-moment coefficient",
            Estimator::Spearman => "rank-based coefficient with significance",
        }
    }
}

impl fmt::Display for Estimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Estimator {
    type Err = TrendError;

    fn from_str(s: &str) -> Result<Self> {
        Estimator::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| TrendError::UnsupportedEstimator(s.to_string()))
    }
}

/// Outcome of one correlation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CorrelationResult {
    pub estimator: Estimator,
    /// Coefficient in [-1, 1].
    pub coefficient: f64,
    /// Two-sided p-value; only the Spearman estimator reports one.
    pub p_value: Option<f64>,
    /// Number of paired observations.
    pub n: usize,
}

impl Scored for CorrelationResult {
    fn score(&self) -> f64 {
        self.coefficient
    }
}

impl Summarizable for CorrelationResult {
    fn summary(&self) -> String {
        match self.p_value {
            Some(p) => format!(
                "{}: r={:.4}, p={:.6}, n={}",
                self.estimator, self.coefficient, p, self.n
            ),
            None => format!("{}: r={:.4}, n={}", self.estimator, self.coefficient, self.n),
        }
    }
}

// ── Coefficients ───────────────────────────────────────────────────────────

/// Pearson product-moment correlation of `x` and `y`.
///
/// Fails with [`TrendError::DegenerateInput`] if either series is constant.
pub fn pearson(x: &[f64], y: &[f64]) -> Result<f64> {
    validate_paired(x, y)?;
    if is_constant(x) || is_constant(y) {
        return Err(TrendError::DegenerateInput(
            "pearson: correlation undefined for a constant series".into(),
        ));
    }
    product_moment(x, y)
}

/// Spearman rank correlation of `x` and `y` and its two-sided p-value.
///
/// Ties receive averaged ranks. The p-value uses Student's t with `n - 2`
/// degrees of freedom; it is 0 for a perfect monotonic relation and 1 when
/// only two points leave no degrees of freedom.
pub fn spearman(x: &[f64], y: &[f64]) -> Result<(f64, f64)> {
    validate_paired(x, y)?;
    let rx = average_ranks(x);
    let ry = average_ranks(y);
    if is_constant(&rx) || is_constant(&ry) {
        return Err(TrendError::DegenerateInput(
            "spearman: correlation undefined for constant ranks".into(),
        ));
    }
    let rho = product_moment(&rx, &ry)?;
    Ok((rho, rank_p_value(rho, x.len())?))
}

/// Correlate two equal-length profiles with the chosen estimator.
pub fn correlate(a: &[f64], b: &[f64], estimator: Estimator) -> Result<CorrelationResult> {
    let (coefficient, p_value) = match estimator {
        Estimator::Pearson => (pearson(a, b)?, None),
        Estimator::Spearman => {
            let (rho, p) = spearman(a, b)?;
            (rho, Some(p))
        }
    };
    Ok(CorrelationResult {
        estimator,
        coefficient,
        p_value,
        n: a.len(),
    })
}

/// A correlation together with the curves that were actually compared.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedComparison {
    pub result: CorrelationResult,
    pub left: Vec<f64>,
    pub right: Vec<f64>,
}

/// Correlate two profiles of possibly different lengths.
///
/// Profiles of equal length are compared as given; otherwise both are first
/// resampled to their common length with [`align::align`].
pub fn compare_profiles(a: &[f64], b: &[f64], estimator: Estimator) -> Result<AlignedComparison> {
    let (left, right) = if a.len() == b.len() {
        (a.to_vec(), b.to_vec())
    } else {
        let mut aligned = align::align(&[a, b])?;
        let right = aligned.pop().unwrap_or_default();
        let left = aligned.pop().unwrap_or_default();
        (left, right)
    };
    let result = correlate(&left, &right, estimator)?;
    Ok(AlignedComparison { result, left, right })
}

fn validate_paired(x: &[f64], y: &[f64]) -> Result<()> {
    if x.len() != y.len() {
        return Err(TrendError::LengthMismatch {
            left: x.len(),
            right: y.len(),
        });
    }
    if x.len() < 2 {
        return Err(TrendError::DegenerateInput(format!(
            "correlation needs at least 2 observations (got {})",
            x.len()
        )));
    }
    if x.iter().chain(y).any(|v| !v.is_finite()) {
        return Err(TrendError::InvalidInput(
            "correlation: profiles contain non-finite values".into(),
        ));
    }
    Ok(())
}

/// Product-moment coefficient of two validated, non-constant series.
///
/// Each series is divided by its largest magnitude first, so products of
/// deviations stay representable for values near the limits of `f64`.
fn product_moment(x: &[f64], y: &[f64]) -> Result<f64> {
    let x = scaled(x);
    let y = scaled(y);
    let mean_x = descriptive::mean(&x)?;
    let mean_y = descriptive::mean(&y)?;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (xi, yi) in x.iter().zip(&y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = var_x.sqrt() * var_y.sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return Err(TrendError::DegenerateInput(
            "correlation undefined: zero variance".into(),
        ));
    }
    Ok((cov / denom).clamp(-1.0, 1.0))
}

fn scaled(data: &[f64]) -> Vec<f64> {
    let scale = data.iter().fold(0.0f64, |m, v| m.max(v.abs()));
    if scale == 0.0 {
        return data.to_vec();
    }
    data.iter().map(|v| v / scale).collect()
}

fn rank_p_value(rho: f64, n: usize) -> Result<f64> {
    let df = n as f64 - 2.0;
    if df <= 0.0 {
        return Ok(1.0);
    }
    let r2 = rho * rho;
    if r2 >= 1.0 {
        return Ok(0.0);
    }
    let t = rho * (df / (1.0 - r2)).sqrt();
    t_two_tailed_p(t, df)
}

// ── Correlation matrix ─────────────────────────────────────────────────────

/// All pairwise correlations of a set of equal-length profiles.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    /// Row-major n×n results.
    cells: Vec<CorrelationResult>,
    size: usize,
    estimator: Estimator,
    labels: Option<Vec<String>>,
}

impl CorrelationMatrix {
    /// Correlate every pair of `rows`. All rows must have the same length.
    pub fn from_rows<R>(rows: &[R], estimator: Estimator) -> Result<Self>
    where
        R: AsRef<[f64]> + Sync,
    {
        Self::build(rows, estimator, None)
    }

    /// [`from_rows`](Self::from_rows) with one label per row.
    pub fn from_rows_labeled<R, L>(rows: &[R], labels: &[L], estimator: Estimator) -> Result<Self>
    where
        R: AsRef<[f64]> + Sync,
        L: AsRef<str>,
    {
        if labels.len() != rows.len() {
            return Err(TrendError::InvalidInput(format!(
                "CorrelationMatrix: {} labels for {} rows",
                labels.len(),
                rows.len()
            )));
        }
        let labels = labels.iter().map(|l| l.as_ref().to_string()).collect();
        Self::build(rows, estimator, Some(labels))
    }

    fn build<R>(rows: &[R], estimator: Estimator, labels: Option<Vec<String>>) -> Result<Self>
    where
        R: AsRef<[f64]> + Sync,
    {
        let first = rows.first().ok_or_else(|| {
            TrendError::InvalidInput("CorrelationMatrix: need at least one profile".into())
        })?;
        let obs = first.as_ref().len();
        if let Some(row) = rows.iter().find(|r| r.as_ref().len() != obs) {
            return Err(TrendError::LengthMismatch {
                left: obs,
                right: row.as_ref().len(),
            });
        }

        let n = rows.len();
        let pairs: Vec<(usize, usize)> = (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .collect();
        let pair = |&(i, j): &(usize, usize)| {
            correlate(rows[i].as_ref(), rows[j].as_ref(), estimator)
        };

        #[cfg(feature = "parallel")]
        let upper: Vec<CorrelationResult> = {
            use rayon::prelude::*;
            pairs.par_iter().map(pair).collect::<Result<_>>()?
        };
        #[cfg(not(feature = "parallel"))]
        let upper: Vec<CorrelationResult> = pairs.iter().map(pair).collect::<Result<_>>()?;

        let identity = CorrelationResult {
            estimator,
            coefficient: 1.0,
            p_value: match estimator {
                Estimator::Pearson => None,
                Estimator::Spearman => Some(0.0),
            },
            n: obs,
        };
        let mut cells = vec![identity; n * n];
        for (&(i, j), result) in pairs.iter().zip(upper) {
            cells[j * n + i] = result.clone();
            cells[i * n + j] = result;
        }

        Ok(Self {
            cells,
            size: n,
            estimator,
            labels,
        })
    }

    /// Result for rows `i` and `j`.
    pub fn get(&self, i: usize, j: usize) -> &CorrelationResult {
        &self.cells[i * self.size + j]
    }

    /// Coefficient for rows `i` and `j`.
    pub fn coefficient(&self, i: usize, j: usize) -> f64 {
        self.get(i, j).coefficient
    }

    /// Upper-triangle pairs `(i, j, result)` with `i < j`, row by row.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize, &CorrelationResult)> + '_ {
        let n = self.size;
        (0..n).flat_map(move |i| ((i + 1)..n).map(move |j| (i, j, self.get(i, j))))
    }

    /// Number of profiles.
    pub fn n(&self) -> usize {
        self.size
    }

    pub fn estimator(&self) -> Estimator {
        self.estimator
    }

    /// Row labels, if provided.
    pub fn labels(&self) -> Option<&[String]> {
        self.labels.as_deref()
    }
}

impl Summarizable for CorrelationMatrix {
    fn summary(&self) -> String {
        format!("CorrelationMatrix ({}): {}x{}", self.estimator, self.size, self.size)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    #[test]
    fn pearson_perfect_positive_and_negative() {
        assert!((pearson(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]).unwrap() - 1.0).abs() < TOL);
        assert!((pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]).unwrap() + 1.0).abs() < TOL);
        let r = correlate(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0], Estimator::Pearson).unwrap();
        assert!((r.coefficient - 1.0).abs() < TOL);
        assert_eq!(r.p_value, None);
        assert_eq!(r.n, 3);
    }

    #[test]
    fn pearson_known_value() {
        // r = 8 / sqrt(10 * 9.5)
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [1.0, 2.0, 3.5, 5.0, 3.5];
        let expected = 8.0 / (95.0f64).sqrt();
        assert!((pearson(&x, &y).unwrap() - expected).abs() < TOL);
    }

    #[test]
    fn pearson_extreme_magnitudes() {
        let huge = [1e100, 2e100, 3e100];
        assert!((pearson(&huge, &huge).unwrap() - 1.0).abs() < TOL);
        let tiny = [1e-170, 2e-170, 3e-170];
        assert!((pearson(&tiny, &tiny).unwrap() - 1.0).abs() < TOL);
        assert!((pearson(&tiny, &[3e300, 2e300, 1e300]).unwrap() + 1.0).abs() < TOL);
        let (rho, _) = spearman(&tiny, &huge).unwrap();
        assert!((rho - 1.0).abs() < TOL);
    }

    #[test]
    fn signed_zeros_are_constant() {
        let zeros = [0.0, -0.0, 0.0];
        let x = [1.0, 2.0, 3.0];
        assert!(matches!(pearson(&zeros, &x), Err(TrendError::DegenerateInput(_))));
        assert!(matches!(spearman(&zeros, &x), Err(TrendError::DegenerateInput(_))));
    }

    #[test]
    fn pearson_orthogonal_is_zero() {
        let x = [1.0, 0.0, -1.0, 0.0];
        let y = [0.0, 1.0, 0.0, -1.0];
        assert!(pearson(&x, &y).unwrap().abs() < TOL);
    }

    #[test]
    fn constant_series_is_degenerate() {
        let err = correlate(&[5.0, 5.0, 5.0], &[1.0, 2.0, 3.0], Estimator::Pearson).unwrap_err();
        assert!(matches!(err, TrendError::DegenerateInput(_)));
        let err = correlate(&[1.0, 2.0, 3.0], &[0.1, 0.1, 0.1], Estimator::Spearman).unwrap_err();
        assert!(matches!(err, TrendError::DegenerateInput(_)));
    }

    #[test]
    fn length_mismatch_and_short_input() {
        let err = pearson(&[1.0, 2.0], &[1.0]).unwrap_err();
        assert!(matches!(err, TrendError::LengthMismatch { left: 2, right: 1 }));
        assert!(matches!(pearson(&[1.0], &[2.0]), Err(TrendError::DegenerateInput(_))));
        assert!(matches!(
            pearson(&[1.0, f64::NAN], &[1.0, 2.0]),
            Err(TrendError::InvalidInput(_))
        ));
    }

    #[test]
    fn spearman_monotonic() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let cubes = [1.0, 8.0, 27.0, 64.0, 125.0];
        let (rho, p) = spearman(&x, &cubes).unwrap();
        assert!((rho - 1.0).abs() < TOL);
        assert_eq!(p, 0.0);

        let (rho, _) = spearman(&x, &[5.0, 4.0, 3.0, 2.0, 1.0]).unwrap();
        assert!((rho + 1.0).abs() < TOL);
    }

    #[test]
    fn spearman_reference_value() {
        // Reference: rho = 0.8207826816681233, p = 0.08858700531354381
        let r = correlate(
            &[1.0, 2.0, 3.0, 4.0, 5.0],
            &[5.0, 6.0, 7.0, 8.0, 7.0],
            Estimator::Spearman,
        )
        .unwrap();
        assert!((r.coefficient - 0.820_782_681_668_123_3).abs() < 1e-12);
        assert!((r.p_value.unwrap() - 0.088_587_005_313_543_81).abs() < 1e-8);
    }

    #[test]
    fn spearman_two_points() {
        let (rho, p) = spearman(&[1.0, 2.0], &[3.0, 4.0]).unwrap();
        assert!((rho - 1.0).abs() < TOL);
        assert_eq!(p, 1.0);
    }

    #[test]
    fn estimator_parsing() {
        assert_eq!("pearson".parse::<Estimator>().unwrap(), Estimator::Pearson);
        assert_eq!("spearman".parse::<Estimator>().unwrap(), Estimator::Spearman);
        for bad in ["kendall", "correlation", "Pearson", ""] {
            let err = bad.parse::<Estimator>().unwrap_err();
            assert!(matches!(err, TrendError::UnsupportedEstimator(_)), "{bad}");
        }
        assert_eq!(Estimator::Spearman.to_string(), "spearman");
    }

    #[test]
    fn compare_identical_profiles_after_alignment() {
        let p = [1.0, 0.35, 0.41, 0.52, 0.48, 0.66];
        let cmp = compare_profiles(&p, &p, Estimator::Pearson).unwrap();
        assert!((cmp.result.coefficient - 1.0).abs() < TOL);

        let aligned = align::align(&[&p[..], &p[..]]).unwrap();
        let r = correlate(&aligned[0], &aligned[1], Estimator::Pearson).unwrap();
        assert!((r.coefficient - 1.0).abs() < TOL);
    }

    #[test]
    fn compare_unequal_lengths_aligns_first() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0, 4.5, 5.0];
        let cmp = compare_profiles(&a, &b, Estimator::Pearson).unwrap();
        assert_eq!(cmp.left.len(), 7);
        assert_eq!(cmp.right.len(), 7);
        assert!((cmp.result.coefficient - 1.0).abs() < TOL);
        assert_eq!(cmp.result.n, 7);
    }

    #[test]
    fn correlation_matrix_shape() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [4.0, 3.0, 2.0, 1.0];
        let c = [1.0, 3.0, 2.0, 4.0];
        let cm = CorrelationMatrix::from_rows_labeled(
            &[a, b, c],
            &["a", "b", "c"],
            Estimator::Spearman,
        )
        .unwrap();
        assert_eq!(cm.n(), 3);
        assert_eq!(cm.labels().unwrap(), ["a", "b", "c"]);
        for i in 0..3 {
            assert_eq!(cm.coefficient(i, i), 1.0);
            for j in 0..3 {
                assert_eq!(cm.get(i, j), cm.get(j, i));
            }
        }
        assert!((cm.coefficient(0, 1) + 1.0).abs() < TOL);
        assert!(cm.get(0, 2).p_value.is_some());
        assert_eq!(cm.pairs().count(), 3);
        assert_eq!(cm.summary(), "CorrelationMatrix (spearman): 3x3");
    }

    #[test]
    fn correlation_matrix_rejects_bad_shapes() {
        let rows: Vec<Vec<f64>> = vec![vec![1.0, 2.0, 3.0], vec![1.0, 2.0]];
        assert!(matches!(
            CorrelationMatrix::from_rows(&rows, Estimator::Pearson),
            Err(TrendError::LengthMismatch { .. })
        ));
        let empty: Vec<Vec<f64>> = vec![];
        assert!(CorrelationMatrix::from_rows(&empty, Estimator::Pearson).is_err());
        assert!(
            CorrelationMatrix::from_rows_labeled(&[[1.0, 2.0]], &["a", "b"], Estimator::Pearson)
                .is_err()
        );
    }

    #[test]
    fn result_summary() {
        let r = correlate(&[1.0, 2.0, 3.0], &[1.0, 3.0, 2.0], Estimator::Pearson).unwrap();
        assert_eq!(r.summary(), "pearson: r=0.5000, n=3");
        assert_eq!(r.score(), r.coefficient);
    }
}
