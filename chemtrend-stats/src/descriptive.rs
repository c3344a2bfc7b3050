//! Descriptive statistics used by alignment and correlation.

use chemtrend_core::{Result, TrendError};

/// Arithmetic mean.
pub fn mean(data: &[f64]) -> Result<f64> {
    if data.is_empty() {
        return Err(TrendError::InvalidInput(
            "mean: data must not be empty".into(),
        ));
    }
    Ok(data.iter().sum::<f64>() / data.len() as f64)
}

/// Whether every value equals the first one.
///
/// Checked on the raw values rather than on a computed variance, since the
/// mean of a constant float series can differ from the values by an ulp.
pub fn is_constant(data: &[f64]) -> bool {
    match data.first() {
        Some(&first) => data.iter().all(|&v| v == first),
        None => true,
    }
}
