//! Profile alignment.
//!
//! Similarity profiles from different case studies have one point per
//! development step, so their lengths differ. Before they can be correlated
//! point-by-point, every profile is resampled onto a common number of
//! evenly spaced points with piecewise-linear interpolation. The common
//! length is the rounded mean of the input lengths.

use chemtrend_core::{Result, TrendError};

use crate::descriptive;

/// Concatenate the segments of a multi-part profile, in order.
pub fn flatten<S: AsRef<[f64]>>(segments: &[S]) -> Vec<f64> {
    segments
        .iter()
        .flat_map(|s| s.as_ref().iter().copied())
        .collect()
}

/// Common length for a set of profiles: `round(mean(lengths))`, rounding
/// halves away from zero.
pub fn target_length(lengths: &[usize]) -> Result<usize> {
    if lengths.is_empty() {
        return Err(TrendError::InvalidInput(
            "target_length: need at least one profile".into(),
        ));
    }
    let as_f64: Vec<f64> = lengths.iter().map(|&n| n as f64).collect();
    Ok(descriptive::mean(&as_f64)?.round() as usize)
}

/// Resample `profile` to `len` evenly spaced points spanning its full index
/// range `[0, n-1]`.
///
/// The first and last outputs are the first and last inputs exactly, and
/// every sample point that lands on an original index reproduces that value
/// bit-for-bit. Fails with [`TrendError::DegenerateProfile`] for profiles
/// shorter than 2 points, which have no slope to interpolate along.
pub fn resample(profile: &[f64], len: usize) -> Result<Vec<f64>> {
    let n = profile.len();
    if n < 2 {
        return Err(TrendError::DegenerateProfile { len: n });
    }
    if len < 2 {
        return Err(TrendError::InvalidInput(format!(
            "resample: target length must be at least 2 (got {len})"
        )));
    }

    let last = n - 1;
    let step = last as f64 / (len - 1) as f64;
    let mut out = Vec::with_capacity(len);
    for k in 0..len - 1 {
        let x = k as f64 * step;
        let lo = (x.floor() as usize).min(last);
        let frac = x - lo as f64;
        let value = if lo == last || frac == 0.0 {
            profile[lo]
        } else {
            profile[lo] + (profile[lo + 1] - profile[lo]) * frac
        };
        out.push(value);
    }
    out.push(profile[last]);
    Ok(out)
}

/// Resample every profile to their common [`target_length`].
///
/// All outputs have the same length; output order follows input order.
pub fn align<P: AsRef<[f64]>>(profiles: &[P]) -> Result<Vec<Vec<f64>>> {
    if profiles.is_empty() {
        return Err(TrendError::InvalidInput(
            "align: need at least one profile".into(),
        ));
    }
    if let Some(short) = profiles.iter().find(|p| p.as_ref().len() < 2) {
        return Err(TrendError::DegenerateProfile {
            len: short.as_ref().len(),
        });
    }

    let lengths: Vec<usize> = profiles.iter().map(|p| p.as_ref().len()).collect();
    let len = target_length(&lengths)?;
    profiles.iter().map(|p| resample(p.as_ref(), len)).collect()
}

/// [`align`] for multi-segment profiles: each profile's segments are
/// [`flatten`]ed into one sequence first.
pub fn align_segmented<P, S>(profiles: &[P]) -> Result<Vec<Vec<f64>>>
where
    P: AsRef<[S]>,
    S: AsRef<[f64]>,
{
    let flat: Vec<Vec<f64>> = profiles.iter().map(|p| flatten(p.as_ref())).collect();
    align(&flat)
}
