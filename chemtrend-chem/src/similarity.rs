//! Tanimoto scoring of a molecule series against its reference.

use chemtrend_core::{Result, TrendError};

use crate::fingerprint::Fingerprint;
use crate::source::FingerprintSource;

/// Tanimoto (Jaccard) coefficient of two fingerprints:
/// `common / (a + b - common)` over set bits.
///
/// Fingerprints are compared as sets of bit positions, so a narrower
/// fingerprint behaves as if zero-padded. Two empty fingerprints are
/// identical and score 1.0.
pub fn tanimoto(a: &Fingerprint, b: &Fingerprint) -> f64 {
    let (wa, wb) = (a.words(), b.words());
    let mut common = 0u32;
    let mut union = 0u32;
    for i in 0..wa.len().max(wb.len()) {
        let x = wa.get(i).copied().unwrap_or(0);
        let y = wb.get(i).copied().unwrap_or(0);
        common += (x & y).count_ones();
        union += (x | y).count_ones();
    }

    if union == 0 {
        return 1.0;
    }
    common as f64 / union as f64
}

/// Score every target against `reference`, preserving target order.
pub fn score(reference: &Fingerprint, targets: &[Fingerprint]) -> Vec<f64> {
    targets.iter().map(|t| tanimoto(reference, t)).collect()
}

/// Fingerprint a list of SMILES strings in order.
///
/// A malformed entry fails the whole batch with [`TrendError::Parse`], naming
/// the record index.
pub fn fingerprint_all<S, F>(source: &F, smiles: &[S]) -> Result<Vec<Fingerprint>>
where
    S: AsRef<str> + Sync,
    F: FingerprintSource + ?Sized,
{
    let one = |(index, smi): (usize, &S)| {
        let smi = smi.as_ref();
        source.fingerprint(smi).map_err(|e| match e {
            TrendError::Parse(msg) => TrendError::Parse(format!("record {index} ({smi:?}): {msg}")),
            other => other,
        })
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        smiles.par_iter().enumerate().map(one).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        smiles.iter().enumerate().map(one).collect()
    }
}

/// Similarity profile of a series: the first SMILES is the reference and
/// every entry, the reference included, is scored against it. Element 0 is
/// therefore always 1.0.
pub fn similarity_profile<S, F>(source: &F, smiles: &[S]) -> Result<Vec<f64>>
where
    S: AsRef<str> + Sync,
    F: FingerprintSource + ?Sized,
{
    if smiles.is_empty() {
        return Err(TrendError::InvalidInput(
            "similarity profile: need at least one molecule (the reference)".into(),
        ));
    }
    let fps = fingerprint_all(source, smiles)?;
    Ok(score(&fps[0], &fps))
}
