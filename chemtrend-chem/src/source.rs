//! Fingerprint sources: SMILES string in, fingerprint out.

use chemtrend_core::{Result, TrendError};

use crate::fingerprint::{morgan_fingerprint, path_fingerprint, Fingerprint};
use crate::smiles::parse_smiles;

/// Turns a SMILES string into a [`Fingerprint`].
///
/// Implementations are stateless and pure: the same input always yields the
/// same fingerprint, and they may be shared freely across threads.
pub trait FingerprintSource: Send + Sync {
    /// Fingerprint one molecule. Fails with [`TrendError::Parse`] when the
    /// SMILES string is malformed.
    fn fingerprint(&self, smiles: &str) -> Result<Fingerprint>;

    /// Width of the fingerprints this source produces.
    fn nbits(&self) -> usize;
}

impl<T: FingerprintSource + ?Sized> FingerprintSource for Box<T> {
    fn fingerprint(&self, smiles: &str) -> Result<Fingerprint> {
        (**self).fingerprint(smiles)
    }

    fn nbits(&self) -> usize {
        (**self).nbits()
    }
}

fn check_width(nbits: usize) -> Result<()> {
    if nbits == 0 {
        return Err(TrendError::InvalidInput(
            "fingerprint width must be at least 1 bit".into(),
        ));
    }
    Ok(())
}

/// Linear-path fingerprints (see [`path_fingerprint`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathSource {
    max_length: usize,
    nbits: usize,
}

impl PathSource {
    pub const DEFAULT_MAX_LENGTH: usize = 7;
    pub const DEFAULT_NBITS: usize = 1024;

    /// Paths of up to `max_length` atoms folded into `nbits` bits.
    pub fn new(max_length: usize, nbits: usize) -> Result<Self> {
        check_width(nbits)?;
        if max_length == 0 {
            return Err(TrendError::InvalidInput(
                "path fingerprint: max_length must be at least 1".into(),
            ));
        }
        Ok(PathSource { max_length, nbits })
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }
}

impl Default for PathSource {
    fn default() -> Self {
        PathSource {
            max_length: Self::DEFAULT_MAX_LENGTH,
            nbits: Self::DEFAULT_NBITS,
        }
    }
}

impl FingerprintSource for PathSource {
    fn fingerprint(&self, smiles: &str) -> Result<Fingerprint> {
        let mol = parse_smiles(smiles)?;
        Ok(path_fingerprint(&mol, self.max_length, self.nbits))
    }

    fn nbits(&self) -> usize {
        self.nbits
    }
}

/// Morgan circular fingerprints (see [`morgan_fingerprint`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MorganSource {
    radius: usize,
    nbits: usize,
}

impl MorganSource {
    pub const DEFAULT_RADIUS: usize = 2;
    pub const DEFAULT_NBITS: usize = 2048;

    pub fn new(radius: usize, nbits: usize) -> Result<Self> {
        check_width(nbits)?;
        Ok(MorganSource { radius, nbits })
    }

    pub fn radius(&self) -> usize {
        self.radius
    }
}

impl Default for MorganSource {
    fn default() -> Self {
        MorganSource {
            radius: Self::DEFAULT_RADIUS,
            nbits: Self::DEFAULT_NBITS,
        }
    }
}

impl FingerprintSource for MorganSource {
    fn fingerprint(&self, smiles: &str) -> Result<Fingerprint> {
        let mol = parse_smiles(smiles)?;
        Ok(morgan_fingerprint(&mol, self.radius, self.nbits))
    }

    fn nbits(&self) -> usize {
        self.nbits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sources_are_referentially_transparent() {
        let path = PathSource::default();
        assert_eq!(path.fingerprint("c1ccccc1O").unwrap(), path.fingerprint("c1ccccc1O").unwrap());
        let morgan = MorganSource::default();
        assert_eq!(morgan.fingerprint("CCN").unwrap().nbits(), 2048);
    }

    #[test]
    fn malformed_smiles_is_parse_error() {
        let err = PathSource::default().fingerprint("C1CC").unwrap_err();
        assert!(matches!(err, TrendError::Parse(_)));
        let err = MorganSource::default().fingerprint("C(").unwrap_err();
        assert!(matches!(err, TrendError::Parse(_)));
    }

    #[test]
    fn invalid_parameters_rejected() {
        assert!(PathSource::new(7, 0).is_err());
        assert!(PathSource::new(0, 1024).is_err());
        assert!(MorganSource::new(2, 0).is_err());
        assert_eq!(MorganSource::new(0, 64).unwrap().radius(), 0);
    }

    #[test]
    fn boxed_source_delegates() {
        let boxed: Box<dyn FingerprintSource> = Box::new(PathSource::new(5, 512).unwrap());
        assert_eq!(boxed.nbits(), 512);
        assert_eq!(boxed.fingerprint("CCO").unwrap().nbits(), 512);
    }
}
