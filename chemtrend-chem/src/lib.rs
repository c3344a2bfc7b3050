//! Molecule fingerprints and similarity profiles for the chemtrend crates.
//!
//! Provides a SMILES parser and molecular graph, two hashed fingerprint
//! families (linear paths and Morgan/ECFP-like circular environments), the
//! [`FingerprintSource`] contract that turns a SMILES string into a
//! [`Fingerprint`], and Tanimoto scoring of a series against its first
//! member.
//!
//! # Example
//!
//! ```
//! use chemtrend_chem::{similarity_profile, PathSource};
//!
//! let source = PathSource::default();
//! let profile = similarity_profile(&source, &["CCO", "CCN"]).unwrap();
//! assert_eq!(profile[0], 1.0);
//! assert!(profile[1] < 1.0);
//! ```

pub mod element;
pub mod fingerprint;
pub mod molecule;
pub mod similarity;
pub mod smiles;
pub mod source;

mod ring;

pub use element::{element_by_number, element_by_symbol, Element};
pub use fingerprint::{morgan_fingerprint, path_fingerprint, Fingerprint};
pub use molecule::{Atom, Bond, BondOrder, Molecule};
pub use similarity::{fingerprint_all, score, similarity_profile, tanimoto};
pub use smiles::{parse_smiles, parse_smiles_named};
pub use source::{FingerprintSource, MorganSource, PathSource};
