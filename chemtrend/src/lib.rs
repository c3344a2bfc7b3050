//! Compare evolution-of-similarity trends across drug-discovery case studies.
//!
//! Each [`CaseStudy`] is an ordered SMILES series whose first member is the
//! reference compound. Its similarity profile (Tanimoto similarity of every
//! step to the reference) is resampled to a common length, and the aligned
//! profiles of all studies are correlated pairwise.
//!
//! # Example
//!
//! ```
//! use chemtrend::{compare_case_studies, AnalysisConfig, CaseStudy};
//!
//! let studies = [
//!     CaseStudy::new("a", ["c1ccccc1O", "c1ccc(cc1)OC", "c1ccc(cc1)OCC(=O)O"]),
//!     CaseStudy::new("b", ["CCO", "CCCO", "CCCCO", "CCCCCO", "CCCCCCO"]),
//! ];
//! let report = compare_case_studies(&studies, &AnalysisConfig::default()).unwrap();
//! assert_eq!(report.target_length, 4);
//! assert_eq!(report.comparisons.len(), 1);
//! ```
//!
//! The pipeline emits `tracing` events; install a subscriber to see them.

pub mod case_study;
pub mod compare;
pub mod config;

pub use case_study::CaseStudy;
pub use compare::{compare_case_studies, compare_profiles_named, PairComparison, TrendReport};
pub use config::{AnalysisConfig, FingerprintConfig};

pub use chemtrend_chem::{FingerprintSource, MorganSource, PathSource};
pub use chemtrend_core::{Result, TrendError};
pub use chemtrend_stats::{CorrelationResult, Estimator};
