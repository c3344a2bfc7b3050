//! Structured error types for similarity scoring and trend correlation.

use thiserror::Error;

/// Unified error type for all chemtrend operations.
#[derive(Debug, Error)]
pub enum TrendError {
    /// I/O error while reading configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed molecule representation (SMILES).
    #[error("parse error: {0}")]
    Parse(String),

    /// A profile too short to interpolate (fewer than 2 points).
    #[error("degenerate profile: cannot interpolate a profile of length {len}")]
    DegenerateProfile { len: usize },

    /// Two sequences that must be paired have different lengths.
    #[error("length mismatch: {left} vs {right} observations")]
    LengthMismatch { left: usize, right: usize },

    /// A correlation is undefined for the input (constant or too short).
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// Estimator name outside the supported set.
    #[error("unsupported estimator '{0}' (expected \"pearson\" or \"spearman\")")]
    UnsupportedEstimator(String),

    /// Invalid input (empty collections, mismatched labels).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Configuration could not be decoded or holds out-of-range values.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience alias used throughout the chemtrend crates.
pub type Result<T> = std::result::Result<T, TrendError>;
