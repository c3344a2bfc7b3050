//! Statistics for comparing similarity profiles.
//!
//! - **Alignment**: resample profiles of different lengths onto one grid
//!   ([`align::align`])
//! - **Correlation**: Pearson and Spearman estimators with typed failures
//!   ([`correlation::correlate`]) and pairwise matrices
//! - **Ranking**: averaged ranks for tied values
//! - **Distributions**: Student's t p-values via the incomplete beta function

pub mod align;
pub mod correlation;
pub mod descriptive;
pub mod distribution;
pub mod rank;

pub use align::{align, align_segmented, flatten, resample, target_length};
pub use correlation::{
    compare_profiles, correlate, pearson, spearman, AlignedComparison, CorrelationMatrix,
    CorrelationResult, Estimator,
};
