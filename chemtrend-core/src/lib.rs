//! Shared primitives for the chemtrend crates.
//!
//! - **Error types**: [`TrendError`] and [`Result`] used by every crate in the workspace
//! - **Traits**: small cross-crate abstractions ([`Summarizable`], [`Scored`],
//!   [`Annotated`], [`ContentAddressable`])

pub mod error;
pub mod traits;

pub use error::{Result, TrendError};
pub use traits::*;
