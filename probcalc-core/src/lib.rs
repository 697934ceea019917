//! probcalc Core - Fundamental types
//!
//! This crate provides the core types used throughout probcalc:
//! - `NonsenseError`: the single error kind for mathematical nonsense
//! - `numeric`: exact factorial/choose, the error function, and
//!   significant-figure rounding

mod error;
pub mod numeric;

pub use error::{codes, NonsenseError};

/// Result alias for operations that can produce nonsense
pub type Result<T, E = NonsenseError> = std::result::Result<T, E>;

