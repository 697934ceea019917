//! Mathematical nonsense
//!
//! Every domain-level failure in probcalc is a `NonsenseError`: a parameter
//! that doesn't make sense for a family, a value outside a distribution's
//! support, or an interval that contradicts itself. Each variant carries a
//! stable machine-readable code alongside its human-readable message.

use serde::Serialize;
use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const INVALID_PARAMETER: &str = "INVALID_PARAMETER";
    pub const OUT_OF_SUPPORT: &str = "OUT_OF_SUPPORT";
    pub const NOT_AN_INTEGER: &str = "NOT_AN_INTEGER";
    pub const OPERAND_TYPE: &str = "OPERAND_TYPE";
    pub const MIXED_EQUALITY: &str = "MIXED_EQUALITY";
    pub const CONTRADICTION: &str = "CONTRADICTION";
    pub const INVALID_SIG_FIGS: &str = "INVALID_SIG_FIGS";
}

/// Error representing mathematical nonsense.
///
/// This could be a probability that doesn't make sense, getting more
/// successes than trials, or an inequality that can never hold.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NonsenseError {
    /// A distribution was constructed with an out-of-range parameter
    #[error("{family} {reason}")]
    InvalidParameter { family: &'static str, reason: String },

    /// A strict PMF/CDF query asked about a value the distribution can't take
    #[error("{reason}")]
    OutOfSupport { value: f64, reason: String },

    /// A strict PMF/CDF query passed a fractional value to a discrete family
    #[error("Cannot ask probability of {value} for the {family} distribution")]
    NotAnInteger { family: &'static str, value: f64 },

    /// A real operand was compared against a discrete family
    #[error("The {family} distribution can only be compared with integers, got {value}")]
    OperandType { family: &'static str, value: f64 },

    /// An equality was combined with an inequality in the same query
    #[error("Cannot combine an equality with an inequality in one query")]
    MixedEquality,

    /// The interval evaluated to a negative probability
    #[error("This inequality doesn't make sense (evaluated to {probability})")]
    Contradiction { probability: f64 },

    /// Results must be rounded to at least one significant figure
    #[error("Cannot round to {requested} significant figures")]
    InvalidSigFigs { requested: u32 },
}

impl NonsenseError {
    pub fn invalid_parameter(family: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter { family, reason: reason.into() }
    }

    pub fn out_of_support(value: f64, reason: impl Into<String>) -> Self {
        Self::OutOfSupport { value, reason: reason.into() }
    }

    /// Machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidParameter { .. } => codes::INVALID_PARAMETER,
            Self::OutOfSupport { .. } => codes::OUT_OF_SUPPORT,
            Self::NotAnInteger { .. } => codes::NOT_AN_INTEGER,
            Self::OperandType { .. } => codes::OPERAND_TYPE,
            Self::MixedEquality => codes::MIXED_EQUALITY,
            Self::Contradiction { .. } => codes::CONTRADICTION,
            Self::InvalidSigFigs { .. } => codes::INVALID_SIG_FIGS,
        }
    }
}
