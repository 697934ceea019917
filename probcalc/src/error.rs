//! Errors from the textual query surface

use probcalc_core::NonsenseError;
use thiserror::Error;

pub const PARSE_ERROR: &str = "PARSE_ERROR";

/// Either the text could not be read, or it was read and made no sense
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Nonsense(#[from] NonsenseError),
}

impl QueryError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Parse(_) => PARSE_ERROR,
            Self::Nonsense(e) => e.code(),
        }
    }
}
