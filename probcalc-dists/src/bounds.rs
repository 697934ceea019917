//! Interval bounds and the evaluation of an interval into a probability

use crate::ProbabilityDistribution;
use probcalc_core::{NonsenseError, Result};
use serde::Serialize;
use std::fmt;
use tracing::trace;

/// One side of an interval. An unbounded edge is never inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Edge {
    value: Option<f64>,
    inclusive: bool,
}

impl Edge {
    pub const fn unbounded() -> Self {
        Self { value: None, inclusive: false }
    }

    pub const fn inclusive(value: f64) -> Self {
        Self { value: Some(value), inclusive: true }
    }

    pub const fn exclusive(value: f64) -> Self {
        Self { value: Some(value), inclusive: false }
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn is_inclusive(&self) -> bool {
        self.inclusive
    }

    pub fn is_unbounded(&self) -> bool {
        self.value.is_none()
    }
}

/// Lower and upper edges of the interval a query asks about.
///
/// The default is unbounded on both sides, i.e. the whole support.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Bounds {
    lower: Edge,
    upper: Edge,
    /// Ask for the probability of falling outside the interval instead
    complement: bool,
}

impl Bounds {
    pub fn new(lower: Edge, upper: Edge) -> Self {
        Self { lower, upper, complement: false }
    }

    pub fn lower(&self) -> Edge {
        self.lower
    }

    pub fn upper(&self) -> Edge {
        self.upper
    }

    /// Nothing has constrained this interval yet
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn set_lower(&mut self, edge: Edge) {
        self.lower = edge;
    }

    pub(crate) fn set_upper(&mut self, edge: Edge) {
        self.upper = edge;
    }

    /// Pin both edges inclusively to `value`, optionally complemented
    pub(crate) fn set_point(&mut self, value: f64, complement: bool) {
        self.lower = Edge::inclusive(value);
        self.upper = Edge::inclusive(value);
        self.complement = complement;
    }

    /// Probability that a variable distributed by `distribution` lies in
    /// this interval.
    ///
    /// CDF(v) is P(X ≤ v); subtracting PMF(v) turns it into P(X < v). The same
    /// edge arithmetic on the lower side removes P(X ≤ lower) or P(X < lower).
    /// A negative total can only come from a self-contradictory interval.
    pub fn evaluate(&self, distribution: &dyn ProbabilityDistribution, strict: bool) -> Result<f64> {
        let mut probability = 1.0;

        if let Some(upper) = self.upper.value {
            probability = distribution.cdf(upper, strict)?;
            if !self.upper.inclusive {
                probability -= distribution.pmf(upper, strict)?;
            }
        }

        if let Some(lower) = self.lower.value {
            probability -= distribution.cdf(lower, strict)?;
            if self.lower.inclusive {
                probability += distribution.pmf(lower, strict)?;
            }
        }

        if probability < 0.0 {
            return Err(NonsenseError::Contradiction { probability });
        }

        if self.complement {
            probability = 1.0 - probability;
            if probability < 0.0 {
                return Err(NonsenseError::Contradiction { probability });
            }
        }

        trace!(%distribution, bounds = %self, probability, "evaluated interval");
        Ok(probability)
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (Some(lower), Some(upper)) = (self.lower.value, self.upper.value) {
            if lower == upper && self.lower.inclusive && self.upper.inclusive {
                let op = if self.complement { "!=" } else { "==" };
                return write!(f, "X {} {}", op, lower);
            }
        }

        if self.complement {
            write!(f, "not ")?;
        }
        if let Some(lower) = self.lower.value {
            write!(f, "{} {} ", lower, if self.lower.inclusive { "<=" } else { "<" })?;
        }
        write!(f, "X")?;
        if let Some(upper) = self.upper.value {
            write!(f, " {} {}", if self.upper.inclusive { "<=" } else { "<" }, upper)?;
        }
        Ok(())
    }
}
