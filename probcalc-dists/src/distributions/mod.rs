//! Distribution families: binomial, Poisson, geometric, normal

mod binomial;
mod geometric;
mod normal;
mod poisson;

pub use binomial::Binomial;
pub use geometric::Geometric;
pub use normal::Normal;
pub use poisson::Poisson;

use crate::Query;
use probcalc_core::{numeric, NonsenseError, Result};
use serde::Serialize;
use std::fmt;

/// Shared contract of every distribution family.
///
/// `pmf` is the probability mass for discrete families and the density for
/// continuous ones; `cdf` is P(X ≤ value). With `strict` set, a value outside
/// the family's support (or a fractional value for a discrete family) is a
/// `NonsenseError`; without it, such values have probability zero.
pub trait ProbabilityDistribution: fmt::Display + Send + Sync {
    /// Family name used in error messages
    fn family(&self) -> &'static str;

    /// Whether comparisons against fractional values are meaningful
    fn allows_fractional(&self) -> bool;

    fn pmf(&self, value: f64, strict: bool) -> Result<f64>;

    fn cdf(&self, value: f64, strict: bool) -> Result<f64>;

    /// Start building an interval query against this distribution
    fn query(&self) -> Query<'_>
    where
        Self: Sized,
    {
        Query::new(self)
    }
}

/// One parameterized member of a supported family
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "family", rename_all = "lowercase")]
pub enum Distribution {
    Binomial(Binomial),
    Poisson(Poisson),
    Geometric(Geometric),
    Normal(Normal),
}

impl Distribution {
    fn inner(&self) -> &dyn ProbabilityDistribution {
        match self {
            Self::Binomial(d) => d,
            Self::Poisson(d) => d,
            Self::Geometric(d) => d,
            Self::Normal(d) => d,
        }
    }
}

impl ProbabilityDistribution for Distribution {
    fn family(&self) -> &'static str {
        self.inner().family()
    }

    fn allows_fractional(&self) -> bool {
        self.inner().allows_fractional()
    }

    fn pmf(&self, value: f64, strict: bool) -> Result<f64> {
        self.inner().pmf(value, strict)
    }

    fn cdf(&self, value: f64, strict: bool) -> Result<f64> {
        self.inner().cdf(value, strict)
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.inner(), f)
    }
}

impl From<Binomial> for Distribution {
    fn from(d: Binomial) -> Self {
        Self::Binomial(d)
    }
}

impl From<Poisson> for Distribution {
    fn from(d: Poisson) -> Self {
        Self::Poisson(d)
    }
}

impl From<Geometric> for Distribution {
    fn from(d: Geometric) -> Self {
        Self::Geometric(d)
    }
}

impl From<Normal> for Distribution {
    fn from(d: Normal) -> Self {
        Self::Normal(d)
    }
}

/// Ways a value can fall outside a discrete support
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Violation {
    AboveMaximum(u64),
    NotAnInteger,
    BelowMinimum(u64),
}

/// Check `value` against the discrete support `min..=max`.
///
/// The whole number is handed back as an `f64`: supports without a maximum
/// reach past `u64::MAX`, and a cast would saturate.
pub(crate) fn discrete_value(value: f64, min: u64, max: Option<u64>) -> std::result::Result<f64, Violation> {
    if let Some(max) = max {
        if value > max as f64 {
            return Err(Violation::AboveMaximum(max));
        }
    }
    if !numeric::is_integral(value) {
        return Err(Violation::NotAnInteger);
    }
    if value < min as f64 {
        return Err(Violation::BelowMinimum(min));
    }
    Ok(value)
}

/// Fail in strict mode, otherwise report a probability of zero
pub(crate) fn reject(error: NonsenseError, strict: bool) -> Result<f64> {
    if strict {
        Err(error)
    } else {
        Ok(0.0)
    }
}

pub(crate) fn require_finite(family: &'static str, name: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(NonsenseError::invalid_parameter(family, format!("{} must be finite, got {}", name, value)))
    }
}
