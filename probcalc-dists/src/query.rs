//! Comparison-style interval builder
//!
//! A query borrows a distribution and owns the bounds being built against
//! it. Each relational operation consumes the query and hands it back, so a
//! chain like `x.query().gt(3)?.le(12)?` accumulates one interval, the way
//! `3 < X <= 12` reads on paper. The distribution itself never holds
//! interval state, so every fresh `query()` starts from the whole support.

use crate::bounds::{Bounds, Edge};
use crate::ProbabilityDistribution;
use probcalc_core::{NonsenseError, Result};
use serde::Serialize;
use std::fmt;

/// Right-hand side of a comparison
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Operand {
    Integer(i64),
    Real(f64),
}

impl Operand {
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Integer(i) => i as f64,
            Self::Real(r) => r,
        }
    }
}

macro_rules! operand_from {
    ($variant:ident as $target:ty: $($t:ty),*) => {
        $(
            impl From<$t> for Operand {
                fn from(v: $t) -> Self {
                    Self::$variant(v as $target)
                }
            }
        )*
    };
}

operand_from!(Integer as i64: i8, i16, i32, i64, u8, u16, u32);
operand_from!(Real as f64: f32, f64);

/// An interval under construction against one distribution
#[derive(Clone, Copy)]
pub struct Query<'d> {
    distribution: &'d dyn ProbabilityDistribution,
    bounds: Bounds,
}

impl<'d> Query<'d> {
    /// A query over the whole support
    pub fn new(distribution: &'d dyn ProbabilityDistribution) -> Self {
        Self { distribution, bounds: Bounds::default() }
    }

    /// A query over an interval built in one call
    pub fn with_bounds(distribution: &'d dyn ProbabilityDistribution, bounds: Bounds) -> Self {
        Self { distribution, bounds }
    }

    pub fn distribution(&self) -> &'d dyn ProbabilityDistribution {
        self.distribution
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Reject real operands for families where only integers make sense
    fn operand(&self, operand: impl Into<Operand>) -> Result<f64> {
        let operand = operand.into();
        match operand {
            Operand::Real(value) if !self.distribution.allows_fractional() => {
                Err(NonsenseError::OperandType { family: self.distribution.family(), value })
            }
            _ => Ok(operand.as_f64()),
        }
    }

    /// X == value. Only valid as the first and only relation of a query.
    pub fn eq(mut self, value: impl Into<Operand>) -> Result<Self> {
        let value = self.operand(value)?;
        if !self.bounds.is_default() {
            return Err(NonsenseError::MixedEquality);
        }
        self.bounds.set_point(value, false);
        Ok(self)
    }

    /// X != value. Only valid as the first and only relation of a query.
    pub fn ne(mut self, value: impl Into<Operand>) -> Result<Self> {
        let value = self.operand(value)?;
        if !self.bounds.is_default() {
            return Err(NonsenseError::MixedEquality);
        }
        self.bounds.set_point(value, true);
        Ok(self)
    }

    /// X < value
    pub fn lt(mut self, value: impl Into<Operand>) -> Result<Self> {
        let value = self.operand(value)?;
        self.bounds.set_upper(Edge::exclusive(value));
        Ok(self)
    }

    /// X <= value
    pub fn le(mut self, value: impl Into<Operand>) -> Result<Self> {
        let value = self.operand(value)?;
        self.bounds.set_upper(Edge::inclusive(value));
        Ok(self)
    }

    /// X > value
    pub fn gt(mut self, value: impl Into<Operand>) -> Result<Self> {
        let value = self.operand(value)?;
        self.bounds.set_lower(Edge::exclusive(value));
        Ok(self)
    }

    /// X >= value
    pub fn ge(mut self, value: impl Into<Operand>) -> Result<Self> {
        let value = self.operand(value)?;
        self.bounds.set_lower(Edge::inclusive(value));
        Ok(self)
    }

    /// Probability of the interval built so far, without rounding
    pub fn evaluate(&self, strict: bool) -> Result<f64> {
        self.bounds.evaluate(self.distribution, strict)
    }
}

impl<'d, D: ProbabilityDistribution> From<&'d D> for Query<'d> {
    fn from(distribution: &'d D) -> Self {
        Self::new(distribution)
    }
}

impl fmt::Debug for Query<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("distribution", &self.distribution.to_string())
            .field("bounds", &self.bounds)
            .finish()
    }
}

impl fmt::Display for Query<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P({}) where X ~ {}", self.bounds, self.distribution)
    }
}
