//! probcalc-dists: distribution families and interval queries
//!
//! Every family implements [`ProbabilityDistribution`]. Intervals are built
//! with [`Query`], whose comparison methods set the edges of a [`Bounds`]:
//!
//! ```
//! use probcalc_dists::{Binomial, ProbabilityDistribution};
//!
//! let x = Binomial::new(20, 0.25)?;
//! let p = x.query().gt(3)?.le(12)?.evaluate(true)?;
//! assert!(p > 0.77 && p < 0.78);
//! # Ok::<(), probcalc_core::NonsenseError>(())
//! ```

mod bounds;
pub mod distributions;
mod query;

pub use bounds::{Bounds, Edge};
pub use distributions::{Binomial, Distribution, Geometric, Normal, Poisson, ProbabilityDistribution};
pub use query::{Operand, Query};
