//! probcalc - Calculate probabilities for distributions
//!
//! ```
//! use probcalc::{Binomial, ProbabilityCalculator, ProbabilityDistribution};
//!
//! let x = Binomial::new(20, 0.25)?;
//! let calc = ProbabilityCalculator::new().with_sig_figs(4)?;
//! assert_eq!(calc.calculate(x.query().gt(10)?)?, 0.003942);
//! # Ok::<(), probcalc::NonsenseError>(())
//! ```

mod error;
mod parser;

pub use error::{QueryError, PARSE_ERROR};
pub use parser::{parse_distribution, parse_query};
pub use probcalc_core::{codes, NonsenseError, Result};
pub use probcalc_dists::{
    Binomial, Bounds, Distribution, Edge, Geometric, Normal, Operand, Poisson, ProbabilityDistribution, Query,
};

use probcalc_core::numeric::round_sig_fig;
use serde::Serialize;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::debug;

pub const DEFAULT_SIG_FIGS: u32 = 10;

static SIG_FIGS: AtomicU32 = AtomicU32::new(DEFAULT_SIG_FIGS);

fn check_sig_figs(sig_figs: u32) -> Result<u32> {
    if sig_figs == 0 {
        return Err(NonsenseError::InvalidSigFigs { requested: sig_figs });
    }
    Ok(sig_figs)
}

/// Change the significant figures used by [`calculate_probability`] and
/// [`Calculation::evaluate`] everywhere in the process
pub fn set_sig_figs(sig_figs: u32) -> Result<()> {
    let sig_figs = check_sig_figs(sig_figs)?;
    let previous = SIG_FIGS.swap(sig_figs, Ordering::SeqCst);
    debug!(previous, sig_figs, "changed significant figures");
    Ok(())
}

/// Current process-wide significant figures
pub fn sig_figs() -> u32 {
    SIG_FIGS.load(Ordering::SeqCst)
}

/// Evaluate a query strictly and round it to the process-wide significant figures
pub fn calculate_probability<'d>(query: impl Into<Query<'d>>) -> Result<f64> {
    ProbabilityCalculator { sig_figs: sig_figs() }.calculate(query)
}

/// Query entry point with its own rounding setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbabilityCalculator {
    sig_figs: u32,
}

impl ProbabilityCalculator {
    pub fn new() -> Self {
        Self { sig_figs: DEFAULT_SIG_FIGS }
    }

    pub fn with_sig_figs(mut self, sig_figs: u32) -> Result<Self> {
        self.sig_figs = check_sig_figs(sig_figs)?;
        Ok(self)
    }

    pub fn set_sig_figs(&mut self, sig_figs: u32) -> Result<()> {
        self.sig_figs = check_sig_figs(sig_figs)?;
        Ok(())
    }

    pub fn sig_figs(&self) -> u32 {
        self.sig_figs
    }

    /// Evaluate `query` with strict validation and round the result.
    ///
    /// A bare distribution reference is a query over its whole support.
    pub fn calculate<'d>(&self, query: impl Into<Query<'d>>) -> Result<f64> {
        let query = query.into();
        let raw = query.evaluate(true)?;
        let probability = round_sig_fig(raw, self.sig_figs);
        debug!(
            distribution = %query.distribution(),
            bounds = %query.bounds(),
            raw,
            probability,
            sig_figs = self.sig_figs,
            "calculated probability"
        );
        Ok(probability)
    }

    /// Parse a distribution and a comparison chain, then calculate
    pub fn evaluate_text(&self, distribution: &str, query: &str) -> std::result::Result<Calculation, QueryError> {
        let distribution = parse_distribution(distribution)?;
        let parsed = parse_query(query, &distribution)?;
        let bounds = parsed.bounds().to_string();
        let probability = self.calculate(parsed)?;
        Ok(Calculation { distribution, bounds, probability })
    }
}

impl Default for ProbabilityCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// A probability calculated from text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Calculation {
    pub distribution: Distribution,
    /// The interval as it was understood
    pub bounds: String,
    pub probability: f64,
}

impl Calculation {
    /// Parse and calculate using the process-wide significant figures
    pub fn evaluate(distribution: &str, query: &str) -> std::result::Result<Self, QueryError> {
        ProbabilityCalculator { sig_figs: sig_figs() }.evaluate_text(distribution, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calc(sig_figs: u32) -> ProbabilityCalculator {
        ProbabilityCalculator::new().with_sig_figs(sig_figs).unwrap()
    }

    #[test]
    fn test_default_sig_figs() {
        assert_eq!(ProbabilityCalculator::new().sig_figs(), DEFAULT_SIG_FIGS);
        assert_eq!(ProbabilityCalculator::default(), ProbabilityCalculator::new());
    }

    #[test]
    fn test_zero_sig_figs_rejected() {
        assert!(matches!(
            ProbabilityCalculator::new().with_sig_figs(0),
            Err(NonsenseError::InvalidSigFigs { requested: 0 })
        ));
        let mut calc = ProbabilityCalculator::new();
        assert!(calc.set_sig_figs(0).is_err());
        assert_eq!(calc.sig_figs(), DEFAULT_SIG_FIGS);
        assert!(set_sig_figs(0).is_err());
    }

    #[test]
    fn test_binomial_sig_figs() {
        let x = Binomial::new(20, 0.25).unwrap();

        let c = calc(10);
        assert_eq!(c.calculate(x.query().gt(10).unwrap()).unwrap(), 0.003942141664);
        assert_eq!(c.calculate(x.query().lt(5).unwrap()).unwrap(), 0.4148415025);
        assert_eq!(c.calculate(x.query().ge(2).unwrap().lt(6).unwrap()).unwrap(), 0.5928600295);

        let c = calc(6);
        assert_eq!(c.calculate(x.query().gt(10).unwrap()).unwrap(), 0.00394214);
        assert_eq!(c.calculate(x.query().lt(5).unwrap()).unwrap(), 0.414842);
        assert_eq!(c.calculate(x.query().ge(2).unwrap().lt(6).unwrap()).unwrap(), 0.59286);

        let c = calc(4);
        assert_eq!(c.calculate(x.query().gt(10).unwrap()).unwrap(), 0.003942);
        assert_eq!(c.calculate(x.query().lt(5).unwrap()).unwrap(), 0.4148);
        assert_eq!(c.calculate(x.query().ge(2).unwrap().lt(6).unwrap()).unwrap(), 0.5929);
    }

    #[test]
    fn test_poisson_sig_figs() {
        let y = Poisson::new(12.3).unwrap();

        let c = calc(10);
        assert_eq!(c.calculate(y.query().gt(10).unwrap()).unwrap(), 0.6834172813);
        assert_eq!(c.calculate(y.query().lt(5).unwrap()).unwrap(), 0.006157526342);
        assert_eq!(c.calculate(y.query().ge(2).unwrap().lt(6).unwrap()).unwrap(), 0.01677578152);

        let c = calc(6);
        assert_eq!(c.calculate(y.query().gt(10).unwrap()).unwrap(), 0.683417);
        assert_eq!(c.calculate(y.query().lt(5).unwrap()).unwrap(), 0.00615753);
        assert_eq!(c.calculate(y.query().ge(2).unwrap().lt(6).unwrap()).unwrap(), 0.0167758);

        let c = calc(4);
        assert_eq!(c.calculate(y.query().gt(10).unwrap()).unwrap(), 0.6834);
        assert_eq!(c.calculate(y.query().lt(5).unwrap()).unwrap(), 0.006158);
        assert_eq!(c.calculate(y.query().ge(2).unwrap().lt(6).unwrap()).unwrap(), 0.01678);
    }

    #[test]
    fn test_normal_scenarios() {
        // Normal CDFs go through an erf approximation good to about 1.5e-7,
        // so calculator values are only matched to that tolerance.
        const TOLERANCE: f64 = 1.5e-7;
        let z = Normal::new(-3.9, 1.6).unwrap();
        let c = calc(10);

        assert_eq!(c.calculate(z.query().gt(10).unwrap()).unwrap(), 0.0);

        // The exclusive edge also drops the density at 5, about 4.8e-8
        let below = c.calculate(z.query().lt(5).unwrap()).unwrap();
        assert!((below - 0.9999999867).abs() < TOLERANCE);
        assert_eq!(calc(6).calculate(z.query().lt(5).unwrap()).unwrap(), 1.0);

        // 2 <= Z < 6: the CDF difference matches the calculator, and the
        // inclusive lower edge adds the density at 2 on top of it
        let cdf_only = z.cdf(6.0, true).unwrap() - z.cdf(2.0, true).unwrap();
        assert!((cdf_only - 0.0001132337412).abs() < TOLERANCE);
        let between = c.calculate(z.query().ge(2).unwrap().lt(6).unwrap()).unwrap();
        let density = z.pmf(2.0, true).unwrap() - z.pmf(6.0, true).unwrap();
        assert!((between - (cdf_only + density)).abs() < 1e-12);
    }

    #[test]
    fn test_huge_sig_figs() {
        let x = Binomial::new(20, 0.25).unwrap();
        let c = ProbabilityCalculator::new().with_sig_figs(u32::MAX).unwrap();
        let raw = x.query().gt(10).unwrap().evaluate(true).unwrap();
        assert_eq!(c.calculate(x.query().gt(10).unwrap()).unwrap(), raw);
    }

    #[test]
    fn test_rounding_idempotent() {
        let x = Geometric::new(0.34521).unwrap();
        let c = calc(5);
        let once = c.calculate(x.query().gt(3).unwrap().le(12).unwrap()).unwrap();
        assert_eq!(round_sig_fig(once, 5), once);
    }

    #[test]
    fn test_whole_support() {
        let x = Binomial::new(20, 0.25).unwrap();
        assert_eq!(calc(10).calculate(&x).unwrap(), 1.0);

        let dist: Distribution = Normal::new(2.0, 0.5).unwrap().into();
        assert_eq!(calc(10).calculate(&dist).unwrap(), 1.0);
    }

    #[test]
    fn test_errors_propagate() {
        let x = Geometric::new(0.2).unwrap();
        let c = calc(10);
        assert!(matches!(
            c.calculate(x.query().gt(10).unwrap().le(8).unwrap()),
            Err(NonsenseError::Contradiction { .. })
        ));
        assert!(matches!(c.calculate(x.query().le(0).unwrap()), Err(NonsenseError::OutOfSupport { .. })));
        assert_eq!(c.calculate(x.query().le(1).unwrap()).unwrap(), 0.2);
    }

    #[test]
    fn test_evaluate_text() {
        let calculation = calc(4).evaluate_text("B(20, 0.25)", "2 <= X < 6").unwrap();
        assert_eq!(calculation.probability, 0.5929);
        assert_eq!(calculation.bounds, "2 <= X < 6");
        assert_eq!(calculation.distribution.to_string(), "B(20, 0.25)");

        assert!(matches!(calc(4).evaluate_text("B(20, 0.25)", "X <"), Err(QueryError::Parse(_))));
        assert!(matches!(
            calc(4).evaluate_text("B(20, 0.25)", "10 < X == 3"),
            Err(QueryError::Nonsense(NonsenseError::MixedEquality))
        ));
    }

    // The only test that touches the process-wide setting, so parallel
    // tests never observe a changed value.
    #[test]
    fn test_process_wide_sig_figs() {
        let x = Binomial::new(20, 0.25).unwrap();
        assert_eq!(sig_figs(), DEFAULT_SIG_FIGS);
        assert_eq!(calculate_probability(x.query().gt(10).unwrap()).unwrap(), 0.003942141664);

        set_sig_figs(6).unwrap();
        assert_eq!(sig_figs(), 6);
        assert_eq!(calculate_probability(x.query().gt(10).unwrap()).unwrap(), 0.00394214);
        assert_eq!(Calculation::evaluate("B(20, 0.25)", "X < 5").unwrap().probability, 0.414842);

        set_sig_figs(DEFAULT_SIG_FIGS).unwrap();
        assert_eq!(calculate_probability(&x).unwrap(), 1.0);
    }
}
