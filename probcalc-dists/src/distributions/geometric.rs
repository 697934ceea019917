//! Geometric distribution: number of trials up to and including the first success

use super::{discrete_value, reject, require_finite, ProbabilityDistribution, Violation};
use probcalc_core::{NonsenseError, Result};
use serde::Serialize;
use std::fmt;

const FAMILY: &str = "Geometric";

/// Geo(p)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Geometric {
    probability: f64,
}

impl Geometric {
    /// Construct a geometric distribution with success probability in `(0, 1]`
    pub fn new(probability: f64) -> Result<Self> {
        require_finite(FAMILY, "probability", probability)?;
        if probability <= 0.0 || probability > 1.0 {
            return Err(NonsenseError::invalid_parameter(
                FAMILY,
                format!("probability must be in (0, 1], got {}", probability),
            ));
        }
        Ok(Self { probability })
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    fn trials(&self, value: f64, strict: bool) -> Result<Option<f64>> {
        let error = match discrete_value(value, 1, None) {
            Ok(k) => return Ok(Some(k)),
            Err(Violation::NotAnInteger) => NonsenseError::NotAnInteger { family: FAMILY, value },
            Err(_) => NonsenseError::out_of_support(
                value,
                format!("The first success cannot come on trial {}", value),
            ),
        };
        reject(error, strict).map(|_| None)
    }
}

impl ProbabilityDistribution for Geometric {
    fn family(&self) -> &'static str {
        FAMILY
    }

    fn allows_fractional(&self) -> bool {
        false
    }

    fn pmf(&self, value: f64, strict: bool) -> Result<f64> {
        Ok(match self.trials(value, strict)? {
            // (1-p)^(k-1) * p
            Some(k) => (1.0 - self.probability).powf(k - 1.0) * self.probability,
            None => 0.0,
        })
    }

    fn cdf(&self, value: f64, strict: bool) -> Result<f64> {
        Ok(match self.trials(value, strict)? {
            // Closed form of the sum of the PMF over 1..=k
            Some(k) => 1.0 - (1.0 - self.probability).powf(k),
            None => 0.0,
        })
    }
}

impl fmt::Display for Geometric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Geo({})", self.probability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(actual: f64, expected: f64) -> bool {
        (actual - expected).abs() <= 1e-6 * expected.abs().max(1e-12)
    }

    #[test]
    fn test_construction() {
        assert!(Geometric::new(0.2).is_ok());
        assert!(Geometric::new(1.0).is_ok());
        assert!(matches!(Geometric::new(0.0), Err(NonsenseError::InvalidParameter { .. })));
        assert!(matches!(Geometric::new(1.2), Err(NonsenseError::InvalidParameter { .. })));
    }

    #[test]
    fn test_pmf() {
        let x = Geometric::new(0.2).unwrap();
        assert!(approx(x.pmf(1.0, true).unwrap(), 0.2));
        assert!(approx(x.pmf(2.0, true).unwrap(), 0.16));
        assert!(approx(x.pmf(10.0, true).unwrap(), 0.0268435456));
        assert!(approx(x.pmf(20.0, true).unwrap(), 0.002882303762));

        let y = Geometric::new(0.56).unwrap();
        assert!(approx(y.pmf(8.0, true).unwrap(), 0.001787955734));

        let z = Geometric::new(0.34521).unwrap();
        assert!(approx(z.pmf(45.0, true).unwrap(), 2.79623102e-9));
    }

    #[test]
    fn test_cdf() {
        let x = Geometric::new(0.2).unwrap();
        assert!(approx(x.cdf(1.0, true).unwrap(), 0.2));
        assert!(approx(x.cdf(5.0, true).unwrap(), 0.67232));
        assert!(approx(x.cdf(20.0, true).unwrap(), 0.988470785));

        let z = Geometric::new(0.34521).unwrap();
        assert!(approx(z.cdf(12.0, true).unwrap(), 0.9937881));
    }

    #[test]
    fn test_closed_form_matches_sum() {
        for p in [0.2, 0.56, 0.34521, 1.0] {
            let x = Geometric::new(p).unwrap();
            let mut running = 0.0;
            for k in 1..=40 {
                running += x.pmf(k as f64, true).unwrap();
                let cdf = x.cdf(k as f64, true).unwrap();
                assert!((cdf - running).abs() < 1e-12, "Geo({}).cdf({})", p, k);
            }
        }
    }

    #[test]
    fn test_trials_beyond_u64() {
        let x = Geometric::new(0.2).unwrap();
        assert_eq!(x.pmf(1e20, true).unwrap(), 0.0);
        assert_eq!(x.cdf(1e20, true).unwrap(), 1.0);

        let certain = Geometric::new(1.0).unwrap();
        assert_eq!(certain.pmf(1e20, true).unwrap(), 0.0);
        assert_eq!(certain.cdf(1e20, true).unwrap(), 1.0);
    }

    #[test]
    fn test_invalid() {
        let x = Geometric::new(0.2).unwrap();
        for value in [0.0, -1.0, -3.0, 12.5, 22.3, -2.41, 916.02] {
            assert!(x.pmf(value, true).is_err(), "pmf({}) should fail", value);
            assert!(x.cdf(value, true).is_err(), "cdf({}) should fail", value);
            assert_eq!(x.pmf(value, false).unwrap(), 0.0);
            assert_eq!(x.cdf(value, false).unwrap(), 0.0);
        }
    }
}
