//! Poisson distribution: number of events at a constant average rate

use super::{discrete_value, reject, require_finite, ProbabilityDistribution, Violation};
use probcalc_core::numeric::{ln_factorial, ln_gamma};
use probcalc_core::{NonsenseError, Result};
use serde::Serialize;
use std::fmt;

const FAMILY: &str = "Poisson";

/// Po(λ)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Poisson {
    rate: f64,
}

impl Poisson {
    /// Construct a Poisson distribution with rate λ > 0
    pub fn new(rate: f64) -> Result<Self> {
        require_finite(FAMILY, "rate", rate)?;
        if rate <= 0.0 {
            return Err(NonsenseError::invalid_parameter(
                FAMILY,
                format!("rate must be positive, got {}", rate),
            ));
        }
        Ok(Self { rate })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    fn events(&self, value: f64, strict: bool) -> Result<Option<f64>> {
        let error = match discrete_value(value, 0, None) {
            Ok(k) => return Ok(Some(k)),
            Err(Violation::NotAnInteger) => NonsenseError::NotAnInteger { family: FAMILY, value },
            Err(_) => NonsenseError::out_of_support(value, format!("Cannot have {} events", value)),
        };
        reject(error, strict).map(|_| None)
    }

    fn mass(&self, k: f64) -> f64 {
        // Counts beyond u32 only come from far in the tail
        let ln_k_factorial = if k <= u32::MAX as f64 {
            ln_factorial(k as u64)
        } else {
            ln_gamma(k + 1.0)
        };

        // PMF = e^(-λ) * λ^k / k!
        // log(PMF) = k*log(λ) - λ - log(k!)
        let log_prob = k * self.rate.ln() - self.rate - ln_k_factorial;
        log_prob.exp()
    }
}

impl ProbabilityDistribution for Poisson {
    fn family(&self) -> &'static str {
        FAMILY
    }

    fn allows_fractional(&self) -> bool {
        false
    }

    fn pmf(&self, value: f64, strict: bool) -> Result<f64> {
        Ok(match self.events(value, strict)? {
            Some(k) => self.mass(k),
            None => 0.0,
        })
    }

    fn cdf(&self, value: f64, strict: bool) -> Result<f64> {
        let k = match self.events(value, strict)? {
            Some(k) => k,
            None => return Ok(0.0),
        };

        let mut cdf = 0.0;
        let mut i = 0.0;
        while i <= k {
            let term = self.pmf(i, false)?;
            // Past the mode the terms only shrink; once one underflows the
            // rest of the sum is exactly zero.
            if term == 0.0 && i > self.rate {
                break;
            }
            cdf += term;
            i += 1.0;
        }
        Ok(cdf)
    }
}

impl fmt::Display for Poisson {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Po({})", self.rate)
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
        assert!(Poisson::new(2.0).is_ok());
        assert!(matches!(Poisson::new(0.0), Err(NonsenseError::InvalidParameter { .. })));
        assert!(matches!(Poisson::new(-1.0), Err(NonsenseError::InvalidParameter { .. })));
        assert!(matches!(Poisson::new(f64::INFINITY), Err(NonsenseError::InvalidParameter { .. })));
    }

    #[test]
    fn test_pmf() {
        let x = Poisson::new(2.0).unwrap();
        assert!(approx(x.pmf(0.0, true).unwrap(), 0.1353352832));
        assert!(approx(x.pmf(1.0, true).unwrap(), 0.2706705665));
        assert!(approx(x.pmf(2.0, true).unwrap(), 0.2706705665));
        assert!(approx(x.pmf(5.0, true).unwrap(), 0.03608940886));
        assert!(approx(x.pmf(20.0, true).unwrap(), 5.832924198e-14));

        let y = Poisson::new(12.3).unwrap();
        assert!(approx(y.pmf(0.0, true).unwrap(), 4.551744463e-6));
        assert!(approx(y.pmf(10.0, true).unwrap(), 0.09941821344));

        let z = Poisson::new(8.362).unwrap();
        assert!(approx(z.pmf(20.0, true).unwrap(), 2.682305189e-4));
    }

    #[test]
    fn test_pmf_large_rate() {
        let w = Poisson::new(1000.0).unwrap();
        assert!(w.pmf(100.0, true).unwrap() < 1e-100);
        assert!(approx(w.pmf(500.0, true).unwrap(), 4.160155476e-69));
        assert!(approx(w.pmf(900.0, true).unwrap(), 7.516954352e-5));
    }

    #[test]
    fn test_pmf_invalid() {
        let x = Poisson::new(2.0).unwrap();
        assert!(matches!(x.pmf(-1.0, true), Err(NonsenseError::OutOfSupport { .. })));
        assert!(matches!(x.pmf(2.3, true), Err(NonsenseError::NotAnInteger { .. })));
        assert_eq!(x.pmf(-1.0, false).unwrap(), 0.0);
        assert_eq!(x.pmf(2.3, false).unwrap(), 0.0);
    }

    #[test]
    fn test_cdf() {
        let x = Poisson::new(2.0).unwrap();
        assert!(approx(x.cdf(0.0, true).unwrap(), 0.1353352832));
        assert!(approx(x.cdf(3.0, true).unwrap(), 0.8571234644));
        assert!(approx(x.cdf(10.0, true).unwrap(), 0.9999916918));
        assert!((x.cdf(20.0, true).unwrap() - 1.0).abs() < 1e-12);

        let y = Poisson::new(12.3).unwrap();
        assert!(approx(y.cdf(10.0, true).unwrap(), 0.3165827187));

        let w = Poisson::new(1000.0).unwrap();
        assert!(approx(w.cdf(900.0, true).unwrap(), 6.977673278e-4));

        assert!(x.cdf(-1.0, true).is_err());
        assert!(x.cdf(2.3, true).is_err());
        assert_eq!(x.cdf(2.3, false).unwrap(), 0.0);
    }

    #[test]
    fn test_normalization() {
        let x = Poisson::new(8.362).unwrap();
        let total: f64 = (0..200).map(|k| x.pmf(k as f64, true).unwrap()).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_counts_beyond_u64() {
        let x = Poisson::new(2.0).unwrap();
        assert_eq!(x.pmf(1e20, true).unwrap(), 0.0);
        assert_eq!(x.pmf(1.8446744073709552e19, true).unwrap(), 0.0);
        assert!((x.cdf(1e20, true).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cdf_far_tail_terminates() {
        let x = Poisson::new(2.0).unwrap();
        let cdf = x.cdf(1e12, true).unwrap();
        assert!((cdf - 1.0).abs() < 1e-12);
    }
}
