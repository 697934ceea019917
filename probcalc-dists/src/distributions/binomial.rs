//! Binomial distribution: successes in a fixed number of independent trials

use super::{discrete_value, reject, require_finite, ProbabilityDistribution, Violation};
use probcalc_core::numeric::ln_choose;
use probcalc_core::{NonsenseError, Result};
use serde::Serialize;
use std::fmt;

const FAMILY: &str = "Binomial";

/// B(n, p)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Binomial {
    trials: u64,
    probability: f64,
}

impl Binomial {
    /// Construct a binomial distribution from a number of trials and a
    /// probability of success in `[0, 1]`.
    pub fn new(trials: u64, probability: f64) -> Result<Self> {
        require_finite(FAMILY, "probability", probability)?;
        if !(0.0..=1.0).contains(&probability) {
            return Err(NonsenseError::invalid_parameter(
                FAMILY,
                format!("probability must be between 0 and 1, got {}", probability),
            ));
        }
        Ok(Self { trials, probability })
    }

    pub fn trials(&self) -> u64 {
        self.trials
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    fn successes(&self, value: f64, strict: bool) -> Result<Option<u64>> {
        let error = match discrete_value(value, 0, Some(self.trials)) {
            // At most `trials`, so the cast is exact
            Ok(k) => return Ok(Some(k as u64)),
            Err(Violation::AboveMaximum(n)) => NonsenseError::out_of_support(
                value,
                format!("Cannot have more successes ({}) than trials ({})", value, n),
            ),
            Err(Violation::NotAnInteger) => NonsenseError::NotAnInteger { family: FAMILY, value },
            Err(Violation::BelowMinimum(_)) => {
                NonsenseError::out_of_support(value, format!("Cannot have {} successes", value))
            }
        };
        reject(error, strict).map(|_| None)
    }

    /// P(X = k) for a k already known to be in 0..=n
    fn mass(&self, k: u64) -> f64 {
        let n = self.trials;
        let p = self.probability;

        if p == 0.0 {
            return if k == 0 { 1.0 } else { 0.0 };
        }
        if p == 1.0 {
            return if k == n { 1.0 } else { 0.0 };
        }

        // PMF = C(n,k) * p^k * (1-p)^(n-k), in log space so large n
        // doesn't overflow the coefficient or underflow the powers
        let log_prob = ln_choose(n, k) + (k as f64) * p.ln() + ((n - k) as f64) * (1.0 - p).ln();
        log_prob.exp()
    }
}

impl ProbabilityDistribution for Binomial {
    fn family(&self) -> &'static str {
        FAMILY
    }

    fn allows_fractional(&self) -> bool {
        false
    }

    fn pmf(&self, value: f64, strict: bool) -> Result<f64> {
        Ok(match self.successes(value, strict)? {
            Some(k) => self.mass(k),
            None => 0.0,
        })
    }

    fn cdf(&self, value: f64, strict: bool) -> Result<f64> {
        let k = match self.successes(value, strict)? {
            Some(k) => k,
            None => return Ok(0.0),
        };

        // Every outcome is at most n
        if k >= self.trials {
            return Ok(1.0);
        }

        let mut cdf = 0.0;
        for i in 0..=k {
            cdf += self.pmf(i as f64, false)?;
        }
        Ok(cdf)
    }
}

impl fmt::Display for Binomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B({}, {})", self.trials, self.probability)
    }
}
