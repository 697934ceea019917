//! Numeric primitives
//!
//! Exact factorial and n-choose-r on arbitrary precision integers (dashu),
//! logarithms of those exact values, the error function used by the normal
//! CDF, and rounding to significant figures.

use dashu_int::ops::BitTest;
use dashu_int::UBig;
use std::f64::consts::{LN_2, PI};

/// Above this, `ln_factorial` and `ln_choose` switch from exact integers to
/// the Lanczos approximation of ln Γ. 170! is the largest factorial an f64 holds.
const EXACT_FACTORIAL_LIMIT: u64 = 170;

/// f64 carries at most 17 significant decimal digits
const MAX_SIG_FIGS: u32 = 17;

/// Return n!
pub fn factorial(n: u64) -> UBig {
    let mut acc = UBig::ONE;
    for i in 2..=n {
        acc *= UBig::from(i);
    }
    acc
}

/// Return the number of ways to choose `r` items from `n` elements.
///
/// Zero when `r > n`: there is no way to choose more items than exist.
pub fn choose(n: u64, r: u64) -> UBig {
    if r > n {
        return UBig::ZERO;
    }

    // C(n, r) == C(n, n - r); iterate over the smaller side.
    // Each partial product is itself a binomial coefficient, so the
    // division is always exact.
    let r = r.min(n - r);
    let mut acc = UBig::ONE;
    for i in 1..=r {
        acc *= UBig::from(n - r + i);
        acc = acc / UBig::from(i);
    }
    acc
}

/// Natural log of an exact non-negative integer.
///
/// Keeps the top 53 bits and accounts for the rest as a power of two, so the
/// result stays finite long after the integer itself would overflow `f64`.
pub fn ln_ubig(x: &UBig) -> f64 {
    if *x == UBig::ZERO {
        return f64::NEG_INFINITY;
    }

    let bits = x.bit_len();
    if bits <= 53 {
        return match u64::try_from(x.clone()) {
            Ok(v) => (v as f64).ln(),
            Err(_) => f64::NAN,
        };
    }

    let extra_bits = bits - 53;
    let top = x >> extra_bits;
    match u64::try_from(top) {
        Ok(v) => (v as f64).ln() + extra_bits as f64 * LN_2,
        Err(_) => f64::NAN,
    }
}

/// Natural log of n!
pub fn ln_factorial(n: u64) -> f64 {
    if n <= EXACT_FACTORIAL_LIMIT {
        ln_ubig(&factorial(n))
    } else {
        ln_gamma(n as f64 + 1.0)
    }
}

/// Natural log of C(n, r); negative infinity when `r > n`
pub fn ln_choose(n: u64, r: u64) -> f64 {
    if r > n {
        return f64::NEG_INFINITY;
    }
    if n <= EXACT_FACTORIAL_LIMIT {
        return ln_ubig(&choose(n, r));
    }
    ln_factorial(n) - ln_factorial(r) - ln_factorial(n - r)
}

/// Log-gamma via the Lanczos approximation (g = 7)
pub fn ln_gamma(x: f64) -> f64 {
    if x <= 0.0 {
        return f64::INFINITY;
    }

    const COEFFS: [f64; 8] = [
        676.5203681218851,
        -1259.1392167224028,
        771.32342877765313,
        -176.61502916214059,
        12.507343278686905,
        -0.13857109526572012,
        9.9843695780195716e-6,
        1.5056327351493116e-7,
    ];

    let g = 7.0;
    let z = x - 1.0;

    let mut sum = 0.99999999999980993;
    for (i, &c) in COEFFS.iter().enumerate() {
        sum += c / (z + i as f64 + 1.0);
    }

    let t = z + g + 0.5;
    0.5 * (2.0 * PI).ln() + (z + 0.5) * t.ln() - t + sum.ln()
}

/// Error function via Abramowitz & Stegun 7.1.26.
///
/// Maximum absolute error is about 1.5e-7. `erf(0)` is exactly zero so that
/// the normal CDF at the mean is exactly one half.
pub fn erf(x: f64) -> f64 {
    if x == 0.0 {
        return 0.0;
    }

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + 0.3275911 * x);
    let poly = t
        * (0.254829592
            + t * (-0.284496736 + t * (1.421413741 + t * (-1.453152027 + t * 1.061405429))));
    sign * (1.0 - poly * (-x * x).exp())
}

/// Round `value` to `sig_figs` significant figures.
///
/// Zero and non-finite values are returned unchanged. Rounding goes through
/// the exact decimal expansion, so a value already at `sig_figs` significant
/// figures comes back bit-for-bit identical. Asking for more than 17 figures
/// is the same as asking for 17.
pub fn round_sig_fig(value: f64, sig_figs: u32) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }

    let precision = sig_figs.clamp(1, MAX_SIG_FIGS) as usize - 1;
    format!("{:.*e}", precision, value).parse().unwrap_or(value)
}

/// True when `value` is a whole number
pub fn is_integral(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0
}
