//! Factorial helpers for the Irwin-Hall normalizer

use std::f64::consts::PI;

/// Switchover point between exact and Stirling-series log-factorial
pub const STIRLING_THRESHOLD: f64 = 20.0;

/// Iterative factorial over floats; 1.0 for `n <= 1`
///
/// Non-integer inputs multiply `n * (n-1) * ...` down to the first value <= 1.
pub fn factorial(n: f64) -> f64 {
    let mut value = 1.0;
    let mut n = n;
    while n > 1.0 {
        value *= n;
        n -= 1.0;
    }
    value
}

/// Natural log of `n!`
///
/// Exact below [`STIRLING_THRESHOLD`]; above it, Ramanujan's refinement of
/// Stirling's series, accurate to ~1e-9 relative at n = 20.
pub fn logfac(n: f64) -> f64 {
    if n < STIRLING_THRESHOLD {
        factorial(n).ln()
    } else {
        n * n.ln() - n + (n * (1.0 + 4.0 * n * (1.0 + 2.0 * n))).ln() / 6.0 + PI.ln() / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ln(19!) and ln(20!)
    const LN_FACT_19: f64 = 39.339_884_187_199_495;
    const LN_FACT_20: f64 = 42.335_616_460_753_485;

    #[test]
    fn test_factorial_small_values() {
        assert_eq!(factorial(0.0), 1.0);
        assert_eq!(factorial(1.0), 1.0);
        assert_eq!(factorial(3.0), 6.0);
        assert_eq!(factorial(10.0), 3_628_800.0);
    }

    #[test]
    fn test_factorial_negative_is_one() {
        assert_eq!(factorial(-4.0), 1.0);
    }

    #[test]
    fn test_logfac_exact_below_threshold() {
        assert!((logfac(3.0) - 6f64.ln()).abs() < 1e-12);
        assert!((logfac(19.0) - LN_FACT_19).abs() / LN_FACT_19 < 1e-12);
    }

    #[test]
    fn test_logfac_stirling_at_switchover() {
        let rel = (logfac(20.0) - LN_FACT_20).abs() / LN_FACT_20;
        assert!(rel < 1e-6, "relative error {} too large", rel);
    }

    #[test]
    fn test_logfac_stirling_matches_statrs_further_out() {
        for n in [25u64, 50, 100, 170] {
            let expected = statrs::function::factorial::ln_factorial(n);
            let rel = (logfac(n as f64) - expected).abs() / expected;
            assert!(rel < 1e-8, "n={} relative error {}", n, rel);
        }
    }
}
