// Irwin-Hall CDF: distribution of the sum of n independent U(0,1) draws
//
// F(x) = 1/n! * sum_{k=0}^{floor(x)} (-1)^k * C(n,k) * (x-k)^n
//
// The aggregator feeds it three times a composite rank fraction (n = 3),
// so the alternating sum stays short and well conditioned. Larger n is
// accepted; cancellation grows with n and results are clamped to [0, 1].

use crate::error::{RankError, Result};
use crate::ranking::combinatorics::logfac;
use statrs::function::factorial::binomial;

/// Number of rank criteria summed into the composite (z-score, p-value, AUC)
pub const COMPOSITE_COMPONENTS: u64 = 3;

/// Cumulative distribution of the Irwin-Hall distribution at `x`
///
/// # Errors
/// `NumericDomain` when `n == 0`, `x` is NaN, or `x` lies outside `[0, n]`.
///
/// # Example
/// ```
/// use regrank::ranking::irwin_hall_cdf;
///
/// let p = irwin_hall_cdf(1.5, 3).unwrap();
/// assert!((p - 0.5).abs() < 1e-12); // symmetric about n/2
/// ```
pub fn irwin_hall_cdf(x: f64, n: u64) -> Result<f64> {
    if n == 0 || x.is_nan() || x < 0.0 || x > n as f64 {
        return Err(RankError::NumericDomain { x, n });
    }

    let exponent = n as i32;
    let upper = x.floor() as u64;
    let mut value = 0.0;
    for k in 0..=upper {
        let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
        value += sign * binomial(n, k) * (x - k as f64).powi(exponent);
    }

    Ok((value / logfac(n as f64).exp()).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::TOLERANCE;

    #[test]
    fn test_support_endpoints() {
        for n in 1..=10 {
            assert!(irwin_hall_cdf(0.0, n).unwrap().abs() < TOLERANCE);
            assert!((irwin_hall_cdf(n as f64, n).unwrap() - 1.0).abs() < TOLERANCE);
        }
    }

    #[test]
    fn test_n_one_is_uniform() {
        for x in [0.0, 0.25, 0.5, 0.9] {
            assert!((irwin_hall_cdf(x, 1).unwrap() - x).abs() < TOLERANCE);
        }
    }

    #[test]
    fn test_n_three_closed_form_pieces() {
        // [0,1): x^3/6
        let x: f64 = 0.99;
        assert!((irwin_hall_cdf(x, 3).unwrap() - x.powi(3) / 6.0).abs() < TOLERANCE);

        // [1,2): (x^3 - 3(x-1)^3)/6
        let x: f64 = 1.98;
        let expected = (x.powi(3) - 3.0 * (x - 1.0).powi(3)) / 6.0;
        assert!((irwin_hall_cdf(x, 3).unwrap() - expected).abs() < TOLERANCE);
    }

    #[test]
    fn test_non_decreasing_dense_grid() {
        let mut previous = 0.0;
        for i in 0..=3000 {
            let x = i as f64 / 1000.0;
            let p = irwin_hall_cdf(x, 3).unwrap();
            assert!(p + TOLERANCE >= previous, "decrease at x={}", x);
            previous = p;
        }
    }

    #[test]
    fn test_rejects_outside_support() {
        assert!(matches!(
            irwin_hall_cdf(-0.01, 3),
            Err(RankError::NumericDomain { .. })
        ));
        assert!(matches!(
            irwin_hall_cdf(3.01, 3),
            Err(RankError::NumericDomain { .. })
        ));
        assert!(irwin_hall_cdf(f64::NAN, 3).is_err());
        assert!(irwin_hall_cdf(0.0, 0).is_err());
    }
}
