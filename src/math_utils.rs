//! Numeric helpers shared by the statistical primitives and the bootstrap.
//!
//! Order statistics (median, type-7 quantiles) and standard normal
//! distribution functions. Everything here is pure and allocation-light.

use statrs::function::erf::{erf_inv, erfc};
use std::cmp::Ordering;
use std::f64::consts::SQRT_2;

/// Quantile interpolation epsilon for numerical stability
pub(crate) const QUANTILE_EPSILON: f64 = 1e-12;

/// Safe comparison for floating point values (NaN sorts last)
pub fn float_total_cmp(a: &f64, b: &f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
    }
}

/// Median of already-sorted data (handles even length).
pub fn median_of_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        0.5 * (sorted[n / 2 - 1] + sorted[n / 2])
    }
}

/// Median of unsorted data. Empty input yields NaN.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut v = values.to_vec();
    v.sort_by(float_total_cmp);
    median_of_sorted(&v)
}

/// Arithmetic mean. Empty input yields NaN.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Interpolated quantile using the Hyndman-Fan type 7 rule.
///
/// This is the R default (`type = 7`) and numpy's default `linear` method, so
/// bootstrap intervals match what downstream tooling reports for the same draws.
///
/// # Arguments
/// * `sorted` - Sorted array of finite values
/// * `p` - Quantile in `[0, 1]`
///
/// # Returns
/// NaN for empty input, otherwise the interpolated quantile.
pub fn quantile_type7(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }

    let p = p.clamp(QUANTILE_EPSILON, 1.0 - QUANTILE_EPSILON);

    let h = p * (sorted.len() - 1) as f64;
    let h_floor = h.floor() as usize;
    let h_frac = h - h_floor as f64;

    if h_floor + 1 < sorted.len() {
        sorted[h_floor] * (1.0 - h_frac) + sorted[h_floor + 1] * h_frac
    } else {
        sorted[h_floor.min(sorted.len() - 1)]
    }
}

/// Standard normal CDF Φ(x).
///
/// Evaluated through the complementary error function so that the upper tail
/// keeps full relative precision, which matters for tiny Mann-Kendall p-values.
pub fn standard_normal_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Two-sided p-value of a standard normal statistic: `2 (1 - Φ(|z|))`.
pub fn two_sided_normal_p_value(z: f64) -> f64 {
    if z.is_nan() {
        return f64::NAN;
    }
    erfc(z.abs() / SQRT_2).clamp(0.0, 1.0)
}

/// Inverse standard normal CDF Φ⁻¹(p) for `p` in `(0, 1)`.
pub fn standard_normal_quantile(p: f64) -> f64 {
    if !(p > 0.0 && p < 1.0) {
        return f64::NAN;
    }
    SQRT_2 * erf_inv(2.0 * p - 1.0)
}
