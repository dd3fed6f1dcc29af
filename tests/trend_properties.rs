//! Behavioural properties of the trend statistics
//!
//! Each test pins one property the public API promises, independent of how
//! the primitives are implemented.

use assert_approx_eq::assert_approx_eq;
use glacier_albedo_trends::{
    bootstrap_trend, decimal_year_month, mann_kendall, mann_kendall_variance, sen_slope,
    sen_slope_with_confidence, validate, validate_pairs, BootstrapConfiguration, TrendAnalyzer,
    TrendDirection, DEFAULT_MIN_SAMPLE_SIZE,
};

#[test]
fn test_strictly_increasing_series() {
    let times: Vec<f64> = (0..12).map(|i| 2008.5 + i as f64).collect();
    let values: Vec<f64> = (0..12).map(|i| 0.2 + 0.01 * (i * i) as f64).collect();

    let mk = mann_kendall(&values, 0.05);
    assert!(mk.z > 0.0);
    assert_eq!(mk.trend, TrendDirection::Increasing);
    assert_approx_eq!(mk.tau, 1.0, 1e-12);

    let sen = sen_slope(&times, &values).unwrap();
    assert!(sen.slope > 0.0);
    assert_approx_eq!(sen.slope_per_decade, sen.slope * 10.0, 1e-12);
}

#[test]
fn test_constant_series_has_no_trend() {
    let times: Vec<f64> = (0..15).map(|i| 2001.0 + i as f64).collect();
    let values = vec![0.47; 15];

    let mk = mann_kendall(&values, 0.05);
    assert_eq!(mk.s, 0);
    assert_eq!(mk.p_value, 1.0);
    assert_eq!(mk.trend, TrendDirection::NoTrend);

    let sen = sen_slope(&times, &values).unwrap();
    assert_eq!(sen.slope, 0.0);
    assert_approx_eq!(sen.intercept, 0.47, 1e-12);
}

#[test]
fn test_ties_reduce_variance() {
    let values = [1.0, 2.0, 2.0, 3.0, 4.0];
    let mk = mann_kendall(&values, 0.05);
    assert_eq!(mk.s, 9);
    assert_approx_eq!(mann_kendall_variance(&values), 282.0 / 18.0, 1e-12);
    assert!(mann_kendall_variance(&values) < mann_kendall_variance(&[1.0, 2.0, 3.0, 4.0, 5.0]));
}

#[test]
fn test_validator_idempotence() {
    let raw = [0.41, f64::NAN, 0.44, f64::INFINITY, 0.39, 0.40, f64::NEG_INFINITY];
    let once = validate(&raw, DEFAULT_MIN_SAMPLE_SIZE);
    let twice = validate(&once.cleaned, DEFAULT_MIN_SAMPLE_SIZE);

    assert_eq!(once.n_removed, 3);
    assert_eq!(twice.cleaned, once.cleaned);
    assert_eq!(twice.is_valid, once.is_valid);
    assert_eq!(twice.n_removed, 0);
}

#[test]
fn test_bootstrap_reproducibility() {
    let times: Vec<f64> = (0..24).map(|i| 2000.5 + i as f64).collect();
    let values: Vec<f64> = (0..24)
        .map(|i| 0.6 - 0.002 * i as f64 + 0.01 * (i as f64 * 0.9).sin())
        .collect();
    let config = BootstrapConfiguration::new(500, 42);

    let a = bootstrap_trend(&times, &values, &config).unwrap();
    let b = bootstrap_trend(&times, &values, &config).unwrap();
    assert_eq!(format!("{:?}", a), format!("{:?}", b));
}

#[test]
fn test_single_observation_is_flagged_not_error() {
    let record = TrendAnalyzer::default().analyze("pure_ice", &[2012.5], &[0.51]).unwrap();
    assert!(record.error);
    assert_eq!(record.n_obs, 1);
    assert!(record.mann_kendall.p_value.is_nan());
}

#[test]
fn test_time_value_alignment() {
    let aligned = validate_pairs(&[1.0, 2.0, 3.0, 4.0], &[0.1, f64::NAN, 0.3, 0.4], 3).unwrap();
    assert_eq!(aligned.times, vec![1.0, 3.0, 4.0]);
    assert_eq!(aligned.values, vec![0.1, 0.3, 0.4]);
}

#[test]
fn test_sen_interval_is_per_decade_and_contains_estimate() {
    let times: Vec<f64> = (0..20).map(|i| 2002.5 + i as f64).collect();
    let values: Vec<f64> = (0..20)
        .map(|i| 0.58 - 0.0025 * i as f64 + 0.006 * (i as f64 * 2.7).sin())
        .collect();

    let sen = sen_slope_with_confidence(&times, &values, 0.95).unwrap();
    let ci = sen.confidence_interval.unwrap();
    assert!(ci.low_per_decade <= sen.slope_per_decade);
    assert!(sen.slope_per_decade <= ci.high_per_decade);
    // per-year bounds would sit an order of magnitude closer to zero
    assert!(ci.low_per_decade < 10.0 * sen.slope * 0.5);
}

#[test]
fn test_mid_july_maps_to_july() {
    for year in [2001.0, 2004.0, 2019.0] {
        assert_eq!(decimal_year_month(year + 196.0 / 365.25), Some(7));
        assert_eq!(decimal_year_month(year + 0.54), Some(7));
    }
}
