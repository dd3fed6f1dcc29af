//! Bootstrap uncertainty for Mann-Kendall / Sen's slope trends.
//!
//! Each iteration resamples the cleaned (time, value) pairs with replacement,
//! reruns the Mann-Kendall test and Sen's slope on the resample, and records the
//! p-value and the decadal slope. Percentile intervals of the recorded slopes
//! describe the uncertainty of the trend magnitude; the share of resamples with
//! `p < alpha` describes how robust the significance call is.
//!
//! Runs are reproducible: iteration `i` draws from a ChaCha20 stream seeded with
//! `seed_base + i`, independent of every other iteration.

pub use crate::bootstrap_config::{validate_bootstrap_config, BootstrapConfiguration};
pub use crate::results::BootstrapResult;

use crate::{
    bootstrap_config::{CI_LOWER_PERCENTILE, CI_UPPER_PERCENTILE},
    bootstrap_sampling::PairedResample,
    errors::TrendResult,
    math_utils::{float_total_cmp, mean, quantile_type7},
    preprocessing::{validate_pairs, DEFAULT_MIN_SAMPLE_SIZE},
    rng::ResamplingRng,
    statistical_tests::{mann_kendall, sen_slope},
};
use log::{debug, trace, warn};

/// Raw per-iteration outputs before aggregation.
#[derive(Debug, Default)]
struct BootstrapDraws {
    slopes_per_decade: Vec<f64>,
    p_values: Vec<f64>,
    skipped_short: usize,
    skipped_undefined: usize,
}

/// Bootstrap the trend of a (time, value) series.
///
/// The input is aligned and cleaned first; with fewer than three clean points
/// the result is flagged (`error = true`) rather than returned as `Err`.
///
/// # Arguments
/// * `times` - Decimal-year time stamps
/// * `values` - Observations aligned with `times` (NaN allowed)
/// * `config` - Iterations, seed and significance level
///
/// # Errors
/// `InvalidParameter` for an invalid configuration, `LengthMismatch` when
/// the slices differ in length.
///
/// # Example
/// ```rust
/// use glacier_albedo_trends::bootstrap::{bootstrap_trend, BootstrapConfiguration};
///
/// let times: Vec<f64> = (0..20).map(|i| 2001.5 + i as f64).collect();
/// let values: Vec<f64> = times
///     .iter()
///     .enumerate()
///     .map(|(i, t)| 0.65 - 0.004 * (t - 2001.5) + if i % 2 == 0 { 0.003 } else { -0.003 })
///     .collect();
///
/// let result = bootstrap_trend(&times, &values, &BootstrapConfiguration::new(200, 42)).unwrap();
/// assert!(!result.error);
/// assert!(result.slope_ci_high < 0.0);
/// ```
pub fn bootstrap_trend(
    times: &[f64],
    values: &[f64],
    config: &BootstrapConfiguration,
) -> TrendResult<BootstrapResult> {
    validate_bootstrap_config(config)?;
    let aligned = validate_pairs(times, values, DEFAULT_MIN_SAMPLE_SIZE)?;

    trace!(
        "bootstrap initialized: n={}, iterations={}, seed_base={}",
        aligned.len(),
        config.num_iterations,
        config.seed_base
    );

    if !aligned.is_valid {
        debug!(
            "bootstrap skipped: {} clean observations, need {}",
            aligned.len(),
            DEFAULT_MIN_SAMPLE_SIZE
        );
        return Ok(BootstrapResult::failed(
            config.num_iterations,
            config.seed_base,
            config.alpha,
        ));
    }

    trace!("bootstrap resampling");
    let draws = resample_iterations(&aligned.times, &aligned.values, config)?;

    if draws.skipped_short > 0 || draws.skipped_undefined > 0 {
        debug!(
            "bootstrap skipped {} short and {} undefined slope iterations of {}",
            draws.skipped_short, draws.skipped_undefined, config.num_iterations
        );
    }

    trace!("bootstrap aggregating");
    let result = aggregate(draws, config);
    if result.error {
        warn!(
            "bootstrap produced no usable slope in {} iterations (seed_base={})",
            config.num_iterations, config.seed_base
        );
    }

    trace!("bootstrap done: n_successful={}", result.n_successful);
    Ok(result)
}

fn resample_iterations(
    times: &[f64],
    values: &[f64],
    config: &BootstrapConfiguration,
) -> TrendResult<BootstrapDraws> {
    let mut draws = BootstrapDraws {
        slopes_per_decade: Vec::with_capacity(config.num_iterations),
        p_values: Vec::with_capacity(config.num_iterations),
        ..Default::default()
    };
    let mut sample = PairedResample::with_capacity(values.len());

    for i in 0..config.num_iterations {
        let mut rng = ResamplingRng::for_iteration(config.seed_base, i);
        sample.draw(times, values, &mut rng)?;

        let mk = mann_kendall(sample.values(), config.alpha);
        draws.p_values.push(mk.p_value);

        if sample.len() < config.min_slope_points {
            draws.skipped_short += 1;
            continue;
        }

        let sen = sen_slope(sample.times(), sample.values())?;
        if sen.slope_per_decade.is_finite() {
            draws.slopes_per_decade.push(sen.slope_per_decade);
        } else {
            draws.skipped_undefined += 1;
        }
    }

    Ok(draws)
}

fn aggregate(draws: BootstrapDraws, config: &BootstrapConfiguration) -> BootstrapResult {
    let BootstrapDraws {
        mut slopes_per_decade,
        p_values,
        ..
    } = draws;

    let significant = p_values.iter().filter(|&&p| p < config.alpha).count();
    let mut sorted_p: Vec<f64> = p_values.into_iter().filter(|p| p.is_finite()).collect();
    sorted_p.sort_by(float_total_cmp);
    slopes_per_decade.sort_by(float_total_cmp);

    let n_successful = slopes_per_decade.len();
    BootstrapResult {
        n_requested: config.num_iterations,
        n_successful,
        slope_median: quantile_type7(&slopes_per_decade, 0.5),
        slope_ci_low: quantile_type7(&slopes_per_decade, CI_LOWER_PERCENTILE),
        slope_ci_high: quantile_type7(&slopes_per_decade, CI_UPPER_PERCENTILE),
        pvalue_mean: mean(&sorted_p),
        pvalue_ci_low: quantile_type7(&sorted_p, CI_LOWER_PERCENTILE),
        pvalue_ci_high: quantile_type7(&sorted_p, CI_UPPER_PERCENTILE),
        significant_proportion: significant as f64 / config.num_iterations as f64,
        error: n_successful == 0,
        seed_base: config.seed_base,
        alpha: config.alpha,
    }
}
