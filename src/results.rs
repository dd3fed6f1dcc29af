//! # Trend Analysis Results
//!
//! Typed records produced by the analyzer and the bootstrap engine, plus the
//! flat [`TrendRecordRow`] used to hand results to reporting code. Records are
//! built once and never mutated; data problems are carried in the `error` flag
//! and [`AnalysisIssue`] instead of an `Err`.

use crate::preprocessing::TimeWindow;
use crate::statistical_tests::{AutocorrelationResult, MannKendallResult, SenSlopeResult};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Why a record carries `error = true`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub enum AnalysisIssue {
    /// Too few clean observations in the window
    InsufficientData {
        /// Minimum clean observations configured
        required: usize,
        /// Clean observations available
        actual: usize,
    },
}

impl fmt::Display for AnalysisIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisIssue::InsufficientData { required, actual } => {
                write!(f, "insufficient data: need {}, got {}", required, actual)
            }
        }
    }
}

/// Bootstrap uncertainty summary.
///
/// Slope statistics are in units per decade. `error` is set when no resample
/// produced a usable slope; the p-value statistics may still be populated.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BootstrapResult {
    /// Iterations requested
    pub n_requested: usize,
    /// Iterations that produced a finite decadal slope
    pub n_successful: usize,
    /// Median bootstrap slope per decade
    pub slope_median: f64,
    /// 2.5th percentile of bootstrap slopes per decade
    pub slope_ci_low: f64,
    /// 97.5th percentile of bootstrap slopes per decade
    pub slope_ci_high: f64,
    /// Mean Mann-Kendall p-value across resamples
    pub pvalue_mean: f64,
    /// 2.5th percentile of p-values
    pub pvalue_ci_low: f64,
    /// 97.5th percentile of p-values
    pub pvalue_ci_high: f64,
    /// Share of iterations with `p < alpha`
    pub significant_proportion: f64,
    /// No usable slope was produced
    pub error: bool,
    /// Base seed of the run
    pub seed_base: u64,
    /// Significance level of `significant_proportion`
    pub alpha: f64,
}

impl BootstrapResult {
    /// Result for a run that could not be carried out on the data.
    pub fn failed(n_requested: usize, seed_base: u64, alpha: f64) -> Self {
        Self {
            n_requested,
            n_successful: 0,
            slope_median: f64::NAN,
            slope_ci_low: f64::NAN,
            slope_ci_high: f64::NAN,
            pvalue_mean: f64::NAN,
            pvalue_ci_low: f64::NAN,
            pvalue_ci_high: f64::NAN,
            significant_proportion: 0.0,
            error: true,
            seed_base,
            alpha,
        }
    }

    /// Whether the slope interval excludes zero.
    pub fn slope_interval_excludes_zero(&self) -> bool {
        !self.error && (self.slope_ci_low > 0.0 || self.slope_ci_high < 0.0)
    }
}

/// Complete trend record for one (fraction, variable, window)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrendAnalysisRecord {
    /// Albedo fraction label (e.g. "pure_ice")
    pub fraction: String,
    /// Variable label (e.g. "mean")
    pub variable: String,
    /// Window the statistics were computed over
    pub time_window: TimeWindow,
    /// Clean observations used
    pub n_obs: usize,
    /// Observations dropped by the validator
    pub n_removed: usize,
    /// Statistics could not be computed
    pub error: bool,
    /// Reason for `error`
    pub issue: Option<AnalysisIssue>,
    /// Mann-Kendall test on the cleaned series
    pub mann_kendall: MannKendallResult,
    /// Sen's slope estimate
    pub sen_slope: SenSlopeResult,
    /// Lag-1 autocorrelation diagnostic
    pub autocorrelation: AutocorrelationResult,
    /// Mann-Kendall on the trend-free pre-whitened series, when applied
    pub prewhitened: Option<MannKendallResult>,
    /// Bootstrap uncertainty, when requested
    pub bootstrap: Option<BootstrapResult>,
}

impl TrendAnalysisRecord {
    /// Record for a series with too few clean observations.
    pub(crate) fn insufficient(
        fraction: &str,
        variable: &str,
        time_window: TimeWindow,
        n_obs: usize,
        n_removed: usize,
        required: usize,
    ) -> Self {
        Self {
            fraction: fraction.to_string(),
            variable: variable.to_string(),
            time_window,
            n_obs,
            n_removed,
            error: true,
            issue: Some(AnalysisIssue::InsufficientData {
                required,
                actual: n_obs,
            }),
            mann_kendall: MannKendallResult::undefined(n_obs),
            sen_slope: SenSlopeResult::undefined(),
            autocorrelation: AutocorrelationResult::undefined(),
            prewhitened: None,
            bootstrap: None,
        }
    }

    /// Flatten into the exchange row.
    pub fn to_row(&self) -> TrendRecordRow {
        let interval = self.sen_slope.confidence_interval;
        let bootstrap = self.bootstrap.as_ref();
        TrendRecordRow {
            fraction: self.fraction.clone(),
            variable: self.variable.clone(),
            time_window: self.time_window.to_string(),
            n_obs: self.n_obs,
            n_removed: self.n_removed,
            error: self.error,
            trend: self.mann_kendall.trend.as_str().to_string(),
            p_value: self.mann_kendall.p_value,
            tau: self.mann_kendall.tau,
            s: self.mann_kendall.s,
            z: self.mann_kendall.z,
            slope: self.sen_slope.slope,
            slope_per_decade: self.sen_slope.slope_per_decade,
            intercept: self.sen_slope.intercept,
            slope_ci_low_per_decade: interval.map(|ci| ci.low_per_decade),
            slope_ci_high_per_decade: interval.map(|ci| ci.high_per_decade),
            autocorr_lag1: self.autocorrelation.lag1,
            autocorr_significant: self.autocorrelation.significant,
            bootstrap_n_successful: bootstrap.map(|b| b.n_successful),
            bootstrap_slope_median: bootstrap.map(|b| b.slope_median),
            bootstrap_ci_low: bootstrap.map(|b| b.slope_ci_low),
            bootstrap_ci_high: bootstrap.map(|b| b.slope_ci_high),
            bootstrap_significant_proportion: bootstrap.map(|b| b.significant_proportion),
        }
    }
}

/// Flat exchange row, one per record.
///
/// Values are passed through unformatted; NaN stays NaN.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrendRecordRow {
    /// Fraction label
    pub fraction: String,
    /// Variable label (e.g. "mean", "median")
    pub variable: String,
    /// Window rendered as `all`, `month-MM` or `years-YYYY-YYYY`
    pub time_window: String,
    /// Clean observations analysed
    pub n_obs: usize,
    /// Non-finite observations dropped
    pub n_removed: usize,
    /// Too few clean observations for the statistics
    pub error: bool,
    /// `increasing`, `decreasing` or `no_trend`
    pub trend: String,
    /// Mann-Kendall two-sided p-value
    pub p_value: f64,
    /// Kendall's tau
    pub tau: f64,
    /// Mann-Kendall S statistic
    pub s: i64,
    /// Continuity-corrected Z score
    pub z: f64,
    /// Sen's slope per year
    pub slope: f64,
    /// Sen's slope per decade
    pub slope_per_decade: f64,
    /// Intercept of the Sen line
    pub intercept: f64,
    /// Lower analytic Sen bound per decade
    pub slope_ci_low_per_decade: Option<f64>,
    /// Upper analytic Sen bound per decade
    pub slope_ci_high_per_decade: Option<f64>,
    /// Lag-1 autocorrelation
    pub autocorr_lag1: f64,
    /// `|lag-1|` above the configured threshold
    pub autocorr_significant: bool,
    /// Iterations that produced a slope
    pub bootstrap_n_successful: Option<usize>,
    /// Median bootstrap slope per decade
    pub bootstrap_slope_median: Option<f64>,
    /// 2.5th percentile of bootstrap slopes per decade
    pub bootstrap_ci_low: Option<f64>,
    /// 97.5th percentile of bootstrap slopes per decade
    pub bootstrap_ci_high: Option<f64>,
    /// Share of iterations with `p < alpha`
    pub bootstrap_significant_proportion: Option<f64>,
}
