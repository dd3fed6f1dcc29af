//! # Trend Analysis Engine
//!
//! [`TrendAnalyzer`] turns one albedo time series into a [`TrendAnalysisRecord`]:
//! it selects the requested window, removes non-finite observations while keeping
//! each time stamp with its value, and runs the Mann-Kendall test, Sen's slope and
//! the lag-1 autocorrelation diagnostic. Optional stages (trend-free pre-whitening
//! and the bootstrap) are switched on through [`AnalysisConfig`].
//!
//! Series that are too short are not errors: they produce a record with
//! `error = true` and an [`AnalysisIssue`]. `Err` is reserved for caller
//! mistakes such as mismatched slices or an invalid configuration.
//!
//! ## Usage Example
//!
//! ```rust
//! use glacier_albedo_trends::{AnalysisConfig, TrendAnalyzer, TrendDirection};
//!
//! # fn main() -> Result<(), glacier_albedo_trends::TrendAnalysisError> {
//! let analyzer = TrendAnalyzer::new(AnalysisConfig::default())?;
//!
//! let times: Vec<f64> = (0..16).map(|i| 2005.0 + i as f64 + 196.0 / 365.25).collect();
//! let albedo: Vec<f64> = (0..16)
//!     .map(|i| 0.64 - 0.004 * i as f64 + if i % 3 == 0 { 0.002 } else { -0.001 })
//!     .collect();
//!
//! let record = analyzer.analyze("pure_ice", &times, &albedo)?;
//! assert!(!record.error);
//! assert_eq!(record.mann_kendall.trend, TrendDirection::Decreasing);
//! assert!(record.sen_slope.slope_per_decade < 0.0);
//! # Ok(())
//! # }
//! ```

use crate::{
    bootstrap::{bootstrap_trend, BootstrapConfiguration},
    config::AnalysisConfig,
    errors::{validate_equal_length, TrendResult},
    preprocessing::{filter_window, validate_pairs, AlignedSeries, TimeWindow},
    results::TrendAnalysisRecord,
    statistical_tests::{
        autocorrelation_diagnostic, mann_kendall, sen_slope, sen_slope_with_confidence,
        trend_free_prewhiten, MannKendallResult,
    },
};
use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Variable label used by [`TrendAnalyzer::analyze`].
pub const DEFAULT_VARIABLE: &str = "mean";

/// One albedo fraction's time series, for batch analysis
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FractionSeries {
    /// Fraction label (e.g. "pure_ice", "mostly_ice")
    pub label: String,
    /// Decimal-year time stamps
    pub times: Vec<f64>,
    /// Albedo values aligned with `times`
    pub values: Vec<f64>,
}

impl FractionSeries {
    /// Bundle a labelled series.
    pub fn new(label: impl Into<String>, times: Vec<f64>, values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            times,
            values,
        }
    }
}

/// Stateless trend analysis engine
///
/// Holds only its configuration, so one instance can be shared across threads
/// and repeated calls with identical input yield identical records.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendAnalyzer {
    config: AnalysisConfig,
}

impl Default for TrendAnalyzer {
    fn default() -> Self {
        Self {
            config: AnalysisConfig::default(),
        }
    }
}

impl TrendAnalyzer {
    /// Create an analyzer after validating `config`.
    pub fn new(config: AnalysisConfig) -> TrendResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze the full record of one fraction under the default variable label.
    pub fn analyze(
        &self,
        fraction: &str,
        times: &[f64],
        values: &[f64],
    ) -> TrendResult<TrendAnalysisRecord> {
        self.analyze_series(fraction, DEFAULT_VARIABLE, TimeWindow::All, times, values)
    }

    /// Analyze one (fraction, variable, window) combination.
    ///
    /// The bootstrap runs only when the configuration carries one. Its
    /// significance level is always [`AnalysisConfig::alpha`].
    ///
    /// # Errors
    /// `LengthMismatch` for unequal slices, `InvalidParameter` for an
    /// invalid window.
    pub fn analyze_series(
        &self,
        fraction: &str,
        variable: &str,
        window: TimeWindow,
        times: &[f64],
        values: &[f64],
    ) -> TrendResult<TrendAnalysisRecord> {
        self.run(fraction, variable, window, times, values, self.config.bootstrap.as_ref())
    }

    /// Analyze one combination and always attach bootstrap uncertainty.
    ///
    /// Uses the configured [`BootstrapConfiguration`], or its defaults when the
    /// configuration has none. The significance level is
    /// [`AnalysisConfig::alpha`] in both cases.
    pub fn analyze_with_bootstrap(
        &self,
        fraction: &str,
        variable: &str,
        window: TimeWindow,
        times: &[f64],
        values: &[f64],
    ) -> TrendResult<TrendAnalysisRecord> {
        let bootstrap = self.config.bootstrap.clone().unwrap_or_default();
        self.run(fraction, variable, window, times, values, Some(&bootstrap))
    }

    /// One record per calendar month, in the order of `months`.
    ///
    /// # Errors
    /// `InvalidParameter` if any month is outside 1-12.
    pub fn analyze_by_month(
        &self,
        fraction: &str,
        variable: &str,
        times: &[f64],
        values: &[f64],
        months: &[u8],
    ) -> TrendResult<Vec<TrendAnalysisRecord>> {
        validate_equal_length(times, values)?;
        months
            .iter()
            .map(|&month| {
                self.analyze_series(fraction, variable, TimeWindow::Month(month), times, values)
            })
            .collect()
    }

    /// Analyze every fraction over its full record.
    ///
    /// Output order equals input order. With the `parallel` feature the
    /// fractions are processed on the rayon pool.
    pub fn analyze_batch(
        &self,
        series: &[FractionSeries],
        variable: &str,
    ) -> TrendResult<Vec<TrendAnalysisRecord>> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            series
                .par_iter()
                .map(|s| {
                    self.analyze_series(&s.label, variable, TimeWindow::All, &s.times, &s.values)
                })
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            series
                .iter()
                .map(|s| {
                    self.analyze_series(&s.label, variable, TimeWindow::All, &s.times, &s.values)
                })
                .collect()
        }
    }

    fn run(
        &self,
        fraction: &str,
        variable: &str,
        window: TimeWindow,
        times: &[f64],
        values: &[f64],
        bootstrap: Option<&BootstrapConfiguration>,
    ) -> TrendResult<TrendAnalysisRecord> {
        let (window_times, window_values) = filter_window(times, values, &window)?;
        let aligned = validate_pairs(&window_times, &window_values, self.config.min_observations)?;

        if !aligned.is_valid {
            debug!(
                "{}/{} [{}]: {} clean observations, need {}",
                fraction,
                variable,
                window,
                aligned.len(),
                self.config.min_observations
            );
            return Ok(TrendAnalysisRecord::insufficient(
                fraction,
                variable,
                window,
                aligned.len(),
                aligned.n_removed,
                self.config.min_observations,
            ));
        }

        let mann_kendall_result = mann_kendall(&aligned.values, self.config.alpha);
        let sen = match self.config.sen_confidence_level {
            Some(level) => sen_slope_with_confidence(&aligned.times, &aligned.values, level)?,
            None => sen_slope(&aligned.times, &aligned.values)?,
        };
        let autocorrelation =
            autocorrelation_diagnostic(&aligned.values, self.config.autocorrelation_threshold);

        let prewhitened = if self.config.prewhiten_autocorrelated && autocorrelation.significant {
            self.prewhitened_test(&aligned)?
        } else {
            None
        };

        let bootstrap = match bootstrap {
            Some(cfg) => {
                let cfg = cfg.clone().with_alpha(self.config.alpha);
                Some(bootstrap_trend(&aligned.times, &aligned.values, &cfg)?)
            }
            None => None,
        };

        Ok(TrendAnalysisRecord {
            fraction: fraction.to_string(),
            variable: variable.to_string(),
            time_window: window,
            n_obs: aligned.len(),
            n_removed: aligned.n_removed,
            error: false,
            issue: None,
            mann_kendall: mann_kendall_result,
            sen_slope: sen,
            autocorrelation,
            prewhitened,
            bootstrap,
        })
    }

    fn prewhitened_test(&self, aligned: &AlignedSeries) -> TrendResult<Option<MannKendallResult>> {
        let whitened = trend_free_prewhiten(&aligned.times, &aligned.values)?;
        if whitened.len() < 3 {
            return Ok(None);
        }
        Ok(Some(mann_kendall(&whitened, self.config.alpha)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap_config::BootstrapConfiguration;
    use crate::errors::TrendAnalysisError;
    use crate::results::AnalysisIssue;
    use crate::statistical_tests::TrendDirection;

    fn declining(n: usize) -> (Vec<f64>, Vec<f64>) {
        let times: Vec<f64> = (0..n).map(|i| 2003.0 + i as f64 + 200.0 / 365.25).collect();
        let values = (0..n)
            .map(|i| 0.58 - 0.004 * i as f64 + 0.003 * (i as f64 * 2.1).cos())
            .collect();
        (times, values)
    }

    #[test]
    fn test_analyze_declining_series() {
        let analyzer = TrendAnalyzer::default();
        let (times, values) = declining(18);
        let record = analyzer.analyze("pure_ice", &times, &values).unwrap();

        assert!(!record.error);
        assert!(record.issue.is_none());
        assert_eq!(record.fraction, "pure_ice");
        assert_eq!(record.variable, DEFAULT_VARIABLE);
        assert_eq!(record.time_window, TimeWindow::All);
        assert_eq!(record.n_obs, 18);
        assert_eq!(record.mann_kendall.trend, TrendDirection::Decreasing);
        assert!(record.sen_slope.slope < 0.0);

        let ci = record.sen_slope.confidence_interval.unwrap();
        assert!(ci.low_per_decade <= record.sen_slope.slope_per_decade);
        assert!(ci.high_per_decade >= record.sen_slope.slope_per_decade);
        assert!(record.bootstrap.is_none());
        assert!(record.prewhitened.is_none());
    }

    #[test]
    fn test_analyze_single_observation_is_flagged() {
        let analyzer = TrendAnalyzer::default();
        let record = analyzer.analyze("pure_ice", &[2010.5], &[0.5]).unwrap();

        assert!(record.error);
        assert_eq!(record.n_obs, 1);
        assert_eq!(
            record.issue,
            Some(AnalysisIssue::InsufficientData { required: 10, actual: 1 })
        );
        assert!(record.sen_slope.slope.is_nan());
        assert_eq!(record.mann_kendall.trend, TrendDirection::NoTrend);
    }

    #[test]
    fn test_analyze_counts_removed_observations() {
        let analyzer = TrendAnalyzer::default();
        let (times, mut values) = declining(14);
        values[2] = f64::NAN;
        values[7] = f64::NAN;
        let record = analyzer.analyze("mostly_ice", &times, &values).unwrap();
        assert_eq!(record.n_obs, 12);
        assert_eq!(record.n_removed, 2);
        assert!(!record.error);
    }

    #[test]
    fn test_analyze_is_deterministic() {
        let config = AnalysisConfig::with_bootstrap(BootstrapConfiguration::new(100, 5));
        let analyzer = TrendAnalyzer::new(config).unwrap();
        let (times, values) = declining(15);
        let a = analyzer.analyze("pure_ice", &times, &values).unwrap();
        let b = analyzer.analyze("pure_ice", &times, &values).unwrap();
        assert_eq!(format!("{:?}", a), format!("{:?}", b));
    }

    #[test]
    fn test_analyze_with_bootstrap_attaches_result() {
        let mut config = AnalysisConfig::standard();
        config.bootstrap = Some(BootstrapConfiguration::new(150, 11));
        let analyzer = TrendAnalyzer::new(config).unwrap();
        let (times, values) = declining(16);

        let record = analyzer
            .analyze_with_bootstrap("pure_ice", "mean", TimeWindow::All, &times, &values)
            .unwrap();
        let bootstrap = record.bootstrap.unwrap();
        assert_eq!(bootstrap.n_requested, 150);
        assert_eq!(bootstrap.seed_base, 11);
        assert!(!bootstrap.error);
        assert!(bootstrap.slope_ci_high < 0.0);
    }

    #[test]
    fn test_bootstrap_uses_analysis_alpha() {
        let (times, values) = declining(14);

        let mut config = AnalysisConfig::standard();
        config.alpha = 0.01;
        config.bootstrap = Some(BootstrapConfiguration::new(120, 3).with_alpha(0.05));
        let analyzer = TrendAnalyzer::new(config).unwrap();
        let record = analyzer.analyze("pure_ice", &times, &values).unwrap();
        assert_eq!(record.bootstrap.unwrap().alpha, 0.01);

        let mut config = AnalysisConfig::standard();
        config.alpha = 0.001;
        let analyzer = TrendAnalyzer::new(config).unwrap();
        let record = analyzer
            .analyze_with_bootstrap("pure_ice", "mean", TimeWindow::All, &times, &values)
            .unwrap();
        let bootstrap = record.bootstrap.unwrap();
        assert_eq!(bootstrap.alpha, 0.001);
        assert!(bootstrap.significant_proportion <= 1.0);
    }

    #[test]
    fn test_analyze_with_bootstrap_skipped_for_short_series() {
        let analyzer = TrendAnalyzer::default();
        let record = analyzer
            .analyze_with_bootstrap(
                "pure_ice",
                "mean",
                TimeWindow::All,
                &[2001.0, 2002.0],
                &[0.4, 0.5],
            )
            .unwrap();
        assert!(record.error);
        assert!(record.bootstrap.is_none());
    }

    #[test]
    fn test_prewhitening_only_when_enabled() {
        let (times, values) = declining(20);

        let record = TrendAnalyzer::default().analyze("pure_ice", &times, &values).unwrap();
        assert!(record.autocorrelation.significant);
        assert!(record.prewhitened.is_none());

        let mut config = AnalysisConfig::standard();
        config.prewhiten_autocorrelated = true;
        let analyzer = TrendAnalyzer::new(config).unwrap();
        let record = analyzer.analyze("pure_ice", &times, &values).unwrap();
        let whitened = record.prewhitened.unwrap();
        assert_eq!(whitened.n, 19);
    }

    #[test]
    fn test_analyze_by_month_selects_window() {
        let analyzer = TrendAnalyzer::default();
        let mut times = Vec::new();
        let mut values = Vec::new();
        for year in 2005..2020 {
            let y = year as f64;
            let k = (year - 2005) as f64;
            times.push(y + 166.0 / 365.25);
            values.push(0.70 + 0.01 * (k * 2.3).sin());
            times.push(y + 196.0 / 365.25);
            values.push(0.60 - 0.004 * k + 0.002 * (k * 1.3).sin());
        }

        let records = analyzer
            .analyze_by_month("pure_ice", "mean", &times, &values, &[7, 6])
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].time_window, TimeWindow::Month(7));
        assert_eq!(records[0].n_obs, 15);
        assert_eq!(records[0].mann_kendall.trend, TrendDirection::Decreasing);
        assert_eq!(records[1].time_window, TimeWindow::Month(6));
        assert_eq!(records[1].n_obs, 15);

        let august = analyzer.analyze_by_month("pure_ice", "mean", &times, &values, &[8]).unwrap();
        assert!(august[0].error);
        assert_eq!(august[0].n_obs, 0);

        assert!(analyzer.analyze_by_month("pure_ice", "mean", &times, &values, &[0]).is_err());
    }

    #[test]
    fn test_analyze_batch_preserves_order() {
        let analyzer = TrendAnalyzer::default();
        let (times, values) = declining(12);
        let series = vec![
            FractionSeries::new("pure_ice", times.clone(), values.clone()),
            FractionSeries::new("border", vec![2001.0], vec![0.3]),
            FractionSeries::new("mostly_ice", times, values),
        ];
        let records = analyzer.analyze_batch(&series, "median").unwrap();
        let labels: Vec<&str> = records.iter().map(|r| r.fraction.as_str()).collect();
        assert_eq!(labels, vec!["pure_ice", "border", "mostly_ice"]);
        assert!(records[1].error);
        assert!(records.iter().all(|r| r.variable == "median"));
    }

    #[test]
    fn test_contract_violations_are_errors() {
        let analyzer = TrendAnalyzer::default();
        let err = analyzer.analyze("pure_ice", &[2001.0, 2002.0], &[0.5]).unwrap_err();
        assert_eq!(err, TrendAnalysisError::LengthMismatch { times: 2, values: 1 });

        let mut config = AnalysisConfig::standard();
        config.alpha = 1.2;
        assert!(TrendAnalyzer::new(config).is_err());
    }
}
