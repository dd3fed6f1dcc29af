//! # Analysis Configuration
//!
//! Thresholds that used to be hard-coded at individual call sites (Mann-Kendall
//! significance level, the `|r1| > 0.1` autocorrelation flag, the minimum number
//! of observations per month) live here as explicit parameters. A configuration
//! is a plain value handed to [`crate::TrendAnalyzer`]; there is no global copy.

use crate::bootstrap_config::{validate_bootstrap_config, BootstrapConfiguration};
use crate::errors::{validate_open_unit, validate_parameter, TrendAnalysisError, TrendResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default Mann-Kendall significance level
pub const DEFAULT_ALPHA: f64 = 0.05;
/// Default `|lag1|` above which serial correlation is flagged
pub const DEFAULT_AUTOCORRELATION_THRESHOLD: f64 = 0.1;
/// Default minimum number of clean observations per analysis
pub const DEFAULT_MIN_OBSERVATIONS: usize = 10;
/// Default confidence level of the analytic Sen's slope interval
pub const DEFAULT_SEN_CONFIDENCE: f64 = 0.95;

/// Configuration for the trend analysis engine
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnalysisConfig {
    /// Significance level for trend classification
    pub alpha: f64,
    /// Threshold for flagging lag-1 autocorrelation
    pub autocorrelation_threshold: f64,
    /// Minimum clean observations; fewer yields an error-flagged record
    pub min_observations: usize,
    /// Confidence level of the analytic Sen interval (`None` disables it)
    pub sen_confidence_level: Option<f64>,
    /// Re-run Mann-Kendall on a trend-free pre-whitened series when
    /// the lag-1 diagnostic is significant
    pub prewhiten_autocorrelated: bool,
    /// Bootstrap settings; the analyzer runs them at this config's `alpha`
    pub bootstrap: Option<BootstrapConfiguration>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl AnalysisConfig {
    /// Standard configuration: point estimates and analytic interval, no bootstrap
    pub fn standard() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            autocorrelation_threshold: DEFAULT_AUTOCORRELATION_THRESHOLD,
            min_observations: DEFAULT_MIN_OBSERVATIONS,
            sen_confidence_level: Some(DEFAULT_SEN_CONFIDENCE),
            prewhiten_autocorrelated: false,
            bootstrap: None,
        }
    }

    /// Standard configuration plus bootstrap uncertainty
    pub fn with_bootstrap(bootstrap: BootstrapConfiguration) -> Self {
        Self {
            bootstrap: Some(bootstrap),
            ..Self::standard()
        }
    }

    /// Check every field against its admissible range
    pub fn validate(&self) -> TrendResult<()> {
        validate_open_unit(self.alpha, "alpha")?;

        validate_parameter(self.autocorrelation_threshold, 0.0, 1.0, "autocorrelation_threshold")?;

        if self.min_observations < 3 {
            return Err(TrendAnalysisError::InvalidParameter {
                parameter: "min_observations".to_string(),
                value: self.min_observations as f64,
                constraint: "Must be at least 3 for Mann-Kendall".to_string(),
            });
        }

        if let Some(level) = self.sen_confidence_level {
            validate_open_unit(level, "sen_confidence_level")?;
        }

        if let Some(bootstrap) = &self.bootstrap {
            validate_bootstrap_config(bootstrap)?;
        }

        Ok(())
    }
}
