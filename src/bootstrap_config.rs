//! Bootstrap configuration and validation.
//!
//! The bootstrap is reproducible by construction: every iteration draws from its
//! own generator seeded with `seed_base + iteration`, so the configuration is the
//! only source of randomness a run ever sees.

use crate::errors::{validate_open_unit, TrendAnalysisError, TrendResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default number of resampling iterations.
pub const DEFAULT_BOOTSTRAP_ITERATIONS: usize = 1000;
/// Smallest resample on which Sen's slope is attempted.
pub const DEFAULT_MIN_SLOPE_POINTS: usize = 6;
pub(crate) const MAX_BOOTSTRAP_ITERATIONS: usize = 100_000;
/// Percentiles reported for slope and p-value intervals.
pub(crate) const CI_LOWER_PERCENTILE: f64 = 0.025;
pub(crate) const CI_UPPER_PERCENTILE: f64 = 0.975;

/// Bootstrap configuration for trend uncertainty.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BootstrapConfiguration {
    /// Number of resamples drawn
    pub num_iterations: usize,
    /// Base seed; iteration `i` uses `seed_base + i`
    pub seed_base: u64,
    /// Significance level used for `significant_proportion`
    pub alpha: f64,
    /// Resamples shorter than this skip Sen's slope
    pub min_slope_points: usize,
}

impl Default for BootstrapConfiguration {
    fn default() -> Self {
        Self {
            num_iterations: DEFAULT_BOOTSTRAP_ITERATIONS,
            seed_base: 0,
            alpha: 0.05,
            min_slope_points: DEFAULT_MIN_SLOPE_POINTS,
        }
    }
}

impl BootstrapConfiguration {
    /// Default configuration with an explicit iteration count and seed.
    pub fn new(num_iterations: usize, seed_base: u64) -> Self {
        Self {
            num_iterations,
            seed_base,
            ..Self::default()
        }
    }

    /// Same configuration with a different significance level.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }
}

/// Validate bootstrap configuration parameters.
pub fn validate_bootstrap_config(config: &BootstrapConfiguration) -> TrendResult<()> {
    if config.num_iterations == 0 || config.num_iterations > MAX_BOOTSTRAP_ITERATIONS {
        return Err(TrendAnalysisError::InvalidParameter {
            parameter: "num_iterations".to_string(),
            value: config.num_iterations as f64,
            constraint: format!("Must be between 1 and {}", MAX_BOOTSTRAP_ITERATIONS),
        });
    }

    validate_open_unit(config.alpha, "alpha")?;

    if config.min_slope_points < 2 {
        return Err(TrendAnalysisError::InvalidParameter {
            parameter: "min_slope_points".to_string(),
            value: config.min_slope_points as f64,
            constraint: "Must be at least 2 for a pairwise slope".to_string(),
        });
    }

    Ok(())
}
