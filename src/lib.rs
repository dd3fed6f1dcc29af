//! # Glacier Albedo Trends
//!
//! Non-parametric trend analysis for satellite-derived glacier albedo series.
//!
//! Each observation is a decimal-year time stamp paired with an albedo value for one
//! surface fraction (pure ice, mostly ice, border pixels, ...). The crate cleans the
//! series, tests it for a monotonic trend and estimates how fast albedo changes per
//! decade, with analytic and bootstrap uncertainty.
//!
//! ## Key Features
//!
//! - **Mann-Kendall**: Monotonic trend test with tie-corrected variance and Kendall's tau
//! - **Sen's Slope**: Median pairwise slope, scaled per decade, with a Gilbert confidence interval
//! - **Serial Correlation**: Lag-1 autocorrelation flag and optional trend-free pre-whitening
//! - **Bootstrap**: Seeded paired resampling for slope intervals and significance robustness
//! - **Windows**: Full record, single calendar month, or decimal-year ranges
//!
//! ## Quick Start
//!
//! ```rust
//! use glacier_albedo_trends::{AnalysisConfig, BootstrapConfiguration, TrendAnalyzer, TimeWindow};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AnalysisConfig::with_bootstrap(BootstrapConfiguration::new(200, 42));
//!     let analyzer = TrendAnalyzer::new(config)?;
//!
//!     // One mid-July observation per year
//!     let times: Vec<f64> = (2002..2022).map(|y| y as f64 + 196.0 / 365.25).collect();
//!     let albedo: Vec<f64> = (0..20)
//!         .map(|i| 0.61 - 0.003 * i as f64 + 0.004 * (i as f64 * 1.9).sin())
//!         .collect();
//!
//!     let july = TimeWindow::Month(7);
//!     let record = analyzer.analyze_series("pure_ice", "mean", july, &times, &albedo)?;
//!     println!(
//!         "{}: {} ({:.4}/decade, p = {:.3})",
//!         record.fraction,
//!         record.mann_kendall.trend,
//!         record.sen_slope.slope_per_decade,
//!         record.mann_kendall.p_value
//!     );
//!     if let Some(bootstrap) = &record.bootstrap {
//!         println!(
//!             "bootstrap 95% CI: [{:.4}, {:.4}]",
//!             bootstrap.slope_ci_low, bootstrap.slope_ci_high
//!         );
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! [`TrendAnalyzer`] orchestrates the pipeline and produces [`TrendAnalysisRecord`]s.
//! The primitives in [`statistical_tests`], the validator in [`preprocessing`] and
//! [`bootstrap::bootstrap_trend`] can also be used directly. Nothing in the crate
//! holds global state; randomness comes only from the configured seed.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
pub mod analyzer;
pub mod config;
pub mod errors;
pub mod math_utils;
pub mod preprocessing;
pub mod results;
pub mod rng;

// Analysis methods
pub mod bootstrap;
pub mod bootstrap_config;
pub mod bootstrap_sampling;

// Re-exports for convenience - main public API
pub use analyzer::{FractionSeries, TrendAnalyzer, DEFAULT_VARIABLE};
pub use config::AnalysisConfig;
pub use errors::{TrendAnalysisError, TrendResult};
pub use results::{AnalysisIssue, BootstrapResult, TrendAnalysisRecord, TrendRecordRow};

// Preprocessing exports
pub use preprocessing::{
    decimal_year_month, filter_window, validate, validate_pairs, AlignedSeries, CleanedSeries,
    TimeWindow, DEFAULT_MIN_SAMPLE_SIZE,
};

// Statistical test exports
pub use statistical_tests::{
    autocorrelation_diagnostic, autocorrelation_lag1, mann_kendall, mann_kendall_variance,
    sen_slope, sen_slope_with_confidence, tie_groups, trend_free_prewhiten, AutocorrelationResult,
    MannKendallResult, SenSlopeResult, SlopeConfidenceInterval, TrendDirection,
};

// Bootstrap exports
pub use bootstrap::{bootstrap_trend, validate_bootstrap_config, BootstrapConfiguration};
