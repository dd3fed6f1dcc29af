//! Error types and contract checks for trend analysis.
//!
//! Only programming errors (mismatched slices, out-of-range configuration) are
//! reported through [`TrendAnalysisError`]. Data conditions that are routine for
//! satellite albedo series (too few observations in a month, flat series, a
//! bootstrap resample without distinct times) are represented inside the result
//! records instead, see [`crate::results::AnalysisIssue`].

use thiserror::Error;

/// Error types for trend analysis operations.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum TrendAnalysisError {
    /// Invalid parameter value for analysis configuration.
    #[error("Invalid parameter: {parameter} = {value}, expected {constraint}")]
    InvalidParameter {
        /// Parameter name
        parameter: String,
        /// Invalid value provided
        value: f64,
        /// Valid range or constraint description
        constraint: String,
    },

    /// Time and value slices of different length.
    #[error("Length mismatch: {times} time stamps but {values} values")]
    LengthMismatch {
        /// Number of time stamps supplied
        times: usize,
        /// Number of values supplied
        values: usize,
    },

    /// Numerical computation error.
    #[error("Numerical computation failed: {reason}")]
    NumericalError {
        /// Detailed reason for numerical failure
        reason: String,
        /// Operation that failed
        operation: Option<String>,
    },

    /// Bootstrap resampling error.
    #[error("Bootstrap resampling failed: {reason}")]
    BootstrapError {
        /// Reason for bootstrap failure
        reason: String,
    },
}

/// Result type for trend analysis operations.
pub type TrendResult<T> = Result<T, TrendAnalysisError>;

/// Validates that time stamps and values pair up one to one.
pub fn validate_equal_length(times: &[f64], values: &[f64]) -> TrendResult<()> {
    if times.len() != values.len() {
        return Err(TrendAnalysisError::LengthMismatch {
            times: times.len(),
            values: values.len(),
        });
    }
    Ok(())
}

/// Validates that a parameter is within `[min, max]`.
///
/// # Example
/// ```rust
/// use glacier_albedo_trends::errors::validate_parameter;
///
/// assert!(validate_parameter(0.05, 0.0, 1.0, "alpha").is_ok());
/// assert!(validate_parameter(1.5, 0.0, 1.0, "alpha").is_err());
/// ```
pub fn validate_parameter(value: f64, min: f64, max: f64, name: &str) -> TrendResult<()> {
    if value.is_nan() {
        return Err(TrendAnalysisError::InvalidParameter {
            parameter: name.to_string(),
            value,
            constraint: "must not be NaN".to_string(),
        });
    }

    if min.is_nan() || max.is_nan() || min > max {
        return Err(TrendAnalysisError::NumericalError {
            reason: format!(
                "Invalid bounds for parameter {}: min={}, max={}",
                name, min, max
            ),
            operation: None,
        });
    }

    if value < min || value > max {
        Err(TrendAnalysisError::InvalidParameter {
            parameter: name.to_string(),
            value,
            constraint: format!("[{}, {}]", min, max),
        })
    } else {
        Ok(())
    }
}

/// Validates a probability-like parameter on the open interval `(0, 1)`.
pub(crate) fn validate_open_unit(value: f64, name: &str) -> TrendResult<()> {
    if !(value > 0.0 && value < 1.0) {
        return Err(TrendAnalysisError::InvalidParameter {
            parameter: name.to_string(),
            value,
            constraint: "(0, 1)".to_string(),
        });
    }
    Ok(())
}
