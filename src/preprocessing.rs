//! Data validation and window selection for albedo time series
//!
//! Satellite albedo columns arrive with gaps (cloud masks, sensor outages) encoded
//! as NaN. This module removes them while keeping each time stamp attached to its
//! own observation, and selects the observations that fall in a calendar month or
//! year range before the statistics run.

use crate::errors::{validate_equal_length, TrendAnalysisError, TrendResult};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Minimum sample size for a series to be considered valid
pub const DEFAULT_MIN_SAMPLE_SIZE: usize = 3;

/// Days per decimal year, matching the `year + doy / 365.25` encoding
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Cumulative day counts at the end of each month (non-leap year)
const MONTH_END_DAY: [u32; 13] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334, 365];

/// Cumulative day counts at the end of each month (leap year)
const LEAP_MONTH_END_DAY: [u32; 13] =
    [0, 31, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335, 366];

/// A value sequence with non-finite entries removed
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CleanedSeries {
    /// Whether enough observations remain
    pub is_valid: bool,
    /// Finite values in original order
    pub cleaned: Vec<f64>,
    /// Number of entries dropped
    pub n_removed: usize,
}

/// Time-aligned series after cleaning
///
/// `times[i]` is always the time stamp that was paired with `values[i]` in
/// the caller's input.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AlignedSeries {
    /// Time stamps (decimal years) of the retained observations
    pub times: Vec<f64>,
    /// Retained values
    pub values: Vec<f64>,
    /// Number of pairs dropped
    pub n_removed: usize,
    /// Whether enough observations remain
    pub is_valid: bool,
}

impl AlignedSeries {
    /// Number of retained observations
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if nothing was retained
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Observation window a trend is computed over
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TimeWindow {
    /// Every observation in the record
    All,
    /// One calendar month (1-12) across all years
    Month(u8),
    /// Inclusive decimal-year range
    Years {
        /// First decimal year included
        start: f64,
        /// Last decimal year included
        end: f64,
    },
}

impl Default for TimeWindow {
    fn default() -> Self {
        TimeWindow::All
    }
}

impl TimeWindow {
    /// Whether an observation at decimal year `t` falls inside the window
    pub fn contains(&self, t: f64) -> bool {
        match *self {
            TimeWindow::All => true,
            TimeWindow::Month(month) => decimal_year_month(t) == Some(month),
            TimeWindow::Years { start, end } => t >= start && t <= end,
        }
    }

    fn check(&self) -> TrendResult<()> {
        match *self {
            TimeWindow::All => Ok(()),
            TimeWindow::Month(month) if (1..=12).contains(&month) => Ok(()),
            TimeWindow::Month(month) => Err(TrendAnalysisError::InvalidParameter {
                parameter: "month".to_string(),
                value: month as f64,
                constraint: "[1, 12]".to_string(),
            }),
            TimeWindow::Years { start, end } if start <= end => Ok(()),
            TimeWindow::Years { start, .. } => Err(TrendAnalysisError::InvalidParameter {
                parameter: "start".to_string(),
                value: start,
                constraint: "Must not exceed end of the year range".to_string(),
            }),
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeWindow::All => write!(f, "all"),
            TimeWindow::Month(month) => write!(f, "month-{:02}", month),
            TimeWindow::Years { start, end } => write!(f, "years-{}-{}", start, end),
        }
    }
}

/// Remove non-finite values.
///
/// Never fails: an empty or all-NaN input simply comes back invalid.
///
/// # Example
/// ```rust
/// use glacier_albedo_trends::preprocessing::validate;
///
/// let result = validate(&[0.61, f64::NAN, 0.58, f64::INFINITY], 3);
/// assert_eq!(result.cleaned, vec![0.61, 0.58]);
/// assert_eq!(result.n_removed, 2);
/// assert!(!result.is_valid);
/// ```
pub fn validate(values: &[f64], min_size: usize) -> CleanedSeries {
    let cleaned: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let n_removed = values.len() - cleaned.len();
    CleanedSeries {
        is_valid: cleaned.len() >= min_size,
        cleaned,
        n_removed,
    }
}

/// Remove non-finite pairs while keeping time stamps aligned with their values.
///
/// An index is dropped when either its value or its time stamp is not finite.
///
/// # Errors
/// `LengthMismatch` when the slices differ in length.
pub fn validate_pairs(
    times: &[f64],
    values: &[f64],
    min_size: usize,
) -> TrendResult<AlignedSeries> {
    validate_equal_length(times, values)?;

    let (kept_times, kept_values): (Vec<f64>, Vec<f64>) = times
        .iter()
        .zip(values.iter())
        .filter(|(t, v)| t.is_finite() && v.is_finite())
        .map(|(&t, &v)| (t, v))
        .unzip();

    let n_removed = values.len() - kept_values.len();
    Ok(AlignedSeries {
        is_valid: kept_values.len() >= min_size,
        times: kept_times,
        values: kept_values,
        n_removed,
    })
}

/// Calendar month (1-12) of a decimal-year time stamp.
///
/// Time stamps are encoded as `year + day_of_year / 365.25` with a one-based
/// day of year. The day is recovered by rounding and looked up in the
/// Gregorian calendar of `floor(t)`, so leap years use a 29-day February.
pub fn decimal_year_month(t: f64) -> Option<u8> {
    if !t.is_finite() {
        return None;
    }
    let year = t.floor();
    let month_end = if is_leap_year(year as i64) {
        &LEAP_MONTH_END_DAY
    } else {
        &MONTH_END_DAY
    };
    let day_of_year = ((t - year) * DAYS_PER_YEAR).round() as u32;
    let day_of_year = day_of_year.clamp(1, month_end[12]);
    month_end
        .windows(2)
        .position(|bounds| day_of_year <= bounds[1])
        .map(|idx| idx as u8 + 1)
}

fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Aligned subset of a series that falls inside `window`.
///
/// Non-finite entries are passed through untouched so the caller's validator
/// still counts them; only time stamps decide window membership.
pub fn filter_window(
    times: &[f64],
    values: &[f64],
    window: &TimeWindow,
) -> TrendResult<(Vec<f64>, Vec<f64>)> {
    validate_equal_length(times, values)?;
    window.check()?;

    Ok(times
        .iter()
        .zip(values.iter())
        .filter(|&(&t, _)| window.contains(t))
        .map(|(&t, &v)| (t, v))
        .unzip())
}
