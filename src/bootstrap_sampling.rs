//! Paired bootstrap resampling of (time, value) observations.
//!
//! A resample draws `n` observation indices uniformly with replacement and keeps
//! every drawn value attached to its own time stamp. The drawn pairs are put back
//! in chronological order (stable sort on time) so that the Mann-Kendall test,
//! which reads its input as a time-ordered sequence, sees the resample as a
//! series again.

use crate::errors::{validate_equal_length, TrendAnalysisError, TrendResult};
use crate::math_utils::float_total_cmp;
use crate::rng::ResamplingRng;

/// Reusable buffers for paired resampling.
///
/// The bootstrap loop allocates one of these per worker and redraws into it,
/// avoiding a fresh allocation per iteration.
#[derive(Debug, Clone, Default)]
pub struct PairedResample {
    indices: Vec<usize>,
    times: Vec<f64>,
    values: Vec<f64>,
}

impl PairedResample {
    /// Buffers sized for a series of `n` observations.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            indices: Vec::with_capacity(n),
            times: Vec::with_capacity(n),
            values: Vec::with_capacity(n),
        }
    }

    /// Draw a new resample from `times`/`values` using `rng`.
    ///
    /// # Errors
    /// `LengthMismatch` for unequal slices, `BootstrapError` for empty input.
    pub fn draw(
        &mut self,
        times: &[f64],
        values: &[f64],
        rng: &mut ResamplingRng,
    ) -> TrendResult<()> {
        validate_equal_length(times, values)?;
        let n = values.len();
        if n == 0 {
            return Err(TrendAnalysisError::BootstrapError {
                reason: "Cannot resample an empty series".to_string(),
            });
        }

        self.indices.clear();
        self.indices.resize(n, 0);
        rng.fill_indices(&mut self.indices, n);
        // Stable: equal time stamps keep draw order
        self.indices.sort_by(|&a, &b| float_total_cmp(&times[a], &times[b]));

        self.times.clear();
        self.values.clear();
        self.times.extend(self.indices.iter().map(|&i| times[i]));
        self.values.extend(self.indices.iter().map(|&i| values[i]));
        Ok(())
    }

    /// Time stamps of the current resample, ascending.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Values of the current resample, aligned with [`Self::times`].
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of observations in the current resample.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True before the first draw.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
