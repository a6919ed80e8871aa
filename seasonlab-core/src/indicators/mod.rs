//! Trailing rolling-window statistics.
//!
//! Every statistic is a pure function: values in, series of the same length
//! out. The first `lookback()` positions are `None` (warmup); positions whose
//! window contains a non-finite value are `None` as well.

pub mod rolling_mean;
pub mod rolling_std;

pub use rolling_mean::RollingMean;
pub use rolling_std::RollingStd;

use serde::{Deserialize, Serialize};

/// A trailing-window statistic over a regularly spaced series.
///
/// No output at position `i` may depend on input after `i`.
pub trait RollingStatistic: Send + Sync {
    /// Human-readable name (e.g., "rolling_mean_12").
    fn name(&self) -> &str;

    /// Number of positions before the statistic produces a value.
    fn lookback(&self) -> usize;

    /// Compute the statistic for the whole series.
    ///
    /// Returns a `Vec` of the same length as `values`; the first `lookback()`
    /// entries are `None`.
    fn compute(&self, values: &[f64]) -> Vec<Option<f64>>;
}

/// Rolling mean and sample standard deviation, co-indexed with the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingStats {
    pub window: usize,
    pub mean: Vec<Option<f64>>,
    pub std: Vec<Option<f64>>,
}

impl RollingStats {
    pub fn compute(values: &[f64], window: usize) -> Self {
        Self {
            window,
            mean: RollingMean::new(window).compute(values),
            std: RollingStd::new(window).compute(values),
        }
    }

    pub fn len(&self) -> usize {
        self.mean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }

    /// Number of positions with a defined mean.
    pub fn defined(&self) -> usize {
        self.mean.iter().filter(|v| v.is_some()).count()
    }
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for rolling statistic tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
