//! Rolling standard deviation.
//!
//! Sample standard deviation (divide by N - 1) over a trailing window,
//! computed two-pass per window to avoid cancellation on large prices.
//! Lookback: window - 1. A window of 1 has no sample deviation, so every
//! position is `None`.

use super::RollingStatistic;

#[derive(Debug, Clone)]
pub struct RollingStd {
    window: usize,
    name: String,
}

impl RollingStd {
    pub fn new(window: usize) -> Self {
        assert!(window >= 1, "rolling std window must be >= 1");
        Self {
            window,
            name: format!("rolling_std_{window}"),
        }
    }
}

impl RollingStatistic for RollingStd {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window.saturating_sub(1)
    }

    fn compute(&self, values: &[f64]) -> Vec<Option<f64>> {
        let n = values.len();
        let mut result = vec![None; n];

        if n < self.window || self.window < 2 {
            return result;
        }

        for i in (self.window - 1)..n {
            let window = &values[(i + 1 - self.window)..=i];
            if window.iter().any(|v| !v.is_finite()) {
                continue;
            }

            let mean = window.iter().sum::<f64>() / self.window as f64;
            let sum_sq: f64 = window.iter().map(|v| (v - mean) * (v - mean)).sum();
            let variance = (sum_sq / (self.window - 1) as f64).max(0.0);
            result[i] = Some(variance.sqrt());
        }

        result
    }
}
