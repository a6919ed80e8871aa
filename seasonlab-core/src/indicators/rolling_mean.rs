//! Rolling mean.
//!
//! Trailing mean over a fixed window.
//! Lookback: window - 1 (first value at index window-1).

use super::RollingStatistic;

#[derive(Debug, Clone)]
pub struct RollingMean {
    window: usize,
    name: String,
}

impl RollingMean {
    pub fn new(window: usize) -> Self {
        assert!(window >= 1, "rolling mean window must be >= 1");
        Self {
            window,
            name: format!("rolling_mean_{window}"),
        }
    }
}

impl RollingStatistic for RollingMean {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window.saturating_sub(1)
    }

    fn compute(&self, values: &[f64]) -> Vec<Option<f64>> {
        let n = values.len();
        let mut result = vec![None; n];

        if n < self.window {
            return result;
        }

        let mut sum: f64 = values[..self.window].iter().sum();
        let mut clean = values[..self.window].iter().all(|v| v.is_finite());
        if clean {
            result[self.window - 1] = Some(sum / self.window as f64);
        }

        for i in self.window..n {
            let leaving = values[i - self.window];
            let entering = values[i];

            // A non-finite value poisons the running sum; rescan the window.
            if !clean || !leaving.is_finite() || !entering.is_finite() {
                let window = &values[(i + 1 - self.window)..=i];
                clean = window.iter().all(|v| v.is_finite());
                sum = window.iter().sum();
                if !clean {
                    continue;
                }
            } else {
                sum = sum - leaving + entering;
            }

            result[i] = Some(sum / self.window as f64);
        }

        result
    }
}
