//! Summary statistics over a monthly series.
//!
//! Pure functions: series in, scalars out. An empty series has count 0 and
//! every other field undefined.

use crate::domain::{Month, MonthlySeries};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub first: Option<Month>,
    pub last: Option<Month>,
}

impl Summary {
    pub fn compute(series: &MonthlySeries) -> Self {
        let values = series.values();
        Self {
            count: values.len(),
            min: min(values),
            max: max(values),
            mean: mean(values),
            first: series.start(),
            last: series.end(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

// ─── Individual statistics ──────────────────────────────────────────

pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
