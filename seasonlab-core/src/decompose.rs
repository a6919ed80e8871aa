//! Classical seasonal decomposition.
//!
//! - Trend: centered moving average over one period. Even periods use the
//!   2×p filter `[0.5, 1, …, 1, 0.5] / p`. The first and last `p / 2`
//!   positions have no trend value and none is invented.
//! - Seasonal: per-phase mean of the detrended series, centred to sum to zero,
//!   tiled across the series by position.
//! - Residual: observed − trend − seasonal, undefined where trend is.

use crate::config::AnalysisSettings;
use crate::domain::{Month, MonthlySeries};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Decomposition model. Only the additive model is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecompositionModel {
    #[default]
    Additive,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum DecompositionError {
    #[error("series too short: {len} points, need at least {required} ({cycles} cycles of period {period})")]
    TooShort {
        len: usize,
        required: usize,
        period: usize,
        cycles: usize,
    },

    #[error("non-finite value {value} at position {index}")]
    NonFinite { index: usize, value: f64 },

    #[error("invalid seasonal period {0}")]
    InvalidPeriod(usize),

    #[error("seasonal phase {phase} has no detrended values")]
    EmptyPhase { phase: usize },
}

/// Four co-indexed components of a monthly series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decomposition {
    pub model: DecompositionModel,
    pub period: usize,
    pub start: Option<Month>,
    pub observed: Vec<f64>,
    pub trend: Vec<Option<f64>>,
    pub seasonal: Vec<f64>,
    pub residual: Vec<Option<f64>>,
}

impl Decomposition {
    pub fn len(&self) -> usize {
        self.observed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }

    /// trend + seasonal + residual at `index`, where trend is defined.
    pub fn reconstruct(&self, index: usize) -> Option<f64> {
        let trend = (*self.trend.get(index)?)?;
        let residual = (*self.residual.get(index)?)?;
        Some(trend + self.seasonal.get(index)? + residual)
    }

    /// One centred seasonal cycle (`period` values summing to zero).
    pub fn seasonal_cycle(&self) -> &[f64] {
        &self.seasonal[..self.period.min(self.seasonal.len())]
    }
}

/// Seasonal decomposer configured from `AnalysisSettings`.
#[derive(Debug, Clone)]
pub struct Decomposer {
    model: DecompositionModel,
    period: usize,
    cycles: usize,
    min_points: usize,
}

impl Decomposer {
    pub fn new(settings: &AnalysisSettings) -> Self {
        Self {
            model: settings.model,
            period: settings.period,
            cycles: settings.required_cycles(),
            min_points: settings.min_decomposition_points(),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Shortest series `decompose` accepts.
    pub fn min_points(&self) -> usize {
        self.min_points
    }

    pub fn decompose(&self, series: &MonthlySeries) -> Result<Decomposition, DecompositionError> {
        let mut decomposition = self.decompose_values(series.values())?;
        decomposition.start = series.start();
        Ok(decomposition)
    }

    /// Decompose a plain slice of regularly spaced values.
    pub fn decompose_values(&self, values: &[f64]) -> Result<Decomposition, DecompositionError> {
        let p = self.period;
        if p < 2 {
            return Err(DecompositionError::InvalidPeriod(p));
        }
        if values.len() < self.min_points {
            return Err(DecompositionError::TooShort {
                len: values.len(),
                required: self.min_points,
                period: p,
                cycles: self.cycles,
            });
        }
        if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(DecompositionError::NonFinite { index, value });
        }

        let trend = centered_moving_average(values, p);

        let detrended: Vec<Option<f64>> = values
            .iter()
            .zip(&trend)
            .map(|(x, t)| t.map(|t| x - t))
            .collect();

        let cycle = seasonal_cycle(&detrended, p)?;
        let seasonal: Vec<f64> = (0..values.len()).map(|i| cycle[i % p]).collect();

        let residual: Vec<Option<f64>> = detrended
            .iter()
            .zip(&seasonal)
            .map(|(d, s)| d.map(|d| d - s))
            .collect();

        debug!(
            len = values.len(),
            period = p,
            defined = trend.iter().filter(|t| t.is_some()).count(),
            "decomposition computed"
        );

        Ok(Decomposition {
            model: self.model,
            period: p,
            start: None,
            observed: values.to_vec(),
            trend,
            seasonal,
            residual,
        })
    }
}

/// Filter weights for a centered moving average spanning one period.
fn trend_weights(period: usize) -> Vec<f64> {
    let p = period as f64;
    if period % 2 == 0 {
        let mut w = vec![1.0 / p; period + 1];
        w[0] = 0.5 / p;
        w[period] = 0.5 / p;
        w
    } else {
        vec![1.0 / p; period]
    }
}

fn centered_moving_average(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let weights = trend_weights(period);
    let half = period / 2;
    let n = values.len();
    let mut trend = vec![None; n];

    if n <= 2 * half {
        return trend;
    }

    for (i, slot) in trend.iter_mut().enumerate().take(n - half).skip(half) {
        let window = &values[i - half..=i + half];
        let sum: f64 = window.iter().zip(&weights).map(|(x, w)| x * w).sum();
        *slot = Some(sum);
    }
    trend
}

/// Mean detrended value per phase, centred to sum to zero.
fn seasonal_cycle(detrended: &[Option<f64>], period: usize) -> Result<Vec<f64>, DecompositionError> {
    let mut cycle = Vec::with_capacity(period);
    for phase in 0..period {
        let (sum, count) = detrended
            .iter()
            .skip(phase)
            .step_by(period)
            .flatten()
            .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
        if count == 0 {
            return Err(DecompositionError::EmptyPhase { phase });
        }
        cycle.push(sum / count as f64);
    }

    let mean = cycle.iter().sum::<f64>() / period as f64;
    for v in &mut cycle {
        *v -= mean;
    }
    Ok(cycle)
}
