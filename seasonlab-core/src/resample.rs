//! Cleaner/resampler: ticker series → gap-free monthly series.
//!
//! 1. Order observations by timestamp (stable, so duplicates keep source order).
//! 2. Fill missing closes by linear interpolation over that order. Positions
//!    are equally spaced; calendar distance is ignored. Missing values before
//!    the first valid close are dropped, missing values after the last valid
//!    close repeat it.
//! 3. Average closes per UTC calendar month.
//! 4. Regularize to monthly frequency: a month with no rows between the first
//!    and last populated month is interpolated from its neighbours.

use crate::domain::{Month, MonthlySeries, TickerSeries};
use crate::error::{AnalysisError, Stage};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Minimum monthly points the resampler will return.
pub const MIN_MONTHLY_POINTS: usize = 2;

/// Linear interpolation over positions.
///
/// Interior gaps are filled on the straight line between their neighbours,
/// trailing gaps repeat the last value, leading gaps stay `None`.
pub fn interpolate_linear(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut out = values.to_vec();
    let known: Vec<usize> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|_| i))
        .collect();

    let Some(&last) = known.last() else {
        return out;
    };

    for pair in known.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if b - a < 2 {
            continue;
        }
        let (va, vb) = (values[a].unwrap_or_default(), values[b].unwrap_or_default());
        let span = (b - a) as f64;
        for (offset, slot) in out[a + 1..b].iter_mut().enumerate() {
            let t = (offset + 1) as f64 / span;
            *slot = Some(va + (vb - va) * t);
        }
    }

    let tail = values[last];
    for slot in out[last + 1..].iter_mut() {
        *slot = tail;
    }

    out
}

/// Resample a ticker series to a gap-free monthly mean series.
pub fn resample_monthly(series: &TickerSeries) -> Result<MonthlySeries, AnalysisError> {
    let mut ordered: Vec<_> = series.observations.iter().collect();
    ordered.sort_by_key(|o| o.timestamp);

    let closes: Vec<Option<f64>> = ordered.iter().map(|o| o.close).collect();
    let missing = closes.iter().filter(|c| c.is_none()).count();
    let filled = interpolate_linear(&closes);

    let mut buckets: BTreeMap<Month, (f64, usize)> = BTreeMap::new();
    for (obs, close) in ordered.iter().zip(&filled) {
        if let Some(close) = close {
            let bucket = buckets.entry(Month::of_timestamp(&obs.timestamp)).or_default();
            bucket.0 += close;
            bucket.1 += 1;
        }
    }

    let (Some(&first), Some(&last)) = (buckets.keys().next(), buckets.keys().next_back()) else {
        return Err(AnalysisError::InsufficientData {
            ticker: series.ticker.clone(),
            stage: Stage::Resample,
            found: 0,
            required: MIN_MONTHLY_POINTS,
        });
    };

    let span = first.months_until(&last) as u32 + 1;
    let grid: Vec<Option<f64>> = (0..span)
        .map(|i| {
            buckets
                .get(&first.plus(i))
                .map(|(sum, count)| sum / *count as f64)
        })
        .collect();

    let empty_months = grid.iter().filter(|v| v.is_none()).count();
    if empty_months > 0 {
        warn!(
            ticker = %series.ticker,
            empty_months,
            "months without observations were interpolated"
        );
    }

    let values: Vec<f64> = interpolate_linear(&grid).into_iter().flatten().collect();

    if values.len() < MIN_MONTHLY_POINTS {
        return Err(AnalysisError::InsufficientData {
            ticker: series.ticker.clone(),
            stage: Stage::Resample,
            found: values.len(),
            required: MIN_MONTHLY_POINTS,
        });
    }

    debug!(
        ticker = %series.ticker,
        observations = series.len(),
        interpolated = missing,
        months = values.len(),
        "resampled to monthly"
    );

    Ok(MonthlySeries::new(first, values))
}
