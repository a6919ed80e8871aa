//! Observation — one closing price for one ticker at one timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single close observation. `close` is `None` when the source cell was
/// blank or not a finite number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub timestamp: DateTime<Utc>,
    pub close: Option<f64>,
}

impl Observation {
    pub fn new(timestamp: DateTime<Utc>, close: Option<f64>) -> Self {
        Self { timestamp, close }
    }

    pub fn is_missing(&self) -> bool {
        self.close.is_none()
    }
}

/// All observations of one ticker, in source order.
///
/// Timestamps are neither guaranteed unique nor sorted; the resampler
/// establishes time order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerSeries {
    pub ticker: String,
    pub observations: Vec<Observation>,
}

impl TickerSeries {
    pub fn new(ticker: impl Into<String>, observations: Vec<Observation>) -> Self {
        Self {
            ticker: ticker.into(),
            observations,
        }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Number of observations with a usable close.
    pub fn valid_count(&self) -> usize {
        self.observations.iter().filter(|o| !o.is_missing()).count()
    }

    /// Earliest and latest timestamp, if any.
    pub fn span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let first = self.observations.iter().map(|o| o.timestamp).min()?;
        let last = self.observations.iter().map(|o| o.timestamp).max()?;
        Some((first, last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn valid_count_skips_missing() {
        let ts = Utc.with_ymd_and_hms(2018, 1, 2, 0, 0, 0).unwrap();
        let series = TickerSeries::new(
            "AAPL",
            vec![
                Observation::new(ts, Some(1.0)),
                Observation::new(ts, None),
                Observation::new(ts, Some(3.0)),
            ],
        );
        assert_eq!(series.len(), 3);
        assert_eq!(series.valid_count(), 2);
    }

    #[test]
    fn span_ignores_input_order() {
        let late = Utc.with_ymd_and_hms(2019, 6, 1, 0, 0, 0).unwrap();
        let early = Utc.with_ymd_and_hms(2018, 1, 2, 0, 0, 0).unwrap();
        let series = TickerSeries::new(
            "AAPL",
            vec![Observation::new(late, Some(2.0)), Observation::new(early, Some(1.0))],
        );
        assert_eq!(series.span(), Some((early, late)));
        assert_eq!(TickerSeries::new("X", vec![]).span(), None);
    }
}
