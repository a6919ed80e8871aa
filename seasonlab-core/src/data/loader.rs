//! Loader — validates timestamps across the snapshot and extracts one
//! ticker's close series.

use super::source::PriceSource;
use super::timestamp::parse_timestamp;
use crate::domain::{Observation, TickerSeries};
use crate::error::{AnalysisError, Stage};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Minimum number of records a ticker must have.
pub const MIN_RECORDS: usize = 2;

/// How many offending rows are spelled out in an error message.
const MAX_LISTED_ROWS: usize = 5;

/// A row whose `Date` cell could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidRow {
    pub line: u64,
    pub ticker: String,
    pub raw_date: String,
}

/// The source contains unparseable dates. Every offending row is listed.
#[derive(Debug, Clone, Error)]
#[error("{} row(s) with unparseable dates: {}", .rows.len(), describe_rows(.rows))]
pub struct DataError {
    pub rows: Vec<InvalidRow>,
}

fn describe_rows(rows: &[InvalidRow]) -> String {
    let mut parts: Vec<String> = rows
        .iter()
        .take(MAX_LISTED_ROWS)
        .map(|r| format!("line {} ({} '{}')", r.line, r.ticker, r.raw_date))
        .collect();
    if rows.len() > MAX_LISTED_ROWS {
        parts.push(format!("and {} more", rows.len() - MAX_LISTED_ROWS));
    }
    parts.join(", ")
}

/// Per-ticker overview of a source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerSummary {
    pub ticker: String,
    pub rows: usize,
    pub missing_closes: usize,
    pub first: DateTime<Utc>,
    pub last: DateTime<Utc>,
}

/// A snapshot whose dates have all been parsed.
///
/// Construction fails if any row in the source has an unparseable date,
/// whichever ticker it belongs to.
#[derive(Debug)]
pub struct Loader<'a> {
    source: &'a PriceSource,
    timestamps: Vec<DateTime<Utc>>,
}

impl<'a> Loader<'a> {
    pub fn new(source: &'a PriceSource) -> Result<Self, DataError> {
        let mut timestamps = Vec::with_capacity(source.len());
        let mut invalid = Vec::new();

        for row in source.rows() {
            match parse_timestamp(&row.date) {
                Some(ts) => timestamps.push(ts),
                None => invalid.push(InvalidRow {
                    line: row.line,
                    ticker: row.ticker.clone(),
                    raw_date: row.date.clone(),
                }),
            }
        }

        if !invalid.is_empty() {
            warn!(count = invalid.len(), "source has unparseable dates");
            return Err(DataError { rows: invalid });
        }

        Ok(Self { source, timestamps })
    }

    pub fn source(&self) -> &PriceSource {
        self.source
    }

    /// Extract the close series for `ticker` (exact match).
    pub fn load(&self, ticker: &str) -> Result<TickerSeries, AnalysisError> {
        let observations: Vec<Observation> = self
            .source
            .rows()
            .iter()
            .zip(&self.timestamps)
            .filter(|(row, _)| row.ticker == ticker)
            .map(|(row, ts)| Observation::new(*ts, row.close))
            .collect();

        if observations.len() < MIN_RECORDS {
            return Err(AnalysisError::InsufficientData {
                ticker: ticker.to_string(),
                stage: Stage::Load,
                found: observations.len(),
                required: MIN_RECORDS,
            });
        }

        debug!(ticker, records = observations.len(), "ticker series loaded");
        Ok(TickerSeries::new(ticker, observations))
    }

    /// Every ticker in the source with its row count and time span.
    pub fn tickers(&self) -> Vec<TickerSummary> {
        let mut by_ticker: BTreeMap<&str, TickerSummary> = BTreeMap::new();

        for (row, ts) in self.source.rows().iter().zip(&self.timestamps) {
            let entry = by_ticker
                .entry(row.ticker.as_str())
                .or_insert_with(|| TickerSummary {
                    ticker: row.ticker.clone(),
                    rows: 0,
                    missing_closes: 0,
                    first: *ts,
                    last: *ts,
                });
            entry.rows += 1;
            if row.close.is_none() {
                entry.missing_closes += 1;
            }
            entry.first = entry.first.min(*ts);
            entry.last = entry.last.max(*ts);
        }

        by_ticker.into_values().collect()
    }
}

/// Validate the snapshot and load one ticker.
pub fn load_ticker(source: &PriceSource, ticker: &str) -> Result<TickerSeries, AnalysisError> {
    Loader::new(source)?.load(ticker)
}
