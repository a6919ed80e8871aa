//! Pipeline — wires loader, resampler, filter, summary, rolling stats and
//! decomposition into one report.
//!
//! Two entry points:
//! - `run_analysis()`: one ticker, one date range. Used by `analyze`.
//! - `run_batch()`: many tickers over the same snapshot, in parallel. Used by
//!   `batch`. Each ticker gets its own result; one failure never affects
//!   another.

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::config::AnalysisSettings;
use crate::data::{Loader, PriceSource};
use crate::decompose::{Decomposer, Decomposition};
use crate::domain::{MonthlySeries, SourceHash};
use crate::error::AnalysisError;
use crate::indicators::RollingStats;
use crate::resample::resample_monthly;
use crate::summary::Summary;

/// Current schema version for exported reports.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("start date {start} is after end date {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },

    #[error("ticker must not be empty")]
    EmptyTicker,
}

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RequestError> {
        if start > end {
            return Err(RequestError::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }
}

/// One ticker over one date range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub ticker: String,
    pub range: DateRange,
}

impl AnalysisRequest {
    pub fn new(
        ticker: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Self, RequestError> {
        let ticker = ticker.into();
        if ticker.trim().is_empty() {
            return Err(RequestError::EmptyTicker);
        }
        Ok(Self {
            ticker,
            range: DateRange::new(start, end)?,
        })
    }
}

/// What happened to the decomposition stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DecompositionOutcome {
    Computed(Decomposition),
    /// The filtered series was empty.
    Skipped,
    Failed { reason: String },
}

impl DecompositionOutcome {
    pub fn computed(&self) -> Option<&Decomposition> {
        match self {
            DecompositionOutcome::Computed(d) => Some(d),
            _ => None,
        }
    }
}

/// Where a report's inputs came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    pub source: String,
    pub source_hash: SourceHash,
    pub settings: AnalysisSettings,
    pub settings_hash: String,
}

/// Complete result of one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Date-filtered monthly series.
    pub monthly: MonthlySeries,
    pub summary: Summary,
    pub decomposition: DecompositionOutcome,
    pub rolling: RollingStats,
    pub provenance: Provenance,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl AnalysisReport {
    pub fn is_empty(&self) -> bool {
        self.monthly.is_empty()
    }
}

/// One ticker's outcome within a batch.
#[derive(Debug)]
pub struct BatchEntry {
    pub ticker: String,
    pub result: Result<AnalysisReport, AnalysisError>,
}

/// Run the full pipeline for one request.
///
/// Unparseable dates anywhere in the source, or too little data for the
/// ticker, fail the whole run. A failed decomposition is recorded in the
/// report and everything else is still produced.
pub fn run_analysis(
    source: &PriceSource,
    request: &AnalysisRequest,
    settings: &AnalysisSettings,
) -> Result<AnalysisReport, AnalysisError> {
    settings.validate()?;
    let loader = Loader::new(source)?;
    analyze(&loader, request, settings)
}

/// Run one analysis per ticker over the same snapshot.
///
/// The snapshot is validated once; an invalid snapshot or invalid settings
/// fail the batch as a whole. Results come back in input order.
pub fn run_batch(
    source: &PriceSource,
    tickers: &[String],
    range: DateRange,
    settings: &AnalysisSettings,
) -> Result<Vec<BatchEntry>, AnalysisError> {
    settings.validate()?;
    let loader = Loader::new(source)?;

    let entries = tickers
        .par_iter()
        .map(|ticker| {
            let request = AnalysisRequest {
                ticker: ticker.clone(),
                range,
            };
            BatchEntry {
                ticker: ticker.clone(),
                result: analyze(&loader, &request, settings),
            }
        })
        .collect();

    Ok(entries)
}

#[instrument(skip_all, fields(ticker = %request.ticker))]
fn analyze(
    loader: &Loader<'_>,
    request: &AnalysisRequest,
    settings: &AnalysisSettings,
) -> Result<AnalysisReport, AnalysisError> {
    let series = loader.load(&request.ticker)?;
    let monthly = resample_monthly(&series)?;
    let filtered = monthly.filter_range(request.range.start, request.range.end);

    let summary = Summary::compute(&filtered);
    let rolling = RollingStats::compute(filtered.values(), settings.window);

    let decomposition = if filtered.is_empty() {
        DecompositionOutcome::Skipped
    } else {
        match Decomposer::new(settings).decompose(&filtered) {
            Ok(d) => DecompositionOutcome::Computed(d),
            Err(e) => {
                warn!(error = %e, "decomposition failed");
                DecompositionOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    };

    let source = loader.source();
    let report = AnalysisReport {
        schema_version: SCHEMA_VERSION,
        ticker: request.ticker.clone(),
        start: request.range.start,
        end: request.range.end,
        summary,
        decomposition,
        rolling,
        provenance: Provenance {
            source: source.origin().to_string(),
            source_hash: source.hash().clone(),
            settings: settings.clone(),
            settings_hash: settings.fingerprint(),
        },
        monthly: filtered,
    };

    info!(
        months = report.monthly.len(),
        total_months = monthly.len(),
        decomposed = report.decomposition.computed().is_some(),
        "analysis complete"
    );

    Ok(report)
}
