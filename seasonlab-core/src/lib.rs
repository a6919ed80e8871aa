//! SeasonLab Core — loading, monthly resampling, seasonal decomposition and
//! rolling statistics for daily stock prices.
//!
//! Pipeline stages, each a pure step returning `Result`:
//! - Loader: parse a price snapshot, validate every date, extract one ticker
//! - Resampler: interpolate missing closes, average per calendar month,
//!   regularize to a gap-free monthly series
//! - Date-range filter on month-end labels
//! - Summary, rolling mean/std and additive decomposition over the result
//!
//! `AnalysisSettings` is passed explicitly to every stage; nothing reads
//! global state.

pub mod config;
pub mod data;
pub mod decompose;
pub mod domain;
pub mod error;
pub mod export;
pub mod indicators;
pub mod pipeline;
pub mod resample;
pub mod summary;

pub use config::{AnalysisSettings, ConfigError, SeasonLabConfig};
pub use data::{DataError, Loader, PriceSource, SourceError};
pub use decompose::{Decomposer, Decomposition, DecompositionError, DecompositionModel};
pub use domain::{Month, MonthlySeries, Observation, TickerSeries};
pub use error::{AnalysisError, Stage};
pub use indicators::RollingStats;
pub use pipeline::{
    run_analysis, run_batch, AnalysisReport, AnalysisRequest, BatchEntry, DateRange,
    DecompositionOutcome, RequestError,
};
pub use resample::resample_monthly;
pub use summary::Summary;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything `run_batch` shares across threads is
    /// Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Snapshot
        require_send::<data::PriceSource>();
        require_sync::<data::PriceSource>();
        require_send::<data::Loader<'static>>();
        require_sync::<data::Loader<'static>>();

        // Domain types
        require_send::<domain::Month>();
        require_sync::<domain::Month>();
        require_send::<domain::TickerSeries>();
        require_sync::<domain::TickerSeries>();
        require_send::<domain::MonthlySeries>();
        require_sync::<domain::MonthlySeries>();
        require_send::<domain::SourceHash>();
        require_sync::<domain::SourceHash>();

        // Settings and outputs
        require_send::<config::AnalysisSettings>();
        require_sync::<config::AnalysisSettings>();
        require_send::<pipeline::AnalysisReport>();
        require_sync::<pipeline::AnalysisReport>();
        require_send::<pipeline::BatchEntry>();
        require_send::<error::AnalysisError>();
        require_sync::<error::AnalysisError>();

        // Rolling statistics
        require_send::<indicators::RollingMean>();
        require_sync::<indicators::RollingMean>();
        require_send::<indicators::RollingStd>();
        require_sync::<indicators::RollingStd>();
    }

    /// Rolling statistics are usable as trait objects.
    #[test]
    fn rolling_statistics_are_object_safe() {
        let stats: Vec<Box<dyn indicators::RollingStatistic>> = vec![
            Box::new(indicators::RollingMean::new(3)),
            Box::new(indicators::RollingStd::new(3)),
        ];
        let values = [1.0, 2.0, 3.0, 4.0];
        for stat in &stats {
            let out = stat.compute(&values);
            assert_eq!(out.len(), values.len());
            assert_eq!(out.iter().take_while(|v| v.is_none()).count(), stat.lookback());
        }
    }
}
