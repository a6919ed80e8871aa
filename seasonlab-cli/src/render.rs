//! Plain-text tables for terminal output.

use std::fmt::Write as _;

use seasonlab_core::data::TickerSummary;
use seasonlab_core::pipeline::{AnalysisReport, BatchEntry, DecompositionOutcome};

fn num(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_else(|| "-".into())
}

/// Summary block plus one row per month.
pub fn report(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let s = &report.summary;

    let _ = writeln!(out);
    let _ = writeln!(out, "=== {} ===", report.ticker);
    let _ = writeln!(out, "Range:          {} to {}", report.start, report.end);
    let _ = writeln!(out, "Months:         {}", s.count);
    let _ = writeln!(out, "Min close:      {}", num(s.min));
    let _ = writeln!(out, "Max close:      {}", num(s.max));
    let _ = writeln!(out, "Mean close:     {}", num(s.mean));
    let _ = writeln!(
        out,
        "Source:         {} ({})",
        report.provenance.source,
        report.provenance.source_hash.short()
    );

    match &report.decomposition {
        DecompositionOutcome::Computed(d) => {
            let _ = writeln!(out, "Decomposition:  additive, period {}", d.period);
        }
        DecompositionOutcome::Skipped => {
            let _ = writeln!(out, "Decomposition:  skipped (no months in range)");
        }
        DecompositionOutcome::Failed { reason } => {
            let _ = writeln!(out, "Decomposition:  not available: {reason}");
        }
    }

    if report.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "No data in the selected range.");
        return out;
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:<8} {:>10} {:>10} {:>9} {:>9} {:>10} {:>9}",
        "Month",
        "Close",
        "Trend",
        "Seasonal",
        "Residual",
        format!("Mean{}", report.rolling.window),
        format!("Std{}", report.rolling.window),
    );
    let _ = writeln!(out, "{}", "-".repeat(71));

    let d = report.decomposition.computed();
    for (i, point) in report.monthly.points().iter().enumerate() {
        let _ = writeln!(
            out,
            "{:<8} {:>10.2} {:>10} {:>9} {:>9} {:>10} {:>9}",
            point.month.to_string(),
            point.value,
            num(d.and_then(|d| d.trend.get(i).copied().flatten())),
            num(d.and_then(|d| d.seasonal.get(i).copied())),
            num(d.and_then(|d| d.residual.get(i).copied().flatten())),
            num(report.rolling.mean.get(i).copied().flatten()),
            num(report.rolling.std.get(i).copied().flatten()),
        );
    }

    out
}

/// One line per ticker of a batch run.
pub fn batch(entries: &[BatchEntry]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<8} {:>7} {:>10} {:>10} {:>10}  Status",
        "Ticker", "Months", "Min", "Max", "Mean"
    );
    let _ = writeln!(out, "{}", "-".repeat(60));

    for entry in entries {
        match &entry.result {
            Ok(r) => {
                let status = match &r.decomposition {
                    DecompositionOutcome::Computed(_) => "ok",
                    DecompositionOutcome::Skipped => "empty range",
                    DecompositionOutcome::Failed { .. } => "no decomposition",
                };
                let _ = writeln!(
                    out,
                    "{:<8} {:>7} {:>10} {:>10} {:>10}  {status}",
                    entry.ticker,
                    r.summary.count,
                    num(r.summary.min),
                    num(r.summary.max),
                    num(r.summary.mean),
                );
            }
            Err(e) => {
                let _ = writeln!(out, "{:<8} error: {e}", entry.ticker);
            }
        }
    }

    out
}

/// Tickers in a source with row counts and time span.
pub fn tickers(summaries: &[TickerSummary]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<8} {:>8} {:>8} {:<12} {:<12}",
        "Ticker", "Rows", "Missing", "First", "Last"
    );
    let _ = writeln!(out, "{}", "-".repeat(52));
    for t in summaries {
        let _ = writeln!(
            out,
            "{:<8} {:>8} {:>8} {:<12} {:<12}",
            t.ticker,
            t.rows,
            t.missing_closes,
            t.first.date_naive().to_string(),
            t.last.date_naive().to_string(),
        );
    }
    out
}
