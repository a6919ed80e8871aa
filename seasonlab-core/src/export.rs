//! Report export — JSON, CSV and Markdown.
//!
//! - **JSON**: the whole report with a `schema_version` field. Newer versions
//!   are rejected on import.
//! - **CSV**: one row per month, undefined values as empty cells.
//! - **Markdown**: a human-readable summary of one report.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::pipeline::{AnalysisReport, DecompositionOutcome, SCHEMA_VERSION};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported schema version {found} (max supported: {supported})")]
    UnsupportedSchema { found: u32, supported: u32 },

    #[error("report field '{field}' has {found} values, expected {expected} (one per month)")]
    Inconsistent {
        field: &'static str,
        expected: usize,
        found: usize,
    },
}

/// Column order of the monthly CSV export.
pub const CSV_COLUMNS: [&str; 7] = [
    "month",
    "close",
    "trend",
    "seasonal",
    "residual",
    "rolling_mean",
    "rolling_std",
];

// ─── JSON export ────────────────────────────────────────────────────

pub fn export_json(report: &AnalysisReport) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Deserialize a report, rejecting schema versions newer than this build
/// and per-month sequences whose length differs from the monthly series.
pub fn import_json(json: &str) -> Result<AnalysisReport, ExportError> {
    let report: AnalysisReport = serde_json::from_str(json)?;
    if report.schema_version > SCHEMA_VERSION {
        return Err(ExportError::UnsupportedSchema {
            found: report.schema_version,
            supported: SCHEMA_VERSION,
        });
    }
    check_lengths(&report)?;
    Ok(report)
}

fn check_lengths(report: &AnalysisReport) -> Result<(), ExportError> {
    let expected = report.monthly.len();
    let mut fields = vec![
        ("rolling.mean", report.rolling.mean.len()),
        ("rolling.std", report.rolling.std.len()),
    ];
    if let Some(d) = report.decomposition.computed() {
        fields.extend([
            ("decomposition.observed", d.observed.len()),
            ("decomposition.trend", d.trend.len()),
            ("decomposition.seasonal", d.seasonal.len()),
            ("decomposition.residual", d.residual.len()),
        ]);
    }
    match fields.into_iter().find(|(_, found)| *found != expected) {
        Some((field, found)) => Err(ExportError::Inconsistent {
            field,
            expected,
            found,
        }),
        None => Ok(()),
    }
}

// ─── CSV export ─────────────────────────────────────────────────────

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Monthly series with its components, one row per month.
pub fn export_monthly_csv(report: &AnalysisReport) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(CSV_COLUMNS)?;

    let decomposition = report.decomposition.computed();
    for (i, point) in report.monthly.points().iter().enumerate() {
        let trend = decomposition.and_then(|d| d.trend.get(i).copied().flatten());
        let seasonal = decomposition.and_then(|d| d.seasonal.get(i).copied());
        let residual = decomposition.and_then(|d| d.residual.get(i).copied().flatten());
        wtr.write_record([
            point.month.to_string(),
            point.value.to_string(),
            cell(trend),
            cell(seasonal),
            cell(residual),
            cell(report.rolling.mean.get(i).copied().flatten()),
            cell(report.rolling.std.get(i).copied().flatten()),
        ])?;
    }

    let data = wtr.into_inner().map_err(|e| {
        csv::Error::from(std::io::Error::new(e.error().kind(), e.error().to_string()))
    })?;
    Ok(String::from_utf8_lossy(&data).into_owned())
}

// ─── Files ──────────────────────────────────────────────────────────

/// Write `report.json` and `monthly.csv` into `{dir}/{ticker}/`.
///
/// Returns the directory written.
pub fn save_report(report: &AnalysisReport, dir: &Path) -> Result<PathBuf, ExportError> {
    let run_dir = dir.join(&report.ticker);
    let io = |path: &Path| {
        let path = path.to_path_buf();
        move |source| ExportError::Io { path, source }
    };

    std::fs::create_dir_all(&run_dir).map_err(io(&run_dir))?;

    let json_path = run_dir.join("report.json");
    std::fs::write(&json_path, export_json(report)?).map_err(io(&json_path))?;

    let csv_path = run_dir.join("monthly.csv");
    std::fs::write(&csv_path, export_monthly_csv(report)?).map_err(io(&csv_path))?;

    Ok(run_dir)
}

/// Load a report written by `save_report`.
pub fn load_report(dir: &Path) -> Result<AnalysisReport, ExportError> {
    let path = dir.join("report.json");
    let json = std::fs::read_to_string(&path).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    import_json(&json)
}

// ─── Markdown ───────────────────────────────────────────────────────

fn fmt_opt(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_else(|| "—".into())
}

/// Markdown report for a single analysis.
pub fn render_markdown(report: &AnalysisReport) -> String {
    let mut md = String::with_capacity(2048);
    let s = &report.summary;

    let _ = writeln!(md, "# {} monthly analysis\n", report.ticker);
    md.push_str("| Field | Value |\n| --- | --- |\n");
    let _ = writeln!(md, "| Range | {} to {} |", report.start, report.end);
    let _ = writeln!(md, "| Months | {} |", s.count);
    let _ = writeln!(md, "| Min close | {} |", fmt_opt(s.min));
    let _ = writeln!(md, "| Max close | {} |", fmt_opt(s.max));
    let _ = writeln!(md, "| Mean close | {} |", fmt_opt(s.mean));
    let _ = writeln!(md, "| Rolling window | {} |", report.rolling.window);
    let _ = writeln!(
        md,
        "| Source | {} ({}) |",
        report.provenance.source,
        report.provenance.source_hash.short()
    );
    md.push('\n');

    md.push_str("## Decomposition\n\n");
    match &report.decomposition {
        DecompositionOutcome::Computed(d) => {
            md.push_str("| Phase | Seasonal |\n| --- | --- |\n");
            for (i, v) in d.seasonal_cycle().iter().enumerate() {
                let label = report
                    .monthly
                    .month_at(i)
                    .map(|m| format!("{:02}", m.month()))
                    .unwrap_or_else(|| i.to_string());
                let _ = writeln!(md, "| {label} | {v:.4} |");
            }
        }
        DecompositionOutcome::Skipped => md.push_str("Skipped: no months in range.\n"),
        DecompositionOutcome::Failed { reason } => {
            let _ = writeln!(md, "Not available: {reason}");
        }
    }

    md
}
