//! End-to-end scenarios for the analysis pipeline.
//!
//! Each test builds a small price file in memory (or on disk via tempfile),
//! runs the public pipeline entry points and checks the report.

use chrono::NaiveDate;
use seasonlab_core::config::AnalysisSettings;
use seasonlab_core::data::{write_sample, PriceSource, SampleSpec};
use seasonlab_core::domain::Month;
use seasonlab_core::error::{AnalysisError, Stage};
use seasonlab_core::pipeline::{
    run_analysis, run_batch, AnalysisRequest, DateRange, DecompositionOutcome,
};

// ── Helpers ──────────────────────────────────────────────────────────

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn month(y: i32, m: u32) -> Month {
    Month::new(y, m).unwrap()
}

fn source(csv: &str) -> PriceSource {
    PriceSource::from_bytes("inline", csv.as_bytes()).unwrap()
}

fn request(ticker: &str, start: NaiveDate, end: NaiveDate) -> AnalysisRequest {
    AnalysisRequest::new(ticker, start, end).unwrap()
}

/// Several trading days per month, 2018-01 through 2022-12, in the
/// dataset's own timestamp layout.
fn five_year_csv(ticker: &str) -> String {
    let mut csv = String::from("Date,Open,High,Low,Close,Volume,Brand_Name,Ticker,Industry_Tag,Country\n");
    for year in 2018..=2022 {
        for m in 1..=12u32 {
            for day in [3u32, 10, 17, 24] {
                let close = 100.0 + (year - 2018) as f64 * 20.0 + m as f64 + day as f64 / 10.0;
                csv.push_str(&format!(
                    "{year}-{m:02}-{day:02} 00:00:00-05:00,0,0,0,{close},1000,brand,{ticker},tech,usa\n"
                ));
            }
        }
    }
    csv
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "actual={actual}, expected={expected}"
    );
}

// ── Scenarios ────────────────────────────────────────────────────────

#[test]
fn linear_year_of_monthly_prices() {
    let mut csv = String::from("Ticker,Date,Close\n");
    for i in 0..12u32 {
        let close = 100.0 + 111.0 * i as f64 / 11.0;
        csv.push_str(&format!("AAPL,2018-{:02}-15,{close}\n", i + 1));
    }

    let report = run_analysis(
        &source(&csv),
        &request("AAPL", date(2018, 1, 1), date(2018, 12, 31)),
        &AnalysisSettings::default(),
    )
    .unwrap();

    assert_eq!(report.monthly.len(), 12);
    assert_close(report.summary.min.unwrap(), 100.0);
    assert_close(report.summary.max.unwrap(), 211.0);
    assert_close(report.summary.mean.unwrap(), 155.5);
    assert_eq!(report.summary.first, Some(month(2018, 1)));
    assert_eq!(report.summary.last, Some(month(2018, 12)));

    for i in 0..11 {
        assert!(report.rolling.mean[i].is_none(), "mean defined at {i}");
        assert!(report.rolling.std[i].is_none(), "std defined at {i}");
    }
    assert_close(report.rolling.mean[11].unwrap(), 155.5);
    assert!(report.rolling.std[11].unwrap() > 0.0);

    // 12 points is one cycle; decomposition needs two.
    assert!(matches!(
        report.decomposition,
        DecompositionOutcome::Failed { .. }
    ));
}

#[test]
fn unparseable_date_identifies_the_row() {
    let csv = "Ticker,Date,Close\n\
               AAPL,2018-01-02,100\n\
               AAPL,2018-02-02,101\n\
               TSLA,2018-01-02,300\n\
               TSLA,31/31/2018,301\n\
               TSLA,2018-03-02,302\n";
    let src = source(csv);

    let err = run_analysis(
        &src,
        &request("TSLA", date(2018, 1, 1), date(2018, 12, 31)),
        &AnalysisSettings::default(),
    )
    .unwrap_err();

    match err {
        AnalysisError::Data(e) => {
            assert_eq!(e.rows.len(), 1);
            assert_eq!(e.rows[0].line, 5);
            assert_eq!(e.rows[0].ticker, "TSLA");
            assert_eq!(e.rows[0].raw_date, "31/31/2018");
            assert!(e.to_string().contains("31/31/2018"));
        }
        other => panic!("expected DataError, got {other:?}"),
    }

    // The whole file is rejected, not only the offending ticker.
    let err = run_analysis(
        &src,
        &request("AAPL", date(2018, 1, 1), date(2018, 12, 31)),
        &AnalysisSettings::default(),
    )
    .unwrap_err();
    assert!(matches!(err, AnalysisError::Data(_)));
}

#[test]
fn date_filter_is_inclusive_at_both_ends() {
    let report = run_analysis(
        &source(&five_year_csv("AMZN")),
        &request("AMZN", date(2020, 1, 1), date(2021, 12, 31)),
        &AnalysisSettings::default(),
    )
    .unwrap();

    assert_eq!(report.monthly.len(), 24);
    assert_eq!(report.monthly.start(), Some(month(2020, 1)));
    assert_eq!(report.monthly.end(), Some(month(2021, 12)));
    assert!(report.decomposition.computed().is_some());
}

#[test]
fn single_record_is_insufficient() {
    let csv = "Ticker,Date,Close\nAAPL,2018-01-02,100\nTSLA,2018-01-02,300\nTSLA,2018-02-02,310\n";
    let err = run_analysis(
        &source(csv),
        &request("AAPL", date(2018, 1, 1), date(2018, 12, 31)),
        &AnalysisSettings::default(),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        AnalysisError::InsufficientData {
            stage: Stage::Load,
            found: 1,
            required: 2,
            ..
        }
    ));
}

#[test]
fn filter_with_no_overlap_gives_empty_report() {
    let report = run_analysis(
        &source(&five_year_csv("AAPL")),
        &request("AAPL", date(2010, 1, 1), date(2012, 12, 31)),
        &AnalysisSettings::default(),
    )
    .unwrap();

    assert!(report.is_empty());
    assert_eq!(report.summary.count, 0);
    assert!(report.summary.min.is_none());
    assert!(report.summary.max.is_none());
    assert!(report.summary.mean.is_none());
    assert!(report.summary.first.is_none());
    assert_eq!(report.decomposition, DecompositionOutcome::Skipped);
    assert!(report.rolling.is_empty());
}

#[test]
fn mid_month_end_date_excludes_that_month() {
    let report = run_analysis(
        &source(&five_year_csv("AAPL")),
        &request("AAPL", date(2020, 1, 15), date(2020, 6, 15)),
        &AnalysisSettings::default(),
    )
    .unwrap();

    // January's month end (31st) is inside the range, June's (30th) is not.
    assert_eq!(report.monthly.start(), Some(month(2020, 1)));
    assert_eq!(report.monthly.end(), Some(month(2020, 5)));
}

#[test]
fn missing_closes_and_empty_months_are_filled() {
    let csv = "Ticker,Date,Close\n\
               AAPL,2018-01-05,10\n\
               AAPL,2018-01-12,\n\
               AAPL,2018-01-19,30\n\
               AAPL,2018-04-05,70\n";
    let report = run_analysis(
        &source(csv),
        &request("AAPL", date(2018, 1, 1), date(2018, 12, 31)),
        &AnalysisSettings::default(),
    )
    .unwrap();

    // January: (10 + 20 + 30) / 3; February and March interpolated towards April.
    let values = report.monthly.values();
    assert_eq!(values.len(), 4);
    assert_close(values[0], 20.0);
    assert_close(values[1], 20.0 + 50.0 / 3.0);
    assert_close(values[2], 20.0 + 100.0 / 3.0);
    assert_close(values[3], 70.0);
}

#[test]
fn sample_file_round_trip_through_batch() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prices.csv");

    let spec = SampleSpec {
        tickers: vec!["AAPL".into(), "AMZN".into(), "TSLA".into()],
        start: date(2018, 1, 1),
        end: date(2022, 12, 31),
        missing_fraction: 0.05,
    };
    let file = std::fs::File::create(&path).unwrap();
    let written = write_sample(file, &spec).unwrap();
    assert!(written > 3 * 1200);

    let src = PriceSource::from_path(&path).unwrap();
    let tickers: Vec<String> = vec!["TSLA".into(), "AAPL".into(), "MISSING".into(), "AMZN".into()];
    let range = DateRange::new(date(2018, 1, 1), date(2022, 12, 31)).unwrap();
    let entries = run_batch(&src, &tickers, range, &AnalysisSettings::default()).unwrap();

    assert_eq!(entries.len(), 4);
    for entry in &entries {
        if entry.ticker == "MISSING" {
            assert!(entry.result.as_ref().unwrap_err().is_insufficient_data());
            continue;
        }
        let report = entry.result.as_ref().unwrap();
        assert_eq!(report.ticker, entry.ticker);
        assert_eq!(report.monthly.len(), 60);
        assert_eq!(report.provenance.source_hash, *src.hash());

        let d = report.decomposition.computed().expect("60 months decompose");
        let cycle_sum: f64 = d.seasonal_cycle().iter().sum();
        assert!(cycle_sum.abs() < 1e-9);
        for i in 0..d.len() {
            if let Some(r) = d.reconstruct(i) {
                assert!((r - d.observed[i]).abs() < 1e-9);
            }
        }
    }
}

#[test]
fn batch_rejects_invalid_snapshot_once() {
    let csv = "Ticker,Date,Close\nAAPL,garbage,1\nAAPL,2018-02-01,2\n";
    let range = DateRange::new(date(2018, 1, 1), date(2018, 12, 31)).unwrap();
    let err = run_batch(
        &source(csv),
        &["AAPL".to_string()],
        range,
        &AnalysisSettings::default(),
    )
    .unwrap_err();
    assert!(matches!(err, AnalysisError::Data(_)));
}
