//! Synthetic price files for demos, tests and benchmarks.
//!
//! Produces a daily random walk per ticker with a mild annual cycle, in the
//! same column layout as the real price dataset. Output is deterministic: the
//! RNG is seeded from a BLAKE3 hash of the ticker name.

use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::Write;

/// What to generate.
#[derive(Debug, Clone)]
pub struct SampleSpec {
    pub tickers: Vec<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Fraction of rows whose Close cell is left blank (0.0..=1.0).
    pub missing_fraction: f64,
}

/// One generated row.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRow {
    pub ticker: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: Option<f64>,
    pub volume: u64,
}

/// Generate weekday rows for one ticker between `start` and `end` inclusive.
pub fn generate_rows(ticker: &str, start: NaiveDate, end: NaiveDate, missing_fraction: f64) -> Vec<SampleRow> {
    let seed: [u8; 32] = *blake3::hash(ticker.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);
    let missing_fraction = missing_fraction.clamp(0.0, 1.0);

    let mut rows = Vec::new();
    let mut price = 50.0 + f64::from(seed[0]);
    let mut current = start;

    while current <= end {
        if matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            current += chrono::Duration::days(1);
            continue;
        }

        let phase = f64::from(current.ordinal0()) / 365.0 * std::f64::consts::TAU;
        let seasonal_drift = 0.002 * phase.sin();
        let daily_return: f64 = rng.gen_range(-0.02..0.02) + seasonal_drift;

        let open = price;
        let close = (price * (1.0 + daily_return)).max(0.01);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
        let volume = rng.gen_range(500_000..5_000_000u64);
        let blank = missing_fraction > 0.0 && rng.gen_bool(missing_fraction);

        rows.push(SampleRow {
            ticker: ticker.to_string(),
            date: current,
            open,
            high,
            low,
            close: if blank { None } else { Some(close) },
            volume,
        });

        price = close;
        current += chrono::Duration::days(1);
    }

    rows
}

/// Write a sample file as CSV. Returns the number of data rows written.
pub fn write_sample<W: Write>(writer: W, spec: &SampleSpec) -> Result<usize, csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["Date", "Open", "High", "Low", "Close", "Volume", "Ticker"])?;

    let mut written = 0;
    for ticker in &spec.tickers {
        for row in generate_rows(ticker, spec.start, spec.end, spec.missing_fraction) {
            wtr.write_record([
                format!("{} 00:00:00-05:00", row.date.format("%Y-%m-%d")),
                format!("{:.4}", row.open),
                format!("{:.4}", row.high),
                format!("{:.4}", row.low),
                row.close.map(|c| format!("{c:.4}")).unwrap_or_default(),
                row.volume.to_string(),
                row.ticker.clone(),
            ])?;
            written += 1;
        }
    }

    wtr.flush()?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn skips_weekends() {
        // 2024-01-06 is a Saturday, 2024-01-07 a Sunday.
        let rows = generate_rows("SPY", date("2024-01-05"), date("2024-01-08"), 0.0);
        let dates: Vec<NaiveDate> = rows.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![date("2024-01-05"), date("2024-01-08")]);
    }

    #[test]
    fn deterministic_per_ticker() {
        let a = generate_rows("AAPL", date("2018-01-01"), date("2018-03-01"), 0.1);
        let b = generate_rows("AAPL", date("2018-01-01"), date("2018-03-01"), 0.1);
        let c = generate_rows("TSLA", date("2018-01-01"), date("2018-03-01"), 0.1);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn bars_are_sane() {
        for row in generate_rows("AMZN", date("2018-01-01"), date("2019-01-01"), 0.0) {
            let close = row.close.unwrap();
            assert!(row.high >= row.open.max(close));
            assert!(row.low <= row.open.min(close));
            assert!(close > 0.0);
        }
    }

    #[test]
    fn missing_fraction_blanks_some_closes() {
        let rows = generate_rows("AAPL", date("2018-01-01"), date("2019-12-31"), 0.2);
        let missing = rows.iter().filter(|r| r.close.is_none()).count();
        assert!(missing > 0);
        assert!(missing < rows.len() / 2);

        let none = generate_rows("AAPL", date("2018-01-01"), date("2019-12-31"), 0.0);
        assert!(none.iter().all(|r| r.close.is_some()));
    }

    #[test]
    fn write_sample_emits_header_and_rows() {
        let spec = SampleSpec {
            tickers: vec!["AAPL".into(), "TSLA".into()],
            start: date("2018-01-01"),
            end: date("2018-01-31"),
            missing_fraction: 0.0,
        };
        let mut buf = Vec::new();
        let written = write_sample(&mut buf, &spec).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), written + 1);
        assert!(text.starts_with("Date,Open,High,Low,Close,Volume,Ticker"));
        assert!(text.contains("2018-01-02 00:00:00-05:00"));
        assert_eq!(written, 2 * 23);
    }
}
