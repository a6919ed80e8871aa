use csv::StringRecord;

/// Expected columns of a price source.
pub struct SourceSchema;

/// Positions of the required columns within a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    pub ticker: usize,
    pub date: usize,
    pub close: usize,
}

impl SourceSchema {
    pub const TICKER: &'static str = "Ticker";
    pub const DATE: &'static str = "Date";
    pub const CLOSE: &'static str = "Close";

    /// Required column names, in canonical order.
    pub fn required() -> [&'static str; 3] {
        [Self::TICKER, Self::DATE, Self::CLOSE]
    }

    /// Locate the required columns in a header row.
    ///
    /// Matching ignores ASCII case and surrounding whitespace; any other
    /// columns are ignored.
    pub fn resolve(headers: &StringRecord) -> Result<ColumnIndex, SchemaError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| SchemaError::MissingColumn(name.to_string()))
        };

        Ok(ColumnIndex {
            ticker: find(Self::TICKER)?,
            date: find(Self::DATE)?,
            close: find(Self::CLOSE)?,
        })
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("missing required column: {0}")]
    MissingColumn(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_has_all_required_columns() {
        let required = SourceSchema::required();
        assert!(required.contains(&"Ticker"));
        assert!(required.contains(&"Date"));
        assert!(required.contains(&"Close"));
    }

    #[test]
    fn test_resolve_finds_columns_in_any_order() {
        let headers = StringRecord::from(vec!["Date", "Open", "High", "Close", "Volume", "Ticker"]);
        let idx = SourceSchema::resolve(&headers).unwrap();
        assert_eq!(idx, ColumnIndex { ticker: 5, date: 0, close: 3 });
    }

    #[test]
    fn test_resolve_ignores_case_and_whitespace() {
        let headers = StringRecord::from(vec![" ticker", "DATE ", "close"]);
        assert!(SourceSchema::resolve(&headers).is_ok());
    }

    #[test]
    fn test_resolve_rejects_missing_column() {
        let headers = StringRecord::from(vec!["Ticker", "Date", "Open"]);
        let result = SourceSchema::resolve(&headers);
        assert_eq!(result, Err(SchemaError::MissingColumn("Close".into())));
    }
}
