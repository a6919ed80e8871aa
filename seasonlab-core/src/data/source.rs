//! Price source snapshot.
//!
//! The source file is read exactly once into memory. The snapshot keeps the
//! raw cell text of the required columns plus a BLAKE3 hash of the bytes, so
//! every report can name the data it was computed from.

use super::schema::{SchemaError, SourceSchema};
use crate::domain::SourceHash;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors reading or framing the source file.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read source '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid source schema: {0}")]
    Schema(#[from] SchemaError),
}

/// One data row, restricted to the required columns.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow {
    /// 1-based line number in the file (the header is line 1).
    pub line: u64,
    pub ticker: String,
    pub date: String,
    /// `None` for blank or non-numeric cells.
    pub close: Option<f64>,
}

/// Immutable in-memory snapshot of a price source.
#[derive(Debug, Clone)]
pub struct PriceSource {
    origin: String,
    hash: SourceHash,
    rows: Vec<SourceRow>,
}

impl PriceSource {
    /// Read and parse a source file.
    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        let bytes = std::fs::read(path).map_err(|e| SourceError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_bytes(path.display().to_string(), &bytes)
    }

    /// Read a source from any reader. `origin` is a label for provenance.
    pub fn from_reader<R: Read>(origin: impl Into<String>, mut reader: R) -> Result<Self, SourceError> {
        let origin = origin.into();
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).map_err(|e| SourceError::Io {
            path: PathBuf::from(&origin),
            source: e,
        })?;
        Self::from_bytes(origin, &bytes)
    }

    /// Parse a source from raw bytes.
    pub fn from_bytes(origin: impl Into<String>, bytes: &[u8]) -> Result<Self, SourceError> {
        let origin = origin.into();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes);

        let columns = SourceSchema::resolve(reader.headers()?)?;

        let mut rows = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = record?;
            let line = record
                .position()
                .map(|p| p.line())
                .unwrap_or(i as u64 + 2);
            let cell = |idx: usize| record.get(idx).unwrap_or("").trim();

            rows.push(SourceRow {
                line,
                ticker: cell(columns.ticker).to_string(),
                date: cell(columns.date).to_string(),
                close: parse_close(cell(columns.close)),
            });
        }

        let hash = SourceHash::from_bytes(bytes);
        debug!(origin = %origin, rows = rows.len(), hash = %hash.short(), "source snapshot read");

        Ok(Self { origin, hash, rows })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn hash(&self) -> &SourceHash {
        &self.hash
    }

    pub fn rows(&self) -> &[SourceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Blank, non-numeric and non-finite closes are all treated as missing.
fn parse_close(cell: &str) -> Option<f64> {
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}
