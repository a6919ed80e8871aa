//! Pipeline error taxonomy.
//!
//! Each stage returns one of these; the caller decides how to surface it.
//! Decomposition failures are not errors: they are recorded in the report.

use crate::config::ConfigError;
use crate::data::loader::DataError;
use crate::data::source::SourceError;
use std::fmt;
use thiserror::Error;

/// Pipeline stage that found too little data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Resample,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Load => write!(f, "load"),
            Stage::Resample => write!(f, "resample"),
        }
    }
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    #[error("data error: {0}")]
    Data(#[from] DataError),

    #[error(
        "insufficient data for '{ticker}' ({stage} stage): found {found}, need at least {required}"
    )]
    InsufficientData {
        ticker: String,
        stage: Stage,
        found: usize,
        required: usize,
    },

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

impl AnalysisError {
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, AnalysisError::InsufficientData { .. })
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
