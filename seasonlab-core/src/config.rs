//! Serializable configuration.
//!
//! Nothing in the pipeline reads global state: `AnalysisSettings` is passed
//! explicitly to every stage, and `SeasonLabConfig` is loaded once at startup
//! by the caller.

use crate::decompose::DecompositionModel;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid setting: {0}")]
    Invalid(String),
}

/// Numeric knobs of the analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Trailing window for rolling mean/std, in months.
    pub window: usize,
    /// Decomposition model.
    pub model: DecompositionModel,
    /// Seasonal period, in months.
    pub period: usize,
    /// Full seasonal cycles required before decomposing.
    pub min_cycles: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            window: 12,
            model: DecompositionModel::Additive,
            period: 12,
            min_cycles: 2,
        }
    }
}

impl AnalysisSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window < 2 {
            return Err(ConfigError::Invalid(format!(
                "window must be >= 2 for a sample standard deviation, got {}",
                self.window
            )));
        }
        if self.period < 2 {
            return Err(ConfigError::Invalid(format!(
                "period must be >= 2, got {}",
                self.period
            )));
        }
        if self.min_cycles < 2 {
            return Err(ConfigError::Invalid(format!(
                "min_cycles must be >= 2 so every seasonal phase has a trend value, got {}",
                self.min_cycles
            )));
        }
        Ok(())
    }

    /// Whole cycles the decomposer requires; never fewer than two.
    pub fn required_cycles(&self) -> usize {
        self.min_cycles.max(2)
    }

    /// Minimum monthly points the decomposer accepts.
    pub fn min_decomposition_points(&self) -> usize {
        self.period * self.required_cycles()
    }

    /// BLAKE3 hash of the canonical JSON form, for report provenance.
    pub fn fingerprint(&self) -> String {
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}

/// Where the price file lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub path: PathBuf,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("World-Stock-Prices-Dataset.csv"),
        }
    }
}

/// Request parameters used when the caller does not supply them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestDefaults {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            ticker: "AAPL".to_string(),
            start: NaiveDate::from_ymd_opt(2018, 1, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2022, 12, 31).unwrap_or_default(),
        }
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonLabConfig {
    /// Tickers offered for selection and analysed by `batch`.
    pub tickers: Vec<String>,
    pub source: SourceConfig,
    pub analysis: AnalysisSettings,
    pub defaults: RequestDefaults,
}

impl Default for SeasonLabConfig {
    fn default() -> Self {
        Self {
            tickers: vec!["AAPL".into(), "AMZN".into(), "TSLA".into()],
            source: SourceConfig::default(),
            analysis: AnalysisSettings::default(),
            defaults: RequestDefaults::default(),
        }
    }
}

impl SeasonLabConfig {
    /// Load and validate a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a TOML string. Missing keys take their defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.analysis.validate()?;
        if self.defaults.start > self.defaults.end {
            return Err(ConfigError::Invalid(format!(
                "defaults.start {} is after defaults.end {}",
                self.defaults.start, self.defaults.end
            )));
        }
        Ok(())
    }
}
