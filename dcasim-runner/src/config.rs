//! TOML simulation configuration.
//!
//! ```toml
//! [simulation]
//! ticker = "AAPL"
//! start_date = "2021-01-01"
//! end_date = "2022-01-01"
//! monthly_amount = 1000.0
//! starting_amount = 1000.0
//! day_of_investment = 1
//!
//! [data]
//! source = "csv"
//! path = "data/prices"
//! ```
//!
//! Every field has a default, so an empty file is a valid config.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use dcasim_core::{ContributionPlan, SimulationRequest};

/// Content hash identifying one simulation setup.
pub type RunId = String;

/// Errors from loading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SimulationConfig {
    #[serde(default)]
    pub simulation: SimulationSection,
    #[serde(default)]
    pub data: DataConfig,
}

/// The `[simulation]` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationSection {
    pub ticker: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub monthly_amount: f64,
    pub starting_amount: f64,
    pub day_of_investment: u32,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            ticker: "AAPL".to_string(),
            start_date: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap_or_default(),
            monthly_amount: 1000.0,
            starting_amount: 1000.0,
            day_of_investment: 1,
        }
    }
}

/// Where prices come from.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DataSourceKind {
    #[default]
    Csv,
    Synthetic,
}

/// The `[data]` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DataConfig {
    pub source: DataSourceKind,
    /// A single CSV file, or a directory of `<TICKER>.csv` files.
    pub path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            source: DataSourceKind::Csv,
            path: PathBuf::from("data"),
        }
    }
}

impl SimulationConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Build the engine request. Validation happens in the runner.
    pub fn to_request(&self) -> SimulationRequest {
        let s = &self.simulation;
        SimulationRequest::new(
            &s.ticker,
            s.start_date,
            s.end_date,
            ContributionPlan::new(s.starting_amount, s.monthly_amount, s.day_of_investment),
        )
    }

    /// BLAKE3 over the canonical JSON of the config, ticker normalized.
    ///
    /// Equal configs share an artifact directory; any change to the plan or
    /// the data section (including `data.path`) yields a new ID.
    pub fn run_id(&self) -> RunId {
        let mut canonical = self.clone();
        canonical.simulation.ticker = self.to_request().ticker;
        let json = serde_json::to_string(&canonical).unwrap_or_else(|_| format!("{canonical:?}"));
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}

/// BLAKE3 over the normalized request fields, the price source name and the
/// hash of the prices the run actually used.
pub fn request_id(request: &SimulationRequest, source: &str, dataset_hash: &str) -> RunId {
    let mut hasher = blake3::Hasher::new();
    hasher.update(request.ticker.as_bytes());
    hasher.update(request.start_date.to_string().as_bytes());
    hasher.update(request.end_date.to_string().as_bytes());
    hasher.update(&request.plan.starting_amount.to_le_bytes());
    hasher.update(&request.plan.monthly_amount.to_le_bytes());
    hasher.update(&request.plan.day_of_month.to_le_bytes());
    hasher.update(source.as_bytes());
    hasher.update(dataset_hash.as_bytes());
    hasher.finalize().to_hex().to_string()
}
