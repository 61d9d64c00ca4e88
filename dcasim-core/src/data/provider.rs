//! Price source trait and structured error types.
//!
//! The engine never fetches prices itself. Callers hand it observations
//! obtained through a [`PriceSource`], so sources can be swapped or mocked.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::PricePoint;

/// Structured error types for price lookups.
///
/// `DataUnavailable` and `NetworkError` are the two collaborator failures a
/// caller must expect; both are terminal for a single simulation call.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("no price data for '{ticker}': {reason}")]
    DataUnavailable { ticker: String, reason: String },

    #[error("network error: {0}")]
    NetworkError(String),

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed price data in {path}: {reason}")]
    Parse { path: String, reason: String },
}

impl DataError {
    pub fn unavailable(ticker: &str, reason: impl Into<String>) -> Self {
        Self::DataUnavailable {
            ticker: ticker.to_string(),
            reason: reason.into(),
        }
    }

    /// True for failures that might succeed if tried again later.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::NetworkError(_))
    }
}

/// Where a price history came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    InMemory,
    CsvImport,
    Synthetic,
}

/// Trait for price providers.
///
/// `fetch` returns the observed closes for `ticker` in `[start, end]`
/// inclusive, possibly with gaps for non-trading days.
pub trait PriceSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// What kind of data this source produces.
    fn kind(&self) -> SourceKind;

    /// Fetch daily closes for `ticker` over `[start, end]`.
    fn fetch(&self, ticker: &str, start: NaiveDate, end: NaiveDate)
        -> Result<Vec<PricePoint>, DataError>;
}

