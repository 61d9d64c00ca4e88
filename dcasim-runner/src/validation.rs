//! Ticker validation with an explicit memo cache.
//!
//! The cache is owned by the caller and handed to each [`TickerValidator`];
//! nothing here is global. Entries live as long as the cache does.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use dcasim_core::data::{DataError, PriceSource};

/// Days of trailing history fetched to decide whether a ticker exists.
pub const VALIDATION_WINDOW_DAYS: i64 = 30;

/// Outcome of checking one ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickerStatus {
    Valid,
    Unknown,
}

/// Memoized ticker statuses keyed by upper-cased symbol.
#[derive(Debug, Default)]
pub struct ValidationCache {
    entries: Mutex<HashMap<String, TickerStatus>>,
}

impl ValidationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, ticker: &str) -> Option<TickerStatus> {
        self.lock().get(&ticker.to_uppercase()).copied()
    }

    pub fn insert(&self, ticker: &str, status: TickerStatus) {
        self.lock().insert(ticker.to_uppercase(), status);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, TickerStatus>> {
        // A poisoned map is still a valid map
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Checks tickers against a price source, consulting the cache first.
pub struct TickerValidator<'a> {
    source: &'a dyn PriceSource,
    cache: &'a ValidationCache,
}

impl<'a> TickerValidator<'a> {
    pub fn new(source: &'a dyn PriceSource, cache: &'a ValidationCache) -> Self {
        Self { source, cache }
    }

    /// `Valid` if the source has any close in the 30 days up to `today`.
    ///
    /// Network failures are returned and not cached, so a later call retries.
    pub fn check(&self, ticker: &str, today: NaiveDate) -> Result<TickerStatus, DataError> {
        let ticker = ticker.trim().to_uppercase();
        if ticker.is_empty() {
            return Ok(TickerStatus::Unknown);
        }
        if let Some(status) = self.cache.get(&ticker) {
            debug!(%ticker, ?status, "validation cache hit");
            return Ok(status);
        }

        let start = today - Duration::days(VALIDATION_WINDOW_DAYS);
        let status = match self.source.fetch(&ticker, start, today) {
            Ok(points) if !points.is_empty() => TickerStatus::Valid,
            Ok(_) | Err(DataError::DataUnavailable { .. }) => TickerStatus::Unknown,
            Err(e) => return Err(e),
        };
        self.cache.insert(&ticker, status);
        Ok(status)
    }
}
