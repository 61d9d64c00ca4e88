//! In-memory price source for embedding and tests.

use std::collections::HashMap;

use chrono::NaiveDate;

use super::provider::{DataError, PriceSource, SourceKind};
use crate::domain::PricePoint;

/// Holds pre-loaded closes per ticker.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    prices: HashMap<String, Vec<PricePoint>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the history for `ticker`. Tickers are case-insensitive.
    pub fn insert(&mut self, ticker: &str, mut points: Vec<PricePoint>) {
        points.sort_by_key(|p| p.date);
        self.prices.insert(ticker.to_uppercase(), points);
    }

    pub fn with_ticker(mut self, ticker: &str, points: Vec<PricePoint>) -> Self {
        self.insert(ticker, points);
        self
    }

    pub fn tickers(&self) -> Vec<&str> {
        let mut tickers: Vec<&str> = self.prices.keys().map(|s| s.as_str()).collect();
        tickers.sort_unstable();
        tickers
    }
}

impl PriceSource for InMemorySource {
    fn name(&self) -> &str {
        "in_memory"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::InMemory
    }

    fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>, DataError> {
        let history = self
            .prices
            .get(&ticker.to_uppercase())
            .ok_or_else(|| DataError::unavailable(ticker, "unknown ticker"))?;

        let points: Vec<PricePoint> = history
            .iter()
            .filter(|p| p.date >= start && p.date <= end)
            .copied()
            .collect();

        if points.is_empty() {
            return Err(DataError::unavailable(
                ticker,
                format!("no prices between {start} and {end}"),
            ));
        }
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn fetch_filters_to_window() {
        let source = InMemorySource::new().with_ticker(
            "spy",
            vec![
                PricePoint::new(d(3), 3.0),
                PricePoint::new(d(1), 1.0),
                PricePoint::new(d(2), 2.0),
            ],
        );
        let points = source.fetch("SPY", d(2), d(3)).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, d(2));
        assert_eq!(source.tickers(), vec!["SPY"]);
    }

    #[test]
    fn unknown_ticker_is_unavailable() {
        let source = InMemorySource::new();
        let err = source.fetch("NOPE", d(1), d(2)).unwrap_err();
        assert!(matches!(err, DataError::DataUnavailable { .. }));
        assert!(!err.is_transient());
    }

    #[test]
    fn empty_window_is_unavailable() {
        let source = InMemorySource::new().with_ticker("SPY", vec![PricePoint::new(d(1), 1.0)]);
        assert!(source.fetch("SPY", d(5), d(9)).is_err());
    }
}
