//! Synthetic price source for demos, benchmarks and offline development.
//!
//! Produces a weekday-only random walk seeded from the ticker name, so the
//! same ticker always yields the same history. The walk is anchored at a fixed
//! epoch: a given date has the same close no matter which window is requested.
//! Results built on synthetic data are tagged as such by the runner.

use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::provider::{DataError, PriceSource, SourceKind};
use crate::domain::PricePoint;

/// Deterministic random-walk closes.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    epoch: NaiveDate,
    start_price: f64,
    daily_range: f64,
}

impl SyntheticSource {
    pub fn new() -> Self {
        Self {
            epoch: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap_or(NaiveDate::MIN),
            start_price: 100.0,
            daily_range: 0.02,
        }
    }

    /// Close on the epoch date.
    pub fn with_start_price(mut self, price: f64) -> Self {
        self.start_price = price;
        self
    }

    /// Maximum absolute daily return, as a fraction.
    pub fn with_daily_range(mut self, range: f64) -> Self {
        self.daily_range = range.abs();
        self
    }

    pub fn epoch(&self) -> NaiveDate {
        self.epoch
    }

    fn seed(ticker: &str) -> [u8; 32] {
        *blake3::hash(ticker.to_uppercase().as_bytes()).as_bytes()
    }
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceSource for SyntheticSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Synthetic
    }

    fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>, DataError> {
        if end < self.epoch || start > end {
            return Err(DataError::unavailable(
                ticker,
                format!("synthetic history starts at {}", self.epoch),
            ));
        }

        let mut rng = StdRng::from_seed(Self::seed(ticker));
        let mut price = self.start_price;
        let mut points = Vec::new();

        for date in self.epoch.iter_days().take_while(|d| *d <= end) {
            if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                continue;
            }
            let daily_return: f64 = if self.daily_range > 0.0 {
                rng.gen_range(-self.daily_range..self.daily_range)
            } else {
                0.0
            };
            // 3 bp daily drift
            price = (price * (1.0 + daily_return + 0.0003)).max(0.01);
            if date >= start {
                points.push(PricePoint::new(date, price));
            }
        }

        if points.is_empty() {
            return Err(DataError::unavailable(
                ticker,
                format!("no synthetic trading days between {start} and {end}"),
            ));
        }
        Ok(points)
    }
}
