//! Price points and the contiguous daily price series.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// One observed closing price, as delivered by a price source.
///
/// Raw points may be sparse (weekends, holidays), unsorted, or carry a
/// non-finite close for a day the provider reported without a trade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Gap-free daily closing prices, one entry per calendar day.
///
/// Invariants: dates ascend by exactly one day, every close is finite and > 0,
/// and the series holds at least one day. Produced by
/// [`normalize`](crate::engine::normalize) or checked by [`PriceSeries::new`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from points that already satisfy the invariants.
    pub fn new(points: Vec<PricePoint>) -> Result<Self> {
        if points.is_empty() {
            return Err(EngineError::data_unavailable("price series is empty"));
        }
        for window in points.windows(2) {
            if window[1].date != window[0].date + Duration::days(1) {
                return Err(EngineError::invalid_parameter(
                    "prices",
                    format!(
                        "series is not contiguous between {} and {}",
                        window[0].date, window[1].date
                    ),
                ));
            }
        }
        if let Some(bad) = points.iter().find(|p| !(p.close.is_finite() && p.close > 0.0)) {
            return Err(EngineError::invalid_parameter(
                "prices",
                format!("non-positive close {} on {}", bad.close, bad.date),
            ));
        }
        Ok(Self { points })
    }

    /// Skips the invariant checks; the normalizer upholds them by construction.
    pub(crate) fn from_contiguous(points: Vec<PricePoint>) -> Self {
        debug_assert!(!points.is_empty());
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &PricePoint> {
        self.points.iter()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }
}
