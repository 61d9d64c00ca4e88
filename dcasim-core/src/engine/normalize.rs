//! Price Series Normalizer.
//!
//! Maps a raw, sparse closing-price history onto the contiguous calendar
//! `[start - LOOKBACK_DAYS, end]`, forward-fills the gaps with the last known
//! close, then truncates to `[start, end]`.
//!
//! Observations outside the extended window are ignored, so the price used for
//! `start` always comes from within the lookback.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use tracing::{debug, warn};

use crate::domain::{PricePoint, PriceSeries, LOOKBACK_DAYS};
use crate::error::{EngineError, Result};

/// Round a close to cents, ties to even.
///
/// Eighth-quoted closes such as 25.125 are exact binary halves and land on the
/// even cent.
pub fn round_price(price: f64) -> f64 {
    (price * 100.0).round_ties_even() / 100.0
}

/// Build a gap-free daily series for `[start, end]` from raw observations.
///
/// Raw points may arrive unsorted; a later point for the same date replaces an
/// earlier one. Non-finite closes and closes that round to zero or below are
/// treated as missing observations.
pub fn normalize(
    raw_prices: &[PricePoint],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<PriceSeries> {
    if start > end {
        return Err(EngineError::invalid_parameter(
            "start_date",
            format!("start date {start} is after end date {end}"),
        ));
    }
    if raw_prices.is_empty() {
        return Err(EngineError::data_unavailable("no price observations supplied"));
    }

    let window_start = start - Duration::days(LOOKBACK_DAYS);

    let mut observed: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut dropped = 0usize;
    for point in raw_prices {
        if point.date < window_start || point.date > end {
            continue;
        }
        let close = round_price(point.close);
        if close.is_finite() && close > 0.0 {
            observed.insert(point.date, close);
        } else {
            dropped += 1;
        }
    }
    if dropped > 0 {
        warn!(dropped, "treating non-positive or non-finite closes as missing");
    }

    let days = (end - start).num_days() as usize + 1;
    let mut points = Vec::with_capacity(days);
    let mut last_close: Option<f64> = None;

    for date in window_start.iter_days().take_while(|d| *d <= end) {
        if let Some(&close) = observed.get(&date) {
            last_close = Some(close);
        }
        if date < start {
            continue;
        }
        let close = last_close.ok_or_else(|| {
            EngineError::data_unavailable(format!(
                "no price on or before {start} within the lookback window from {window_start}"
            ))
        })?;
        points.push(PricePoint::new(date, close));
    }

    debug!(
        observed = observed.len(),
        filled = days.saturating_sub(observed.range(start..=end).count()),
        days,
        "normalized price series"
    );

    Ok(PriceSeries::from_contiguous(points))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn p(y: i32, m: u32, day: u32, close: f64) -> PricePoint {
        PricePoint::new(d(y, m, day), close)
    }

    #[test]
    fn fills_weekend_with_friday_close() {
        // 2024-01-05 is a Friday
        let raw = vec![
            p(2024, 1, 4, 100.0),
            p(2024, 1, 5, 101.0),
            p(2024, 1, 8, 103.0),
        ];
        let series = normalize(&raw, d(2024, 1, 5), d(2024, 1, 8)).unwrap();
        let closes: Vec<f64> = series.iter().map(|p| p.close).collect();
        assert_eq!(closes, vec![101.0, 101.0, 101.0, 103.0]);
        assert_eq!(
            series.dates(),
            vec![d(2024, 1, 5), d(2024, 1, 6), d(2024, 1, 7), d(2024, 1, 8)]
        );
    }

    #[test]
    fn start_on_holiday_uses_lookback_price() {
        // Start on Jan 1 (holiday), last trade Dec 29
        let raw = vec![p(2023, 12, 29, 50.0), p(2024, 1, 2, 51.0)];
        let series = normalize(&raw, d(2024, 1, 1), d(2024, 1, 3)).unwrap();
        let closes: Vec<f64> = series.iter().map(|p| p.close).collect();
        assert_eq!(closes, vec![50.0, 51.0, 51.0]);
    }

    #[test]
    fn end_date_after_last_observation_is_filled() {
        let raw = vec![p(2024, 1, 2, 10.0)];
        let series = normalize(&raw, d(2024, 1, 2), d(2024, 1, 10)).unwrap();
        assert_eq!(series.len(), 9);
        assert!(series.iter().all(|p| p.close == 10.0));
    }

    #[test]
    fn empty_input_is_data_unavailable() {
        let err = normalize(&[], d(2024, 1, 1), d(2024, 1, 2)).unwrap_err();
        assert!(matches!(err, EngineError::DataUnavailable(_)));
    }

    #[test]
    fn no_price_before_start_is_data_unavailable() {
        let raw = vec![p(2024, 1, 3, 10.0)];
        let err = normalize(&raw, d(2024, 1, 2), d(2024, 1, 5)).unwrap_err();
        assert!(matches!(err, EngineError::DataUnavailable(_)));
    }

    #[test]
    fn price_older_than_lookback_is_ignored() {
        let raw = vec![p(2023, 12, 1, 10.0), p(2024, 1, 3, 12.0)];
        let err = normalize(&raw, d(2024, 1, 2), d(2024, 1, 5)).unwrap_err();
        assert!(matches!(err, EngineError::DataUnavailable(_)));
    }

    #[test]
    fn prices_rounded_to_cents() {
        let raw = vec![p(2024, 1, 1, 123.456_7), p(2024, 1, 2, 0.004_9)];
        let series = normalize(&raw, d(2024, 1, 1), d(2024, 1, 2)).unwrap();
        // 0.0049 rounds to 0.00 and is treated as missing
        let closes: Vec<f64> = series.iter().map(|p| p.close).collect();
        assert_eq!(closes, vec![123.46, 123.46]);
    }

    #[test]
    fn unsorted_input_and_nan_handled() {
        let raw = vec![
            p(2024, 1, 3, 12.0),
            p(2024, 1, 1, 10.0),
            p(2024, 1, 2, f64::NAN),
        ];
        let series = normalize(&raw, d(2024, 1, 1), d(2024, 1, 3)).unwrap();
        let closes: Vec<f64> = series.iter().map(|p| p.close).collect();
        assert_eq!(closes, vec![10.0, 10.0, 12.0]);
    }

    #[test]
    fn duplicate_dates_last_wins() {
        let raw = vec![p(2024, 1, 1, 10.0), p(2024, 1, 1, 11.0)];
        let series = normalize(&raw, d(2024, 1, 1), d(2024, 1, 1)).unwrap();
        assert_eq!(series.points()[0].close, 11.0);
    }

    #[test]
    fn reversed_window_rejected() {
        let raw = vec![p(2024, 1, 1, 10.0)];
        let err = normalize(&raw, d(2024, 1, 5), d(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidParameter { .. }));
    }

    #[test]
    fn round_price_to_cents() {
        assert_eq!(round_price(1.234), 1.23);
        assert_eq!(round_price(1.236), 1.24);
        assert_eq!(round_price(100.0), 100.0);
    }

    #[test]
    fn round_price_halves_go_to_even_cent() {
        assert_eq!(round_price(25.125), 25.12);
        assert_eq!(round_price(25.135), 25.14);
        assert_eq!(round_price(100.625), 100.62);
        assert_eq!(round_price(0.375), 0.38);
    }

    #[test]
    fn eighth_quoted_close_rounds_down_to_even() {
        let raw = vec![p(1995, 3, 1, 25.125)];
        let series = normalize(&raw, d(1995, 3, 1), d(1995, 3, 1)).unwrap();
        assert_eq!(series.points()[0].close, 25.12);
    }
}
