//! Share Accumulator.
//!
//! Walks the price series and the contribution schedule in lockstep, buying
//! `contribution / price` shares each day and carrying running totals forward.

use tracing::debug;

use crate::domain::{ContributionSchedule, DailyLedgerRow, Ledger, PriceSeries};
use crate::error::{EngineError, Result};

/// Turn prices and contributions into the daily ledger.
///
/// The two inputs must cover the same dates in the same order.
pub fn accumulate(prices: &PriceSeries, contributions: &ContributionSchedule) -> Result<Ledger> {
    if prices.len() != contributions.len() {
        return Err(EngineError::invalid_parameter(
            "contributions",
            format!(
                "schedule has {} days but price series has {}",
                contributions.len(),
                prices.len()
            ),
        ));
    }

    let mut rows = Vec::with_capacity(prices.len());
    let mut cumulative_shares = 0.0_f64;
    let mut cumulative_invested = 0.0_f64;

    for (point, contribution) in prices.iter().zip(contributions.iter()) {
        if point.date != contribution.date {
            return Err(EngineError::invalid_parameter(
                "contributions",
                format!(
                    "schedule date {} does not match price date {}",
                    contribution.date, point.date
                ),
            ));
        }
        if point.close <= 0.0 {
            return Err(EngineError::DivisionByZero {
                context: format!("share purchase on {} at price {}", point.date, point.close),
            });
        }

        let shares_purchased = contribution.amount / point.close;
        cumulative_shares += shares_purchased;
        cumulative_invested += contribution.amount;

        rows.push(DailyLedgerRow {
            date: point.date,
            price: point.close,
            contribution: contribution.amount,
            shares_purchased,
            cumulative_shares,
            portfolio_value: cumulative_shares * point.close,
            cumulative_invested,
        });
    }

    debug!(
        rows = rows.len(),
        shares = cumulative_shares,
        invested = cumulative_invested,
        "accumulated ledger"
    );
    Ok(Ledger::from_rows(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ContributionPlan, PricePoint};
    use crate::engine::schedule::schedule;
    use chrono::{Duration, NaiveDate};

    fn series(start: NaiveDate, closes: &[f64]) -> PriceSeries {
        PriceSeries::new(
            closes
                .iter()
                .enumerate()
                .map(|(i, &c)| PricePoint::new(start + Duration::days(i as i64), c))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn buys_shares_at_each_days_price() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let prices = series(start, &[10.0, 20.0, 25.0]);
        let plan = ContributionPlan::new(100.0, 50.0, 2);
        let contributions = schedule(&prices.dates(), &plan).unwrap();

        let ledger = accumulate(&prices, &contributions).unwrap();
        assert_eq!(ledger.len(), 3);

        let rows = ledger.rows();
        assert_eq!(rows[0].shares_purchased, 10.0);
        assert_eq!(rows[1].shares_purchased, 2.5);
        assert_eq!(rows[2].shares_purchased, 0.0);
        assert_eq!(rows[2].cumulative_shares, 12.5);
        assert_eq!(rows[2].portfolio_value, 12.5 * 25.0);
        assert_eq!(rows[2].cumulative_invested, 150.0);
    }

    #[test]
    fn zero_contributions_hold_no_shares() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let prices = series(start, &[10.0, 11.0]);
        let contributions = schedule(&prices.dates(), &ContributionPlan::new(0.0, 0.0, 1)).unwrap();
        let ledger = accumulate(&prices, &contributions).unwrap();
        assert!(ledger.iter().all(|r| r.cumulative_shares == 0.0 && r.portfolio_value == 0.0));
    }

    #[test]
    fn mismatched_lengths_rejected() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let prices = series(start, &[10.0, 11.0]);
        let contributions = schedule(&[start], &ContributionPlan::new(1.0, 0.0, 1)).unwrap();
        let err = accumulate(&prices, &contributions).unwrap_err();
        assert!(matches!(err, EngineError::InvalidParameter { field: "contributions", .. }));
    }

    #[test]
    fn mismatched_dates_rejected() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let prices = series(start, &[10.0]);
        let other = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let contributions = schedule(&[other], &ContributionPlan::new(1.0, 0.0, 1)).unwrap();
        assert!(accumulate(&prices, &contributions).is_err());
    }

    #[test]
    fn zero_price_is_division_by_zero() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let prices = PriceSeries::from_contiguous(vec![PricePoint::new(day, 0.0)]);
        let contributions = schedule(&prices.dates(), &ContributionPlan::new(100.0, 0.0, 1)).unwrap();
        let err = accumulate(&prices, &contributions).unwrap_err();
        assert!(matches!(err, EngineError::DivisionByZero { .. }));
    }
}
