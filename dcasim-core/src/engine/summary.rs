//! Performance Summarizer — pure functions over the finished ledger.
//!
//! Ratio metrics return `Result<f64, MetricError>`; `summarize` folds an
//! undefined ratio into `None` instead of failing the simulation.

use chrono::NaiveDate;
use tracing::warn;

use crate::domain::{Ledger, SummaryMetrics};
use crate::error::{EngineError, MetricError, Result};

/// Average days per year used to annualize returns.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Days per "month" in the legacy month count.
pub const DAYS_PER_MONTH: i64 = 30;

/// Derive summary metrics from the last ledger row and the date range.
pub fn summarize(ledger: &Ledger, start: NaiveDate, end: NaiveDate) -> Result<SummaryMetrics> {
    let last = ledger.last().ok_or(EngineError::EmptyLedger)?;

    let total_invested = last.cumulative_invested;
    let final_value = last.portfolio_value;
    let years = num_years(start, end);

    Ok(SummaryMetrics {
        total_invested,
        final_value,
        total_return: total_return(final_value, total_invested),
        percentage_return: defined(
            "percentage_return",
            percentage_return(final_value, total_invested),
        ),
        cagr: defined("cagr", cagr(final_value, total_invested, years)),
        num_months: num_months(start, end),
    })
}

fn defined(metric: &'static str, value: std::result::Result<f64, MetricError>) -> Option<f64> {
    match value {
        Ok(v) => Some(v),
        Err(reason) => {
            warn!(metric, %reason, "metric undefined");
            None
        }
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Absolute gain: final value minus cash put in.
pub fn total_return(final_value: f64, total_invested: f64) -> f64 {
    final_value - total_invested
}

/// Gain as a percentage of cash invested.
pub fn percentage_return(
    final_value: f64,
    total_invested: f64,
) -> std::result::Result<f64, MetricError> {
    if total_invested <= 0.0 {
        return Err(MetricError::ZeroInvested);
    }
    Ok(total_return(final_value, total_invested) / total_invested * 100.0)
}

/// Compound annual growth rate, in percent.
pub fn cagr(
    final_value: f64,
    total_invested: f64,
    years: f64,
) -> std::result::Result<f64, MetricError> {
    if years <= 0.0 {
        return Err(MetricError::NonPositiveDuration);
    }
    if total_invested <= 0.0 {
        return Err(MetricError::ZeroInvested);
    }
    let ratio = final_value / total_invested;
    if ratio < 0.0 {
        return Err(MetricError::NegativeGrowthRatio);
    }
    Ok((ratio.powf(1.0 / years) - 1.0) * 100.0)
}

/// Elapsed years between two dates, `days / 365.25`.
pub fn num_years(start: NaiveDate, end: NaiveDate) -> f64 {
    (end - start).num_days() as f64 / DAYS_PER_YEAR
}

/// Legacy month count: whole 30-day blocks between the dates (floor division).
pub fn num_months(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days().div_euclid(DAYS_PER_MONTH)
}
