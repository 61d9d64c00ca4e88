//! Simulation parameters: the contribution plan and the full request.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Days of history fetched before `start_date` so the first simulated day
/// can be forward-filled even when it falls on a non-trading day.
pub const LOOKBACK_DAYS: i64 = 7;

/// How money flows into the position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContributionPlan {
    /// Lump sum invested on the first simulated day.
    pub starting_amount: f64,
    /// Amount invested on every `day_of_month`.
    pub monthly_amount: f64,
    /// Calendar day (1–31) of the recurring contribution.
    pub day_of_month: u32,
}

impl ContributionPlan {
    pub fn new(starting_amount: f64, monthly_amount: f64, day_of_month: u32) -> Self {
        Self {
            starting_amount,
            monthly_amount,
            day_of_month,
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_amount("starting_amount", self.starting_amount)?;
        check_amount("monthly_amount", self.monthly_amount)?;
        if !(1..=31).contains(&self.day_of_month) {
            return Err(EngineError::invalid_parameter(
                "day_of_month",
                format!("must be between 1 and 31, got {}", self.day_of_month),
            ));
        }
        Ok(())
    }
}

fn check_amount(field: &'static str, amount: f64) -> Result<()> {
    if !amount.is_finite() {
        return Err(EngineError::invalid_parameter(field, "must be a finite number"));
    }
    if amount < 0.0 {
        return Err(EngineError::invalid_parameter(
            field,
            format!("must not be negative, got {amount}"),
        ));
    }
    Ok(())
}

/// Everything needed to run one simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    /// Opaque security identifier, passed through to the price source.
    pub ticker: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub plan: ContributionPlan,
}

impl SimulationRequest {
    /// Build a request; the ticker is upper-cased.
    pub fn new(
        ticker: impl AsRef<str>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        plan: ContributionPlan,
    ) -> Self {
        Self {
            ticker: ticker.as_ref().trim().to_uppercase(),
            start_date,
            end_date,
            plan,
        }
    }

    /// Checks that hold regardless of wall-clock time: date ordering and plan.
    pub fn validate_window(&self) -> Result<()> {
        if self.start_date >= self.end_date {
            return Err(EngineError::invalid_parameter(
                "start_date",
                format!(
                    "start date {} must be before end date {}",
                    self.start_date, self.end_date
                ),
            ));
        }
        self.plan.validate()
    }

    /// Full boundary validation, including `end_date <= today` and a non-empty ticker.
    pub fn validate(&self, today: NaiveDate) -> Result<()> {
        if self.ticker.is_empty() {
            return Err(EngineError::invalid_parameter("ticker", "must not be empty"));
        }
        self.validate_window()?;
        if self.end_date > today {
            return Err(EngineError::invalid_parameter(
                "end_date",
                format!("end date {} is in the future (today is {today})", self.end_date),
            ));
        }
        Ok(())
    }

    /// First date of the raw price window, `start_date - LOOKBACK_DAYS`.
    pub fn fetch_start(&self) -> NaiveDate {
        self.start_date - Duration::days(LOOKBACK_DAYS)
    }

    /// Calendar days between start and end (exclusive of the end day).
    pub fn span_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }
}
