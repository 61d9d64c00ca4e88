//! Contribution Scheduler.
//!
//! Every date whose day-of-month equals the plan's `day_of_month` receives the
//! monthly amount; the first date additionally receives the starting amount.
//! A `day_of_month` of 29–31 never fires in months that are too short.

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::domain::{Contribution, ContributionPlan, ContributionSchedule};
use crate::error::{EngineError, Result};

/// Derive the per-day contribution for each of `dates`.
///
/// `dates` must be in ascending order.
pub fn schedule(dates: &[NaiveDate], plan: &ContributionPlan) -> Result<ContributionSchedule> {
    plan.validate()?;
    if dates.windows(2).any(|w| w[0] >= w[1]) {
        return Err(EngineError::invalid_parameter(
            "dates",
            "dates must be strictly ascending",
        ));
    }

    let mut entries: Vec<Contribution> = dates
        .iter()
        .map(|&date| Contribution {
            date,
            amount: if date.day() == plan.day_of_month {
                plan.monthly_amount
            } else {
                0.0
            },
        })
        .collect();

    if let Some(first) = entries.first_mut() {
        first.amount += plan.starting_amount;
    }

    let schedule = ContributionSchedule::from_entries(entries);
    debug!(
        days = schedule.len(),
        funded_days = schedule.funded_days(),
        total = schedule.total(),
        "built contribution schedule"
    );
    Ok(schedule)
}

/// Number of dates on which the recurring contribution fires.
pub fn recurring_dates(dates: &[NaiveDate], day_of_month: u32) -> usize {
    dates.iter().filter(|d| d.day() == day_of_month).count()
}
