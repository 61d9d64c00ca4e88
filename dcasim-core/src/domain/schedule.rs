//! Contribution schedule — cash invested per calendar day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Cash contributed on a single day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub date: NaiveDate,
    pub amount: f64,
}

/// Per-day contributions in date order, aligned one-to-one with a price series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionSchedule {
    entries: Vec<Contribution>,
}

impl ContributionSchedule {
    pub(crate) fn from_entries(entries: Vec<Contribution>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[Contribution] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &Contribution> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all contributions.
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|c| c.amount).sum()
    }

    /// Contribution on `date`, or `None` if the date is outside the schedule.
    pub fn amount_on(&self, date: NaiveDate) -> Option<f64> {
        self.entries
            .binary_search_by_key(&date, |c| c.date)
            .ok()
            .map(|i| self.entries[i].amount)
    }

    /// Number of days with a non-zero contribution.
    pub fn funded_days(&self) -> usize {
        self.entries.iter().filter(|c| c.amount > 0.0).count()
    }
}
