//! Parameter sweep over contribution plans ("what if I had bought on the 15th?").
//!
//! The price history is normalized once; every plan in the grid then runs
//! stages 2–4 against the shared series in parallel.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use dcasim_core::engine::normalize;
use dcasim_core::{
    simulate_series, ContributionPlan, EngineError, PricePoint, SimulationRequest, SummaryMetrics,
};

/// Plans to compare. Each dimension defaults to the base request's value when empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SweepGrid {
    pub days_of_month: Vec<u32>,
    pub monthly_amounts: Vec<f64>,
}

impl SweepGrid {
    /// Every day of the month at the base amount.
    pub fn all_days() -> Self {
        Self {
            days_of_month: (1..=31).collect(),
            monthly_amounts: Vec::new(),
        }
    }

    /// Number of plans the grid expands to (empty dimensions count as one).
    pub fn size(&self) -> usize {
        self.days_of_month.len().max(1) * self.monthly_amounts.len().max(1)
    }

    /// Expand into concrete plans, validating each.
    pub fn plans(&self, base: &ContributionPlan) -> Result<Vec<ContributionPlan>, EngineError> {
        let days = if self.days_of_month.is_empty() {
            vec![base.day_of_month]
        } else {
            self.days_of_month.clone()
        };
        let amounts = if self.monthly_amounts.is_empty() {
            vec![base.monthly_amount]
        } else {
            self.monthly_amounts.clone()
        };

        let mut plans = Vec::with_capacity(days.len() * amounts.len());
        for &day in &days {
            for &amount in &amounts {
                let plan = ContributionPlan::new(base.starting_amount, amount, day);
                plan.validate()?;
                plans.push(plan);
            }
        }
        Ok(plans)
    }
}

/// Outcome of one plan in a sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepEntry {
    pub day_of_investment: u32,
    pub monthly_amount: f64,
    pub summary: SummaryMetrics,
}

/// Run every plan in `grid` against one price history.
///
/// Entries are ranked by final value, best first; ties fall back to day of
/// month, then monthly amount, so the order is stable across runs.
pub fn run_sweep(
    raw_prices: &[PricePoint],
    base: &SimulationRequest,
    grid: &SweepGrid,
) -> Result<Vec<SweepEntry>, EngineError> {
    base.validate_window()?;
    let plans = grid.plans(&base.plan)?;
    let prices = normalize(raw_prices, base.start_date, base.end_date)?;
    debug!(ticker = %base.ticker, plans = plans.len(), days = prices.len(), "running sweep");

    let mut entries = plans
        .par_iter()
        .map(|plan| {
            let request = SimulationRequest {
                plan: *plan,
                ..base.clone()
            };
            simulate_series(&prices, &request).map(|sim| SweepEntry {
                day_of_investment: plan.day_of_month,
                monthly_amount: plan.monthly_amount,
                summary: sim.summary,
            })
        })
        .collect::<Result<Vec<_>, EngineError>>()?;

    entries.sort_by(|a, b| {
        b.summary
            .final_value
            .total_cmp(&a.summary.final_value)
            .then(a.day_of_investment.cmp(&b.day_of_investment))
            .then(a.monthly_amount.total_cmp(&b.monthly_amount))
    });
    Ok(entries)
}
