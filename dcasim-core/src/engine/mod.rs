//! The DCA simulation pipeline.
//!
//! Four stages, run strictly in order:
//! 1. [`normalize`] — raw closes onto a gap-free daily calendar
//! 2. [`schedule`] — cash contributed on each day
//! 3. [`accumulate`] — shares bought and running totals (the ledger)
//! 4. [`summarize`] — headline metrics from the ledger's last row
//!
//! The whole pipeline is a pure function of its inputs: no I/O, no shared
//! state, and identical inputs give bit-identical output.

pub mod accumulate;
pub mod normalize;
pub mod schedule;
pub mod summary;

pub use accumulate::accumulate;
pub use normalize::{normalize, round_price};
pub use schedule::{recurring_dates, schedule};
pub use summary::summarize;

use serde::Serialize;
use tracing::info_span;

use crate::domain::{
    ContributionPlan, Ledger, PricePoint, PriceSeries, SimulationRequest, SummaryMetrics,
};
use crate::error::Result;

/// Output of one simulation: the ledger and its summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Simulation {
    pub ledger: Ledger,
    pub summary: SummaryMetrics,
}

/// Run the full pipeline over raw price observations.
///
/// `raw_prices` should cover `[start_date - LOOKBACK_DAYS, end_date]`.
/// Parameters are validated before any price is looked at.
pub fn simulate(raw_prices: &[PricePoint], request: &SimulationRequest) -> Result<Simulation> {
    request.validate_window()?;
    let _span = info_span!(
        "simulate",
        ticker = %request.ticker,
        start = %request.start_date,
        end = %request.end_date
    )
    .entered();

    let prices = normalize(raw_prices, request.start_date, request.end_date)?;
    simulate_series(&prices, request)
}

/// Run stages 2–4 over an already normalized series.
///
/// Used by parameter sweeps to normalize once and simulate many plans.
pub fn simulate_series(prices: &PriceSeries, request: &SimulationRequest) -> Result<Simulation> {
    request.validate_window()?;
    let ledger = run_plan(prices, &request.plan)?;
    let summary = summarize(&ledger, request.start_date, request.end_date)?;
    Ok(Simulation { ledger, summary })
}

fn run_plan(prices: &PriceSeries, plan: &ContributionPlan) -> Result<Ledger> {
    let contributions = schedule(&prices.dates(), plan)?;
    accumulate(prices, &contributions)
}
