//! dcasim core — the dollar-cost-averaging simulation engine.
//!
//! This crate contains:
//! - Domain types (price series, contribution plan and schedule, ledger, summary)
//! - The four-stage pipeline: normalize → schedule → accumulate → summarize
//! - The engine's error taxonomy
//! - The price-source trait and offline sources (in-memory, CSV, synthetic)
//!
//! The engine is pure: it never fetches data and holds no state between calls.

pub mod data;
pub mod domain;
pub mod engine;
pub mod error;

pub use domain::{
    Contribution, ContributionPlan, ContributionSchedule, DailyLedgerRow, Ledger, LedgerColumns,
    PricePoint, PriceSeries, SimulationRequest, SummaryMetrics, LOOKBACK_DAYS,
};
pub use engine::{simulate, simulate_series, Simulation};
pub use error::{EngineError, MetricError, Result};
