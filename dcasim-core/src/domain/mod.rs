//! Domain types for dcasim

pub mod ledger;
pub mod price;
pub mod request;
pub mod schedule;
pub mod summary;

pub use ledger::{DailyLedgerRow, Ledger, LedgerColumns};
pub use price::{PricePoint, PriceSeries};
pub use request::{ContributionPlan, SimulationRequest, LOOKBACK_DAYS};
pub use schedule::{Contribution, ContributionSchedule};
pub use summary::SummaryMetrics;
