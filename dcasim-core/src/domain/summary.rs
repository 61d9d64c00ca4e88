//! Summary performance metrics of one simulation.

use serde::{Deserialize, Serialize};

/// Headline numbers derived from the last ledger row and the date range.
///
/// `percentage_return` and `cagr` are `None` when undefined (nothing invested,
/// zero-length window, non-real growth). They serialize as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub total_invested: f64,
    pub final_value: f64,
    pub total_return: f64,
    pub percentage_return: Option<f64>,
    pub cagr: Option<f64>,
    pub num_months: i64,
}

impl SummaryMetrics {
    /// True if every derived ratio has a real value.
    pub fn is_fully_defined(&self) -> bool {
        self.percentage_return.is_some() && self.cagr.is_some()
    }
}
