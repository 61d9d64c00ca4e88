//! Error taxonomy for the simulation engine.
//!
//! Two layers:
//! - [`EngineError`] aborts a simulation. Raised eagerly for bad parameters and
//!   missing price history; no partial ledger is ever returned alongside it.
//! - [`MetricError`] marks a single summary ratio as undefined. The summarizer
//!   catches these and stores `None` so the ledger stays usable.

use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Hard failures of the simulation pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// A caller-supplied parameter is out of range or inconsistent.
    #[error("invalid parameter `{field}`: {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    /// The price history is empty or does not reach back to the start date.
    #[error("price data unavailable: {0}")]
    DataUnavailable(String),

    /// A share purchase was attempted at a non-positive price.
    #[error("division by zero in {context}")]
    DivisionByZero { context: String },

    /// The summarizer was handed a ledger with no rows.
    #[error("ledger is empty")]
    EmptyLedger,
}

impl EngineError {
    pub fn invalid_parameter(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }

    pub fn data_unavailable(message: impl Into<String>) -> Self {
        Self::DataUnavailable(message.into())
    }
}

/// Why a derived summary ratio has no real value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MetricError {
    #[error("nothing was invested")]
    ZeroInvested,

    #[error("simulation window has no positive duration")]
    NonPositiveDuration,

    #[error("growth ratio is negative; fractional power is not real")]
    NegativeGrowthRatio,
}
