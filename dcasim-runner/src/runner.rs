//! Simulation runner — wires a price source to the engine.
//!
//! `run_simulation()` is the single entry point used by the CLI: validate,
//! fetch `[start - 7 days, end]`, simulate, and wrap the outcome in a
//! serializable [`SimulationResult`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use dcasim_core::data::{DataError, PriceSource, SourceKind};
use dcasim_core::engine::normalize;
use dcasim_core::{
    simulate_series, EngineError, Ledger, LedgerColumns, PriceSeries, SimulationRequest,
};

use crate::config::{request_id, ConfigError, RunId};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Data(#[from] DataError),
}

impl RunError {
    /// What the user should do about this error.
    pub fn user_hint(&self) -> String {
        match self {
            RunError::Engine(EngineError::InvalidParameter { field, reason }) => {
                format!("invalid {}: {reason}", field_label(field))
            }
            RunError::Engine(EngineError::DataUnavailable(_))
            | RunError::Data(DataError::DataUnavailable { .. }) => {
                "no price history covers this ticker and date range; check the ticker symbol, \
                 choose a later start date, or point --prices at a CSV that covers the window"
                    .to_string()
            }
            RunError::Data(DataError::NetworkError(_)) => {
                "the price service could not be reached; try again later".to_string()
            }
            RunError::Data(DataError::Io { .. } | DataError::Parse { .. }) => {
                "the price file could not be read; expected a CSV with `date` and `close` columns"
                    .to_string()
            }
            RunError::Config(_) => "fix the config file and run again".to_string(),
            RunError::Engine(EngineError::DivisionByZero { .. }) => {
                "the price history contains a zero close; clean the data and run again"
                    .to_string()
            }
            RunError::Engine(EngineError::EmptyLedger) => {
                "the date range produced no simulated days".to_string()
            }
        }
    }
}

/// Dashboard wording for request fields.
fn field_label(field: &str) -> &str {
    match field {
        "ticker" => "ticker symbol",
        "start_date" => "start date",
        "end_date" => "end date",
        "starting_amount" => "starting amount",
        "monthly_amount" => "monthly investment amount",
        "day_of_month" => "day of month for investment (1-31)",
        other => other,
    }
}

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// Complete result of one simulation run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationResult {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub run_id: RunId,
    pub ticker: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub monthly_amount: f64,
    pub starting_amount: f64,
    pub day_of_investment: u32,
    pub total_invested_amount: f64,
    pub final_investment_value: f64,
    pub total_return: f64,
    pub percentage_return: Option<f64>,
    pub cagr: Option<f64>,
    pub num_months: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simulation_data: Option<LedgerColumns>,
    pub dataset_hash: String,
    pub synthetic: bool,
    pub source: String,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Output of [`run_simulation`]: the serializable result plus the full ledger.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub result: SimulationResult,
    pub ledger: Ledger,
}

/// Validate, fetch and simulate.
///
/// Parameters are checked before the source is touched, so an invalid request
/// never costs a fetch. `include_ledger` controls whether the per-day columns
/// are embedded in the result.
pub fn run_simulation(
    request: &SimulationRequest,
    source: &dyn PriceSource,
    today: NaiveDate,
    include_ledger: bool,
) -> Result<RunOutput, RunError> {
    request.validate(today)?;

    let fetch_start = request.fetch_start();
    let raw = source.fetch(&request.ticker, fetch_start, request.end_date)?;
    debug!(
        ticker = %request.ticker,
        source = source.name(),
        observations = raw.len(),
        "fetched prices"
    );

    let prices = normalize(&raw, request.start_date, request.end_date)?;
    let sim = simulate_series(&prices, request)?;
    let summary = sim.summary;

    info!(
        ticker = %request.ticker,
        invested = summary.total_invested,
        final_value = summary.final_value,
        "simulation complete"
    );

    let dataset_hash = dataset_hash(&request.ticker, &prices);
    let result = SimulationResult {
        schema_version: SCHEMA_VERSION,
        run_id: request_id(request, source.name(), &dataset_hash),
        ticker: request.ticker.clone(),
        start_date: request.start_date,
        end_date: request.end_date,
        monthly_amount: request.plan.monthly_amount,
        starting_amount: request.plan.starting_amount,
        day_of_investment: request.plan.day_of_month,
        total_invested_amount: summary.total_invested,
        final_investment_value: summary.final_value,
        total_return: summary.total_return,
        percentage_return: summary.percentage_return,
        cagr: summary.cagr,
        num_months: summary.num_months,
        simulation_data: include_ledger.then(|| sim.ledger.to_columns()),
        dataset_hash,
        synthetic: source.kind() == SourceKind::Synthetic,
        source: source.name().to_string(),
    };

    Ok(RunOutput {
        result,
        ledger: sim.ledger,
    })
}

/// Deterministic BLAKE3 hash over a normalized price series.
pub fn dataset_hash(ticker: &str, prices: &PriceSeries) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(ticker.as_bytes());
    for point in prices.iter() {
        hasher.update(point.date.to_string().as_bytes());
        hasher.update(&point.close.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use dcasim_core::data::InMemorySource;
    use dcasim_core::{ContributionPlan, PricePoint};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn flat_source(ticker: &str, start: NaiveDate, end: NaiveDate, close: f64) -> InMemorySource {
        let points = start
            .iter_days()
            .take_while(|x| *x <= end)
            .map(|x| PricePoint::new(x, close))
            .collect();
        InMemorySource::new().with_ticker(ticker, points)
    }

    #[test]
    fn result_uses_api_field_names() {
        let source = flat_source("SPY", d(2020, 12, 1), d(2021, 6, 30), 100.0);
        let request = SimulationRequest::new(
            "spy",
            d(2021, 1, 1),
            d(2021, 6, 30),
            ContributionPlan::new(1000.0, 100.0, 1),
        );
        let out = run_simulation(&request, &source, d(2024, 1, 1), true).unwrap();
        let json = serde_json::to_value(&out.result).unwrap();

        assert_eq!(json["ticker"], "SPY");
        assert_eq!(json["total_invested_amount"], 1600.0);
        assert_eq!(json["final_investment_value"], 1600.0);
        assert_eq!(json["total_return"], 0.0);
        assert_eq!(json["percentage_return"], 0.0);
        assert_eq!(json["num_months"], 6);
        assert_eq!(json["synthetic"], false);
        assert_eq!(
            json["simulation_data"]["dates"].as_array().unwrap().len(),
            out.ledger.len()
        );
    }

    #[test]
    fn ledger_columns_omitted_on_request() {
        let source = flat_source("SPY", d(2020, 12, 1), d(2021, 6, 30), 100.0);
        let request = SimulationRequest::new(
            "SPY",
            d(2021, 1, 1),
            d(2021, 6, 30),
            ContributionPlan::new(1000.0, 0.0, 1),
        );
        let out = run_simulation(&request, &source, d(2024, 1, 1), false).unwrap();
        assert!(out.result.simulation_data.is_none());
        let json = serde_json::to_value(&out.result).unwrap();
        assert!(json.get("simulation_data").is_none());
    }

    #[test]
    fn future_end_date_is_invalid() {
        let source = flat_source("SPY", d(2020, 1, 1), d(2020, 12, 31), 10.0);
        let request = SimulationRequest::new(
            "SPY",
            d(2020, 1, 1),
            d(2030, 1, 1),
            ContributionPlan::new(1.0, 1.0, 1),
        );
        let err = run_simulation(&request, &source, d(2024, 1, 1), false).unwrap_err();
        assert!(matches!(
            err,
            RunError::Engine(EngineError::InvalidParameter { field: "end_date", .. })
        ));
        assert!(err.user_hint().contains("end date"));
    }

    #[test]
    fn unknown_ticker_hint_is_actionable() {
        let source = InMemorySource::new();
        let request = SimulationRequest::new(
            "NOPE",
            d(2020, 1, 1),
            d(2020, 6, 1),
            ContributionPlan::new(1.0, 1.0, 1),
        );
        let err = run_simulation(&request, &source, d(2024, 1, 1), false).unwrap_err();
        assert!(matches!(err, RunError::Data(DataError::DataUnavailable { .. })));
        assert!(err.user_hint().contains("ticker symbol"));
    }

    struct Offline {
        calls: AtomicUsize,
    }

    impl PriceSource for Offline {
        fn name(&self) -> &str {
            "offline"
        }
        fn kind(&self) -> SourceKind {
            SourceKind::InMemory
        }
        fn fetch(&self, _: &str, _: NaiveDate, _: NaiveDate) -> Result<Vec<PricePoint>, DataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(DataError::NetworkError("connection refused".into()))
        }
    }

    #[test]
    fn network_error_is_terminal_with_retry_hint() {
        let source = Offline {
            calls: AtomicUsize::new(0),
        };
        let request = SimulationRequest::new(
            "SPY",
            d(2020, 1, 1),
            d(2020, 6, 1),
            ContributionPlan::new(1.0, 1.0, 1),
        );
        let err = run_simulation(&request, &source, d(2024, 1, 1), false).unwrap_err();
        assert!(matches!(err, RunError::Data(DataError::NetworkError(_))));
        assert!(err.user_hint().contains("try again later"));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn run_id_changes_with_prices() {
        let request = SimulationRequest::new(
            "SPY",
            d(2021, 1, 1),
            d(2021, 3, 31),
            ContributionPlan::new(100.0, 10.0, 1),
        );
        let cheap = flat_source("SPY", d(2020, 12, 1), d(2021, 3, 31), 10.0);
        let dear = flat_source("SPY", d(2020, 12, 1), d(2021, 3, 31), 20.0);
        let a = run_simulation(&request, &cheap, d(2024, 1, 1), false).unwrap();
        let b = run_simulation(&request, &dear, d(2024, 1, 1), false).unwrap();
        let again = run_simulation(&request, &cheap, d(2024, 1, 1), false).unwrap();
        assert_ne!(a.result.run_id, b.result.run_id);
        assert_eq!(a.result.run_id, again.result.run_id);
    }

    #[test]
    fn dataset_hash_tracks_prices() {
        let a = PriceSeries::new(vec![PricePoint::new(d(2020, 1, 1), 1.0)]).unwrap();
        let b = PriceSeries::new(vec![PricePoint::new(d(2020, 1, 1), 1.01)]).unwrap();
        assert_eq!(dataset_hash("X", &a), dataset_hash("X", &a));
        assert_ne!(dataset_hash("X", &a), dataset_hash("X", &b));
        assert_ne!(dataset_hash("X", &a), dataset_hash("Y", &a));
    }
}
