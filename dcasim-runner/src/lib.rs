//! dcasim runner — orchestration around the pure engine.
//!
//! This crate builds on `dcasim-core` to provide:
//! - TOML configuration with content-hashed run IDs
//! - The single-simulation runner (validate, fetch, simulate, wrap)
//! - Parallel parameter sweeps over contribution days and amounts
//! - Ticker validation backed by a caller-owned memo cache
//! - JSON, CSV and Markdown export

pub mod config;
pub mod export;
pub mod runner;
pub mod sweep;
pub mod validation;

pub use config::{ConfigError, DataConfig, DataSourceKind, RunId, SimulationConfig};
pub use export::{
    export_json, export_ledger_csv, export_markdown, export_sweep_markdown, import_json,
    load_artifacts, percent, save_artifacts,
};
pub use runner::{run_simulation, RunError, RunOutput, SimulationResult, SCHEMA_VERSION};
pub use sweep::{run_sweep, SweepEntry, SweepGrid};
pub use validation::{TickerStatus, TickerValidator, ValidationCache};
