//! dcasim CLI — simulate, sweep and validate commands.
//!
//! Commands:
//! - `simulate` — run one DCA simulation from a TOML config and/or flags
//! - `sweep` — rank contribution days and amounts over one price history
//! - `validate` — check tickers against the price source

use std::path::PathBuf;

use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use dcasim_core::data::{CsvPriceSource, PriceSource, SyntheticSource};
use dcasim_core::SimulationRequest;
use dcasim_runner::{
    export_json, export_sweep_markdown, percent, run_simulation, run_sweep, save_artifacts,
    DataSourceKind, RunError, SimulationConfig, SimulationResult, SweepGrid, TickerStatus,
    TickerValidator, ValidationCache,
};

#[derive(Parser)]
#[command(name = "dcasim", about = "dcasim — dollar-cost averaging simulator")]
struct Cli {
    /// Log debug events to stderr (overrides DCASIM_LOG / RUST_LOG).
    #[arg(long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one simulation and print the summary.
    Simulate {
        #[command(flatten)]
        plan: PlanArgs,

        /// Print the full result (including daily columns) as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Write summary.json, ledger.csv and report.md under this directory.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Compare contribution days and monthly amounts over the same prices.
    Sweep {
        #[command(flatten)]
        plan: PlanArgs,

        /// Days of month to compare, comma separated. Defaults to 1..=31.
        #[arg(long, value_delimiter = ',')]
        days: Vec<u32>,

        /// Monthly amounts to compare, comma separated. Defaults to the plan's amount.
        #[arg(long, value_delimiter = ',')]
        amounts: Vec<f64>,
    },
    /// Report whether each ticker has recent prices.
    Validate {
        /// Ticker symbols to check.
        #[arg(required = true)]
        tickers: Vec<String>,

        /// CSV file or directory of <TICKER>.csv files. Defaults to ./data.
        #[arg(long, conflicts_with = "synthetic")]
        prices: Option<PathBuf>,

        /// Use the synthetic price source.
        #[arg(long, default_value_t = false)]
        synthetic: bool,
    },
}

/// Simulation parameters shared by `simulate` and `sweep`. Flags override the config file.
#[derive(Args)]
struct PlanArgs {
    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ticker symbol (e.g., AAPL).
    #[arg(long)]
    ticker: Option<String>,

    /// Start date (YYYY-MM-DD).
    #[arg(long)]
    start: Option<NaiveDate>,

    /// End date (YYYY-MM-DD).
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Amount invested on each day of investment.
    #[arg(long)]
    monthly: Option<f64>,

    /// Lump sum invested on the start date.
    #[arg(long)]
    starting: Option<f64>,

    /// Day of month for the recurring investment (1-31).
    #[arg(long)]
    day: Option<u32>,

    /// CSV file or directory of <TICKER>.csv files.
    #[arg(long, conflicts_with = "synthetic")]
    prices: Option<PathBuf>,

    /// Use the synthetic price source (results are tagged).
    #[arg(long, default_value_t = false)]
    synthetic: bool,
}

impl PlanArgs {
    fn resolve(&self) -> Result<SimulationConfig, RunError> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::from_file(path)?,
            None => SimulationConfig::default(),
        };

        let sim = &mut config.simulation;
        if let Some(ticker) = &self.ticker {
            sim.ticker = ticker.clone();
        }
        if let Some(start) = self.start {
            sim.start_date = start;
        }
        if let Some(end) = self.end {
            sim.end_date = end;
        }
        if let Some(monthly) = self.monthly {
            sim.monthly_amount = monthly;
        }
        if let Some(starting) = self.starting {
            sim.starting_amount = starting;
        }
        if let Some(day) = self.day {
            sim.day_of_investment = day;
        }
        if let Some(path) = &self.prices {
            config.data.source = DataSourceKind::Csv;
            config.data.path = path.clone();
        }
        if self.synthetic {
            config.data.source = DataSourceKind::Synthetic;
        }
        debug!(run_id = %config.run_id(), source = ?config.data.source, "resolved config");
        Ok(config)
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let outcome = match cli.command {
        Commands::Simulate {
            plan,
            json,
            output_dir,
        } => run_simulate_cmd(&plan, json, output_dir),
        Commands::Sweep { plan, days, amounts } => run_sweep_cmd(&plan, days, amounts),
        Commands::Validate {
            tickers,
            prices,
            synthetic,
        } => run_validate_cmd(&tickers, prices, synthetic),
    };

    if let Err(err) = outcome {
        eprintln!("Error: {err}");
        if let Some(run_err) = err.downcast_ref::<RunError>() {
            eprintln!("Hint: {}", run_err.user_hint());
        }
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("DCASIM_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn build_source(config: &SimulationConfig) -> Box<dyn PriceSource> {
    match config.data.source {
        DataSourceKind::Csv => Box::new(CsvPriceSource::new(config.data.path.clone())),
        DataSourceKind::Synthetic => {
            eprintln!("WARNING: using SYNTHETIC prices; results are not real market data");
            Box::new(SyntheticSource::new())
        }
    }
}

fn run_simulate_cmd(plan: &PlanArgs, json: bool, output_dir: Option<PathBuf>) -> Result<()> {
    let config = plan.resolve()?;
    let request = config.to_request();
    let source = build_source(&config);

    let out = run_simulation(&request, source.as_ref(), today(), json)?;

    if json {
        println!("{}", export_json(&out.result)?);
    } else {
        print_summary(&out.result);
    }

    if let Some(dir) = output_dir {
        let run_dir = save_artifacts(&out.result, &out.ledger, &dir)?;
        eprintln!("Artifacts saved to: {}", run_dir.display());
    }
    Ok(())
}

fn run_sweep_cmd(plan: &PlanArgs, days: Vec<u32>, amounts: Vec<f64>) -> Result<()> {
    let config = plan.resolve()?;
    let request: SimulationRequest = config.to_request();
    request.validate(today()).map_err(RunError::from)?;

    let grid = SweepGrid {
        days_of_month: if days.is_empty() {
            SweepGrid::all_days().days_of_month
        } else {
            days
        },
        monthly_amounts: amounts,
    };
    // Reject bad grid values before fetching
    grid.plans(&request.plan).map_err(RunError::from)?;

    let source = build_source(&config);
    let raw = source
        .fetch(&request.ticker, request.fetch_start(), request.end_date)
        .map_err(RunError::from)?;
    let entries = run_sweep(&raw, &request, &grid).map_err(RunError::from)?;

    print!("{}", export_sweep_markdown(&request.ticker, &entries));
    Ok(())
}

fn run_validate_cmd(tickers: &[String], prices: Option<PathBuf>, synthetic: bool) -> Result<()> {
    let source: Box<dyn PriceSource> = if synthetic {
        Box::new(SyntheticSource::new())
    } else {
        Box::new(CsvPriceSource::new(
            prices.unwrap_or_else(|| PathBuf::from("data")),
        ))
    };
    let cache = ValidationCache::new();
    let validator = TickerValidator::new(source.as_ref(), &cache);
    let today = today();

    let mut unknown = 0usize;
    for ticker in tickers {
        match validator.check(ticker, today) {
            Ok(TickerStatus::Valid) => println!("{:<10} valid", ticker.to_uppercase()),
            Ok(TickerStatus::Unknown) => {
                println!("{:<10} unknown", ticker.to_uppercase());
                unknown += 1;
            }
            Err(err) => {
                eprintln!("{:<10} error: {err}", ticker.to_uppercase());
                unknown += 1;
            }
        }
    }

    if unknown > 0 {
        bail!("{unknown} of {} tickers could not be validated", tickers.len());
    }
    Ok(())
}

fn print_summary(result: &SimulationResult) {
    println!();
    println!("=== Simulation Result ===");
    println!("Ticker:            {}", result.ticker);
    println!("Period:            {} to {}", result.start_date, result.end_date);
    println!(
        "Plan:              ${:.2} up front, ${:.2} on day {}",
        result.starting_amount, result.monthly_amount, result.day_of_investment
    );
    println!();
    println!("--- Performance ---");
    println!("Total Invested:    ${:.2}", result.total_invested_amount);
    println!("Final Value:       ${:.2}", result.final_investment_value);
    println!("Total Return:      ${:.2}", result.total_return);
    println!("Percentage Return: {}", percent(result.percentage_return));
    println!("CAGR:              {}", percent(result.cagr));
    println!("Months Invested:   {}", result.num_months);
    if result.synthetic {
        println!();
        println!("WARNING: Results based on SYNTHETIC data");
    }
}
