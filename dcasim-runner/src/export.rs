//! Reporting and export — JSON, CSV, and Markdown artifacts.
//!
//! - **JSON**: the full `SimulationResult`, schema-versioned
//! - **CSV**: the daily ledger for spreadsheets and plotting tools
//! - **Markdown**: the dashboard summary lines plus run metadata
//!
//! Persisted JSON carries a `schema_version`; newer versions are rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use dcasim_core::Ledger;

use crate::runner::{SimulationResult, SCHEMA_VERSION};
use crate::sweep::SweepEntry;

// ─── JSON ───────────────────────────────────────────────────────────

pub fn export_json(result: &SimulationResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize SimulationResult to JSON")
}

/// Deserialize a `SimulationResult`, rejecting schema versions newer than this build.
pub fn import_json(json: &str) -> Result<SimulationResult> {
    let result: SimulationResult =
        serde_json::from_str(json).context("failed to deserialize SimulationResult from JSON")?;
    if result.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            result.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(result)
}

// ─── CSV ────────────────────────────────────────────────────────────

/// Columns: date, close_price, contribution, shares_purchased,
/// cumulative_shares, total_value, total_investment
pub fn export_ledger_csv(ledger: &Ledger) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "date",
        "close_price",
        "contribution",
        "shares_purchased",
        "cumulative_shares",
        "total_value",
        "total_investment",
    ])?;

    for row in ledger.iter() {
        wtr.write_record([
            &row.date.to_string(),
            &format!("{:.2}", row.price),
            &format!("{:.2}", row.contribution),
            &format!("{:.6}", row.shares_purchased),
            &format!("{:.6}", row.cumulative_shares),
            &format!("{:.2}", row.portfolio_value),
            &format!("{:.2}", row.cumulative_invested),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Markdown ───────────────────────────────────────────────────────

/// Two-decimal percentage, or `n/a` for an undefined ratio.
pub fn percent(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}%"))
}

pub fn export_markdown(result: &SimulationResult) -> String {
    let mut md = String::with_capacity(1024);

    md.push_str(&format!("# Investment Simulation: {}\n\n", result.ticker));
    md.push_str(&format!(
        "- Period: {} to {}\n",
        result.start_date, result.end_date
    ));
    md.push_str(&format!(
        "- Plan: ${:.2} up front, ${:.2} on day {} of each month\n",
        result.starting_amount, result.monthly_amount, result.day_of_investment
    ));
    md.push_str(&format!("- Price source: {}\n", result.source));
    md.push_str(&format!("- Dataset hash: `{}`\n", result.dataset_hash));
    if result.synthetic {
        md.push_str("- Data: **SYNTHETIC**\n");
    }
    md.push('\n');

    md.push_str("## Results\n\n");
    md.push_str(&format!(
        "- Total Invested Amount: ${:.2}\n",
        result.total_invested_amount
    ));
    md.push_str(&format!(
        "- Final Investment Value: ${:.2}\n",
        result.final_investment_value
    ));
    md.push_str(&format!(
        "- Total Return on Investment: ${:.2}\n",
        result.total_return
    ));
    md.push_str(&format!(
        "- Percentage Return on Investment: {}\n",
        percent(result.percentage_return)
    ));
    md.push_str(&format!(
        "- CAGR (Compound Annual Growth Rate): {}\n",
        percent(result.cagr)
    ));
    md.push_str(&format!(
        "- Number of Months of Investment: {}\n",
        result.num_months
    ));

    md
}

/// Ranked sweep table.
pub fn export_sweep_markdown(ticker: &str, entries: &[SweepEntry]) -> String {
    let mut md = String::with_capacity(128 + entries.len() * 96);
    md.push_str(&format!("# Contribution Day Comparison: {ticker}\n\n"));
    md.push_str("| Rank | Day | Monthly | Invested | Final Value | Return | CAGR |\n");
    md.push_str("| ---: | ---: | ---: | ---: | ---: | ---: | ---: |\n");
    for (i, e) in entries.iter().enumerate() {
        md.push_str(&format!(
            "| {} | {} | ${:.2} | ${:.2} | ${:.2} | {} | {} |\n",
            i + 1,
            e.day_of_investment,
            e.monthly_amount,
            e.summary.total_invested,
            e.summary.final_value,
            percent(e.summary.percentage_return),
            percent(e.summary.cagr),
        ));
    }
    md
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Write `summary.json`, `ledger.csv` and `report.md` under `<output_dir>/<run_id>/`.
///
/// Returns the run directory. Re-running the same setup overwrites it.
pub fn save_artifacts(
    result: &SimulationResult,
    ledger: &Ledger,
    output_dir: &Path,
) -> Result<PathBuf> {
    let run_dir = output_dir.join(&result.run_id);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    std::fs::write(run_dir.join("summary.json"), export_json(result)?)
        .context("failed to write summary.json")?;
    std::fs::write(run_dir.join("ledger.csv"), export_ledger_csv(ledger)?)
        .context("failed to write ledger.csv")?;
    std::fs::write(run_dir.join("report.md"), export_markdown(result))
        .context("failed to write report.md")?;

    Ok(run_dir)
}

/// Load a `SimulationResult` back from an artifact directory.
pub fn load_artifacts(dir: &Path) -> Result<SimulationResult> {
    let path = dir.join("summary.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use dcasim_core::data::InMemorySource;
    use dcasim_core::{ContributionPlan, PricePoint, SimulationRequest};

    use crate::runner::{run_simulation, RunOutput};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn sample_run(starting: f64, monthly: f64) -> RunOutput {
        let points = d(2022, 12, 20)
            .iter_days()
            .take_while(|x| *x <= d(2023, 3, 31))
            .enumerate()
            .map(|(i, x)| PricePoint::new(x, 50.0 + i as f64 * 0.25))
            .collect();
        let source = InMemorySource::new().with_ticker("ACME", points);
        let request = SimulationRequest::new(
            "acme",
            d(2023, 1, 1),
            d(2023, 3, 31),
            ContributionPlan::new(starting, monthly, 15),
        );
        run_simulation(&request, &source, d(2024, 1, 1), true).unwrap()
    }

    #[test]
    fn json_round_trip_preserves_result() {
        let out = sample_run(1000.0, 100.0);
        let json = export_json(&out.result).unwrap();
        assert_eq!(import_json(&json).unwrap(), out.result);
    }

    #[test]
    fn newer_schema_is_rejected() {
        let out = sample_run(1000.0, 100.0);
        let mut value = serde_json::to_value(&out.result).unwrap();
        value["schema_version"] = serde_json::json!(SCHEMA_VERSION + 1);
        let err = import_json(&value.to_string()).unwrap_err();
        assert!(err.to_string().contains("unsupported schema version"));
    }

    #[test]
    fn missing_schema_version_defaults() {
        let out = sample_run(1000.0, 100.0);
        let mut value = serde_json::to_value(&out.result).unwrap();
        value.as_object_mut().unwrap().remove("schema_version");
        assert_eq!(import_json(&value.to_string()).unwrap().schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn ledger_csv_has_one_line_per_day() {
        let out = sample_run(1000.0, 100.0);
        let csv = export_ledger_csv(&out.ledger).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "date,close_price,contribution,shares_purchased,cumulative_shares,total_value,total_investment"
        );
        assert_eq!(lines.len(), out.ledger.len() + 1);
        assert!(lines[1].starts_with("2023-01-01,"));
        assert!(lines[1].ends_with(",1000.00"));
    }

    #[test]
    fn markdown_shows_dashboard_lines() {
        let out = sample_run(1000.0, 100.0);
        let md = export_markdown(&out.result);
        assert!(md.contains("# Investment Simulation: ACME"));
        assert!(md.contains("- Total Invested Amount: $1300.00"));
        assert!(md.contains("- Number of Months of Investment: 2"));
        assert!(md.contains("CAGR (Compound Annual Growth Rate): "));
        assert!(!md.contains("SYNTHETIC"));
    }

    #[test]
    fn markdown_marks_undefined_ratios() {
        let out = sample_run(0.0, 0.0);
        let md = export_markdown(&out.result);
        assert!(md.contains("- Percentage Return on Investment: n/a"));
        assert!(md.contains("- CAGR (Compound Annual Growth Rate): n/a"));
    }

    #[test]
    fn percent_formats_defined_and_undefined() {
        assert_eq!(percent(Some(12.346)), "12.35%");
        assert_eq!(percent(Some(-3.0)), "-3.00%");
        assert_eq!(percent(None), "n/a");
    }

    #[test]
    fn artifacts_written_under_run_id() {
        let dir = tempfile::tempdir().unwrap();
        let out = sample_run(500.0, 50.0);
        let run_dir = save_artifacts(&out.result, &out.ledger, dir.path()).unwrap();

        assert_eq!(run_dir, dir.path().join(&out.result.run_id));
        assert!(run_dir.join("summary.json").is_file());
        assert!(run_dir.join("ledger.csv").is_file());
        assert!(run_dir.join("report.md").is_file());
        assert_eq!(load_artifacts(&run_dir).unwrap(), out.result);
    }
}
