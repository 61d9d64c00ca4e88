//! CSV price import.
//!
//! Accepts any CSV with a header row containing a `date` column and a `close`
//! column (`adj_close` is used when there is no `close`). Other columns such as
//! `open,high,low,volume` are ignored. Empty close cells are missing
//! observations and are skipped.
//!
//! The path is either a single file, used for every ticker, or a directory
//! holding one `<TICKER>.csv` per security.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::debug;

use super::provider::{DataError, PriceSource, SourceKind};
use crate::domain::PricePoint;

/// Reads closing prices from CSV files on disk.
#[derive(Debug, Clone)]
pub struct CsvPriceSource {
    path: PathBuf,
}

impl CsvPriceSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolve the file holding `ticker`'s history.
    fn file_for(&self, ticker: &str) -> Option<PathBuf> {
        if self.path.is_file() {
            return Some(self.path.clone());
        }
        if !self.path.is_dir() {
            return None;
        }
        [ticker.to_uppercase(), ticker.to_lowercase()]
            .iter()
            .map(|name| self.path.join(format!("{name}.csv")))
            .find(|candidate| candidate.is_file())
    }
}

impl PriceSource for CsvPriceSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::CsvImport
    }

    fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>, DataError> {
        let file = self.file_for(ticker).ok_or_else(|| {
            DataError::unavailable(
                ticker,
                format!("no CSV file for this ticker under {}", self.path.display()),
            )
        })?;

        let all = read_price_csv(&file)?;
        let points: Vec<PricePoint> = all
            .into_iter()
            .filter(|p| p.date >= start && p.date <= end)
            .collect();

        debug!(ticker, file = %file.display(), rows = points.len(), "loaded CSV prices");

        if points.is_empty() {
            return Err(DataError::unavailable(
                ticker,
                format!("no prices between {start} and {end} in {}", file.display()),
            ));
        }
        Ok(points)
    }
}

/// Parse a price CSV into points, in file order.
pub fn read_price_csv(path: &Path) -> Result<Vec<PricePoint>, DataError> {
    let display = path.display().to_string();
    let parse_err = |reason: String| DataError::Parse {
        path: display.clone(),
        reason,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| match e.into_kind() {
            csv::ErrorKind::Io(source) => DataError::Io {
                path: display.clone(),
                source,
            },
            other => parse_err(format!("{other:?}")),
        })?;

    let headers = reader
        .headers()
        .map_err(|e| parse_err(format!("unreadable header: {e}")))?
        .clone();
    let column = |names: &[&str]| {
        headers
            .iter()
            .position(|h| names.iter().any(|n| h.eq_ignore_ascii_case(n)))
    };
    let date_idx = column(&["date", "timestamp"])
        .ok_or_else(|| parse_err("missing `date` column".into()))?;
    let close_idx = column(&["close"])
        .or_else(|| column(&["adj_close", "adj close"]))
        .ok_or_else(|| parse_err("missing `close` column".into()))?;

    let mut points = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|e| parse_err(format!("row {}: {e}", line + 2)))?;
        let date_cell = record.get(date_idx).unwrap_or("");
        let close_cell = record.get(close_idx).unwrap_or("");
        if close_cell.is_empty() {
            continue;
        }
        let date = parse_date(date_cell)
            .ok_or_else(|| parse_err(format!("row {}: bad date '{date_cell}'", line + 2)))?;
        let close: f64 = close_cell
            .parse()
            .map_err(|_| parse_err(format!("row {}: bad close '{close_cell}'", line + 2)))?;
        points.push(PricePoint::new(date, close));
    }
    Ok(points)
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time component.
fn parse_date(cell: &str) -> Option<NaiveDate> {
    let day = cell.get(..10).unwrap_or(cell);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}
