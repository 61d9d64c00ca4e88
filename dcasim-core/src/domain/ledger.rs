//! The daily ledger — the table every pipeline stage reads or extends.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One calendar day of the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyLedgerRow {
    pub date: NaiveDate,
    pub price: f64,
    pub contribution: f64,
    pub shares_purchased: f64,
    pub cumulative_shares: f64,
    pub portfolio_value: f64,
    pub cumulative_invested: f64,
}

/// Chronological ledger for a whole simulation window.
///
/// Owned by the simulation call that produced it. The summarizer reads only
/// the last row, so chronological order is a hard invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    rows: Vec<DailyLedgerRow>,
}

impl Ledger {
    pub(crate) fn from_rows(rows: Vec<DailyLedgerRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[DailyLedgerRow] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &DailyLedgerRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> Option<&DailyLedgerRow> {
        self.rows.first()
    }

    pub fn last(&self) -> Option<&DailyLedgerRow> {
        self.rows.last()
    }

    /// Column-oriented view for charting.
    pub fn to_columns(&self) -> LedgerColumns {
        let n = self.rows.len();
        let mut columns = LedgerColumns {
            dates: Vec::with_capacity(n),
            close_prices: Vec::with_capacity(n),
            total_value: Vec::with_capacity(n),
            total_investment: Vec::with_capacity(n),
            cumulative_shares: Vec::with_capacity(n),
        };
        for row in &self.rows {
            columns.dates.push(row.date);
            columns.close_prices.push(row.price);
            columns.total_value.push(row.portfolio_value);
            columns.total_investment.push(row.cumulative_invested);
            columns.cumulative_shares.push(row.cumulative_shares);
        }
        columns
    }
}

/// The ledger as parallel sequences, one entry per day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerColumns {
    pub dates: Vec<NaiveDate>,
    pub close_prices: Vec<f64>,
    pub total_value: Vec<f64>,
    pub total_investment: Vec<f64>,
    #[serde(alias = "cumulative_stocks")]
    pub cumulative_shares: Vec<f64>,
}

impl LedgerColumns {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(day: u32, price: f64, contribution: f64, shares: f64, invested: f64) -> DailyLedgerRow {
        DailyLedgerRow {
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            price,
            contribution,
            shares_purchased: contribution / price,
            cumulative_shares: shares,
            portfolio_value: shares * price,
            cumulative_invested: invested,
        }
    }

    #[test]
    fn columns_preserve_order_and_length() {
        let ledger = Ledger::from_rows(vec![
            row(1, 10.0, 100.0, 10.0, 100.0),
            row(2, 20.0, 0.0, 10.0, 100.0),
        ]);
        let cols = ledger.to_columns();
        assert_eq!(cols.len(), 2);
        assert_eq!(cols.close_prices, vec![10.0, 20.0]);
        assert_eq!(cols.total_value, vec![100.0, 200.0]);
        assert_eq!(cols.total_investment, vec![100.0, 100.0]);
        assert_eq!(cols.dates[1], NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
    }

    #[test]
    fn columns_serialize_dates_as_iso_strings() {
        let ledger = Ledger::from_rows(vec![row(5, 10.0, 0.0, 0.0, 0.0)]);
        let json = serde_json::to_value(ledger.to_columns()).unwrap();
        assert_eq!(json["dates"][0], "2024-03-05");
    }

    #[test]
    fn columns_accept_legacy_share_column_name() {
        let json = r#"{"dates":["2024-03-01"],"close_prices":[1.0],"total_value":[2.0],
            "total_investment":[2.0],"cumulative_stocks":[2.0]}"#;
        let cols: LedgerColumns = serde_json::from_str(json).unwrap();
        assert_eq!(cols.cumulative_shares, vec![2.0]);
    }
}
