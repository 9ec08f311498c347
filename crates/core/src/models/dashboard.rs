use serde::{Deserialize, Serialize};

use super::money::parse_decimal;

/// One month of `GET /reports/patrimonio-evolution/`, ascending by month.
///
/// Cash is the sum of the latest known account balances; investments are the
/// held quantities valued at the latest known prices, both as of that month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatrimonioPoint {
    /// `YYYY-MM`
    pub month: String,
    pub cash: String,
    pub investments: String,
    /// Equity share of `investments`, when the backend splits it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renta_variable: Option<String>,
    /// Fixed-income share of `investments`, when the backend splits it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renta_fija: Option<String>,
}

impl PatrimonioPoint {
    /// Cash and investments parsed; malformed values count as `0.0`.
    pub fn row(&self) -> PatrimonioRow {
        let cash = parse_decimal(&self.cash).unwrap_or(0.0);
        let investments = parse_decimal(&self.investments).unwrap_or(0.0);
        PatrimonioRow {
            month: self.month.clone(),
            cash,
            investments,
            total: cash + investments,
        }
    }
}

/// A patrimonio month ready for the stacked area chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatrimonioRow {
    pub month: String,
    pub cash: f64,
    pub investments: f64,
    /// `cash + investments`
    pub total: f64,
}

/// Header figures of the patrimonio chart: the last month of the series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PatrimonioSummary {
    pub cash: f64,
    pub investments: f64,
    pub total: f64,
}

/// Bucket of the wealth allocation pie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AllocationBucket {
    /// Stocks, ETFs and crypto
    RentaVariable,
    /// Every other asset type
    RentaFija,
    /// Account balances
    Efectivo,
}

impl AllocationBucket {
    pub fn label(&self) -> &'static str {
        match self {
            AllocationBucket::RentaVariable => "Renta Variable",
            AllocationBucket::RentaFija => "Renta Fija",
            AllocationBucket::Efectivo => "Efectivo",
        }
    }

    /// Bucket a position falls in by its backend asset type.
    pub fn for_asset_type(asset_type: &str) -> Self {
        match asset_type {
            "STOCK" | "ETF" | "CRYPTO" => AllocationBucket::RentaVariable,
            _ => AllocationBucket::RentaFija,
        }
    }
}

impl std::fmt::Display for AllocationBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One slice of the allocation pie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationSlice {
    pub bucket: AllocationBucket,
    pub value: f64,
    /// Share of the summed slices × 100
    pub share_pct: f64,
}
