use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::money::parse_decimal;

/// Live valuation of the whole portfolio (`GET /portfolio/`).
///
/// Computed server-side at request time from the latest prices, so it can be
/// fresher than the last periodic snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    /// Market value of all renta-variable positions
    pub total_market_value: String,
    pub total_cost: String,
    pub total_unrealized_pnl: String,
    #[serde(default)]
    pub realized_pnl_total: String,
    pub total_cash: String,
    pub grand_total: String,
    #[serde(default)]
    pub accounts: Vec<AccountBalance>,
    #[serde(default)]
    pub positions: Vec<Position>,
}

impl Portfolio {
    /// Live market value, as compared against the last RV snapshot.
    pub fn market_value(&self) -> Option<f64> {
        parse_decimal(&self.total_market_value)
    }

    /// Find the open position for an asset.
    pub fn position(&self, asset_id: Uuid) -> Option<&Position> {
        self.positions.iter().find(|p| p.asset_id == asset_id)
    }
}

/// Cash balance of one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub account_id: Uuid,
    pub account_name: String,
    pub account_type: String,
    pub balance: String,
}

/// An open position in one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub asset_id: Uuid,
    pub asset_name: String,
    pub asset_ticker: Option<String>,
    pub asset_type: String,
    pub quantity: String,
    pub avg_cost: String,
    pub cost_total: String,
    pub current_price: String,
    pub market_value: String,
    pub unrealized_pnl: String,
    pub unrealized_pnl_pct: String,
    pub weight_pct: String,
}

impl Position {
    pub fn market_value(&self) -> Option<f64> {
        parse_decimal(&self.market_value)
    }

    pub fn cost_total(&self) -> Option<f64> {
        parse_decimal(&self.cost_total)
    }
}

/// Result of `POST /assets/update-prices/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceUpdateResult {
    pub updated: u32,
    #[serde(default)]
    pub errors: Vec<String>,
}
