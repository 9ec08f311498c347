use crate::models::dashboard::{
    AllocationBucket, AllocationSlice, PatrimonioPoint, PatrimonioRow, PatrimonioSummary,
};
use crate::models::money::parse_decimal;
use crate::models::portfolio::Portfolio;

/// Derives the dashboard figures: patrimonio evolution, allocation split and
/// unrealized P&L percentage.
pub struct DashboardService;

impl DashboardService {
    pub fn new() -> Self {
        Self
    }

    /// One chart row per month with `total = cash + investments`.
    pub fn patrimonio_rows(&self, points: &[PatrimonioPoint]) -> Vec<PatrimonioRow> {
        points.iter().map(PatrimonioPoint::row).collect()
    }

    /// Figures of the last month; all zero for an empty series.
    pub fn patrimonio_summary(&self, points: &[PatrimonioPoint]) -> PatrimonioSummary {
        points.last().map_or_else(PatrimonioSummary::default, |p| {
            let row = p.row();
            PatrimonioSummary {
                cash: row.cash,
                investments: row.investments,
                total: row.total,
            }
        })
    }

    /// Renta variable / renta fija / cash split of the live valuation.
    ///
    /// Buckets that are not strictly positive are left out, so the pie never
    /// shows empty or negative slices. Order is always RV, RF, cash.
    pub fn allocation(&self, portfolio: &Portfolio) -> Vec<AllocationSlice> {
        let mut rv = 0.0;
        let mut rf = 0.0;
        for position in &portfolio.positions {
            let value = position.market_value().unwrap_or(0.0);
            match AllocationBucket::for_asset_type(&position.asset_type) {
                AllocationBucket::RentaVariable => rv += value,
                _ => rf += value,
            }
        }
        let cash = parse_decimal(&portfolio.total_cash).unwrap_or(0.0);

        let buckets: Vec<(AllocationBucket, f64)> = [
            (AllocationBucket::RentaVariable, rv),
            (AllocationBucket::RentaFija, rf),
            (AllocationBucket::Efectivo, cash),
        ]
        .into_iter()
        .filter(|&(_, value)| value > 0.0)
        .collect();

        let total: f64 = buckets.iter().map(|&(_, value)| value).sum();
        buckets
            .into_iter()
            .map(|(bucket, value)| AllocationSlice {
                bucket,
                value,
                share_pct: if total > 0.0 { (value / total) * 100.0 } else { 0.0 },
            })
            .collect()
    }

    /// Unrealized P&L over total cost × 100; 0 when the cost is not positive.
    pub fn unrealized_pnl_pct(&self, portfolio: &Portfolio) -> f64 {
        let cost = parse_decimal(&portfolio.total_cost).unwrap_or(0.0);
        if cost <= 0.0 {
            return 0.0;
        }
        let pnl = parse_decimal(&portfolio.total_unrealized_pnl).unwrap_or(0.0);
        (pnl / cost) * 100.0
    }

    /// Whether the grand total card breaks down investments + cash.
    pub fn shows_cash_breakdown(&self, portfolio: &Portfolio) -> bool {
        parse_decimal(&portfolio.total_cash).is_some_and(|cash| cash > 0.0)
    }
}

impl Default for DashboardService {
    fn default() -> Self {
        Self::new()
    }
}
