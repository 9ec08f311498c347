use crate::models::dashboard::{AllocationSlice, PatrimonioPoint, PatrimonioRow, PatrimonioSummary};
use crate::models::money::format_money;
use crate::models::portfolio::Portfolio;
use crate::services::dashboard_service::DashboardService;

/// State of the dashboard: patrimonio evolution plus the live valuation.
///
/// The valuation is optional; without it only the evolution chart has data.
#[derive(Debug, Clone)]
pub struct DashboardView {
    patrimonio: Vec<PatrimonioPoint>,
    portfolio: Option<Portfolio>,
}

impl DashboardView {
    /// Points are sorted by month key and duplicates dropped.
    pub fn new(mut patrimonio: Vec<PatrimonioPoint>, portfolio: Option<Portfolio>) -> Self {
        patrimonio.sort_by(|a, b| a.month.cmp(&b.month));
        patrimonio.dedup_by(|a, b| a.month == b.month);
        Self { patrimonio, portfolio }
    }

    pub fn patrimonio(&self) -> &[PatrimonioPoint] {
        &self.patrimonio
    }

    pub fn portfolio(&self) -> Option<&Portfolio> {
        self.portfolio.as_ref()
    }

    /// The evolution chart is hidden while there is no month.
    pub fn has_evolution(&self) -> bool {
        !self.patrimonio.is_empty()
    }

    pub fn patrimonio_rows(&self) -> Vec<PatrimonioRow> {
        DashboardService::new().patrimonio_rows(&self.patrimonio)
    }

    pub fn patrimonio_summary(&self) -> PatrimonioSummary {
        DashboardService::new().patrimonio_summary(&self.patrimonio)
    }

    /// Allocation pie; empty without a valuation.
    pub fn allocation(&self) -> Vec<AllocationSlice> {
        self.portfolio
            .as_ref()
            .map(|p| DashboardService::new().allocation(p))
            .unwrap_or_default()
    }

    pub fn unrealized_pnl_pct(&self) -> f64 {
        self.portfolio
            .as_ref()
            .map_or(0.0, |p| DashboardService::new().unrealized_pnl_pct(p))
    }

    /// "12.34"; "0.00" without a valuation or a positive cost.
    pub fn unrealized_pnl_pct_label(&self) -> String {
        format_money(self.unrealized_pnl_pct())
    }

    pub fn shows_cash_breakdown(&self) -> bool {
        self.portfolio
            .as_ref()
            .is_some_and(|p| DashboardService::new().shows_cash_breakdown(p))
    }
}
