use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::dashboard::PatrimonioPoint;
use crate::models::portfolio::{Portfolio, PriceUpdateResult};
use crate::models::savings::{MonthlySavingsResponse, SavingsQuery};
use crate::models::series::{AssetPositionPoint, RvPoint};
use crate::models::settings::BackendSettings;
use crate::models::snapshot::SnapshotStatus;

/// The Fintrack REST endpoints this library consumes.
///
/// `HttpApi` talks to a real backend; tests substitute an in-memory
/// implementation. Everything above this trait is transport-agnostic.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait FintrackApi: Send + Sync {
    /// `GET /reports/monthly-savings/?from&to`, ascending by month.
    async fn monthly_savings(&self, query: &SavingsQuery) -> Result<MonthlySavingsResponse, CoreError>;

    /// `GET /assets/{id}/position-history/`, ascending by `captured_at`.
    async fn position_history(&self, asset_id: Uuid) -> Result<Vec<AssetPositionPoint>, CoreError>;

    /// `GET /reports/rv-evolution/`, ascending by `captured_at`.
    async fn rv_evolution(&self) -> Result<Vec<RvPoint>, CoreError>;

    /// `GET /reports/patrimonio-evolution/`: monthly cash and investments, ascending.
    async fn patrimonio_evolution(&self) -> Result<Vec<PatrimonioPoint>, CoreError>;

    /// `GET /portfolio/`: live valuation.
    async fn portfolio(&self) -> Result<Portfolio, CoreError>;

    /// `GET /reports/snapshot-status/`.
    async fn snapshot_status(&self) -> Result<SnapshotStatus, CoreError>;

    /// `GET /settings/`.
    async fn settings(&self) -> Result<BackendSettings, CoreError>;

    /// `POST /assets/update-prices/`: ask the backend to refetch market prices.
    async fn update_prices(&self) -> Result<PriceUpdateResult, CoreError>;
}
