pub mod api;
pub mod errors;
pub mod models;
pub mod services;
pub mod views;

use chrono::{DateTime, Local, NaiveDate, Utc};
use std::sync::Arc;
use uuid::Uuid;

use api::{http::HttpApi, traits::FintrackApi};
use errors::CoreError;
use models::{
    dashboard::PatrimonioPoint,
    page::PageState,
    portfolio::{Portfolio, Position, PriceUpdateResult},
    range::SeriesRange,
    savings::{MonthlySavingsResponse, SavingsQuery},
    series::{AssetPositionPoint, RvPoint},
    settings::{BackendSettings, ClientConfig},
    snapshot::SnapshotStatus,
};
#[cfg(not(target_arch = "wasm32"))]
use services::refresh_service::RefreshScheduler;
use services::query_service::QueryService;
use views::{
    dashboard::DashboardView,
    evolution::{AssetOverview, RvOverview},
    savings::SavingsPage,
};

/// Main entry point for the Fintrack core library.
/// Holds the client configuration and the cached query layer over the API.
#[must_use]
pub struct Fintrack {
    config: ClientConfig,
    queries: Arc<QueryService>,
}

impl std::fmt::Debug for Fintrack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fintrack")
            .field("base_url", &self.config.base_url)
            .field("authenticated", &self.config.api_token.is_some())
            .field("max_retries", &self.config.max_retries)
            .finish()
    }
}

impl Fintrack {
    /// Connect to a Fintrack backend over HTTP.
    pub fn new(config: ClientConfig) -> Result<Self, CoreError> {
        let api = HttpApi::new(config.clone())?;
        Ok(Self::with_api(Arc::new(api), config))
    }

    /// Use a custom API implementation (tests, alternate transports).
    pub fn with_api(api: Arc<dyn FintrackApi>, config: ClientConfig) -> Self {
        let queries = Arc::new(QueryService::new(api, &config));
        Self { config, queries }
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The cached query layer, shared with the refresh timers.
    #[must_use]
    pub fn queries(&self) -> &Arc<QueryService> {
        &self.queries
    }

    // ── Series ──────────────────────────────────────────────────────

    /// Monthly savings between two `YYYY-MM` month keys (inclusive).
    /// No bounds fetches the full history.
    pub async fn monthly_savings(
        &self,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<MonthlySavingsResponse, CoreError> {
        let query = SavingsQuery {
            from: from.map(str::to_string),
            to: to.map(str::to_string),
        };
        self.queries.monthly_savings(&query).await
    }

    pub async fn position_history(&self, asset_id: Uuid) -> Result<Vec<AssetPositionPoint>, CoreError> {
        self.queries.position_history(asset_id).await
    }

    pub async fn rv_evolution(&self) -> Result<Vec<RvPoint>, CoreError> {
        self.queries.rv_evolution().await
    }

    pub async fn patrimonio_evolution(&self) -> Result<Vec<PatrimonioPoint>, CoreError> {
        self.queries.patrimonio_evolution().await
    }

    pub async fn portfolio(&self) -> Result<Portfolio, CoreError> {
        self.queries.portfolio().await
    }

    pub async fn snapshot_status(&self) -> Result<SnapshotStatus, CoreError> {
        self.queries.snapshot_status().await
    }

    pub async fn backend_settings(&self) -> Result<BackendSettings, CoreError> {
        self.queries.settings().await
    }

    /// Trigger a backend price update; the next portfolio read refetches.
    pub async fn refresh_prices(&self) -> Result<PriceUpdateResult, CoreError> {
        self.queries.update_prices().await
    }

    // ── Pages ───────────────────────────────────────────────────────

    /// Monthly savings page over the full history, as of today.
    pub async fn savings_page(&self) -> PageState<SavingsPage> {
        self.savings_page_at(Local::now().date_naive()).await
    }

    pub async fn savings_page_at(&self, today: NaiveDate) -> PageState<SavingsPage> {
        match self.queries.monthly_savings(&SavingsQuery::full_history()).await {
            Ok(response) if response.months.is_empty() => PageState::Empty,
            Ok(response) => PageState::Ready(SavingsPage::from_response(response, today)),
            Err(e) => failed("monthly-savings", e),
        }
    }

    /// Dashboard: patrimonio evolution, allocation and unrealized P&L.
    ///
    /// Fails only if the patrimonio series can't be fetched; a missing
    /// valuation leaves the allocation and P&L figures empty.
    pub async fn dashboard(&self) -> PageState<DashboardView> {
        let patrimonio = match self.queries.patrimonio_evolution().await {
            Ok(points) => points,
            Err(e) => return failed("patrimonio-evolution", e),
        };
        let portfolio = self.live_portfolio().await;
        if patrimonio.is_empty() && portfolio.is_none() {
            return PageState::Empty;
        }
        PageState::Ready(DashboardView::new(patrimonio, portfolio))
    }

    /// Renta-variable evolution with the live portfolio value.
    pub async fn rv_overview(&self, range: SeriesRange) -> PageState<RvOverview> {
        self.rv_overview_at(range, Utc::now()).await
    }

    pub async fn rv_overview_at(&self, range: SeriesRange, now: DateTime<Utc>) -> PageState<RvOverview> {
        let points = match self.queries.rv_evolution().await {
            Ok(points) if points.is_empty() => return PageState::Empty,
            Ok(points) => points,
            Err(e) => return failed("rv-evolution", e),
        };
        let portfolio = self.live_portfolio().await;
        PageState::Ready(RvOverview::from_portfolio(points, portfolio.as_ref(), now).with_range(range))
    }

    /// Position history of one asset with its live market value and cost.
    pub async fn asset_overview(&self, position: &Position, range: SeriesRange) -> PageState<AssetOverview> {
        self.asset_overview_at(position, range, Utc::now()).await
    }

    pub async fn asset_overview_at(
        &self,
        position: &Position,
        range: SeriesRange,
        now: DateTime<Utc>,
    ) -> PageState<AssetOverview> {
        match self.queries.position_history(position.asset_id).await {
            Ok(points) if points.is_empty() => PageState::Empty,
            Ok(points) => {
                PageState::Ready(AssetOverview::from_position(points, Some(position), now).with_range(range))
            }
            Err(e) => failed("position-history", e),
        }
    }

    /// Current valuation, or the last one received if the refetch fails.
    async fn live_portfolio(&self) -> Option<Portfolio> {
        match self.queries.portfolio().await {
            Ok(portfolio) => Some(portfolio),
            Err(e) => {
                tracing::warn!(error = %e, "Live valuation unavailable, using last known");
                self.queries.last_known_portfolio()
            }
        }
    }

    // ── Timers ──────────────────────────────────────────────────────

    /// Start the background price refresh and snapshot polling.
    ///
    /// The price interval comes from the backend settings; if they can't be
    /// read, only snapshot polling runs. Must be called inside a tokio runtime.
    #[cfg(not(target_arch = "wasm32"))]
    pub async fn start_refresh(&self) -> RefreshScheduler {
        let price_update_minutes = match self.queries.settings().await {
            Ok(settings) => settings.price_update_interval,
            Err(e) => {
                tracing::warn!(error = %e, "Backend settings unavailable, auto price refresh disabled");
                0
            }
        };
        RefreshScheduler::start(
            Arc::clone(&self.queries),
            price_update_minutes,
            self.config.snapshot_poll_secs,
        )
    }
}

fn failed<T>(query: &str, error: CoreError) -> PageState<T> {
    tracing::warn!(query, error = %error, "Page data unavailable");
    PageState::Failed(error.to_string())
}
