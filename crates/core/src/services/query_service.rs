use chrono::Utc;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::traits::FintrackApi;
use crate::errors::CoreError;
use crate::models::cache::QueryCache;
use crate::models::dashboard::PatrimonioPoint;
use crate::models::portfolio::{Portfolio, PriceUpdateResult};
use crate::models::savings::{MonthlySavingsResponse, SavingsQuery};
use crate::models::series::{AssetPositionPoint, RvPoint};
use crate::models::settings::{BackendSettings, ClientConfig};
use crate::models::snapshot::SnapshotStatus;

/// Fetches series from the API with per-parameter caching.
///
/// Cache strategy:
/// - **Fresh entry** (younger than its stale window): served from cache, no request.
/// - **Missing / stale / invalidated**: fetched, retried up to `max_retries`
///   extra times on failure, then stored.
/// - **Out-of-order completion**: if a request started later for the same
///   parameters has already been stored, the older response is discarded and
///   the newer value is returned instead.
pub struct QueryService {
    api: Arc<dyn FintrackApi>,
    max_retries: u32,
    savings: QueryCache<SavingsQuery, MonthlySavingsResponse>,
    positions: QueryCache<Uuid, Vec<AssetPositionPoint>>,
    rv: QueryCache<(), Vec<RvPoint>>,
    patrimonio: QueryCache<(), Vec<PatrimonioPoint>>,
    portfolio: QueryCache<(), Portfolio>,
    snapshot: QueryCache<(), SnapshotStatus>,
    settings: QueryCache<(), BackendSettings>,
}

impl QueryService {
    pub fn new(api: Arc<dyn FintrackApi>, config: &ClientConfig) -> Self {
        Self {
            api,
            max_retries: config.max_retries,
            savings: QueryCache::with_stale_secs(config.series_stale_secs),
            positions: QueryCache::with_stale_secs(config.series_stale_secs),
            rv: QueryCache::with_stale_secs(config.series_stale_secs),
            patrimonio: QueryCache::with_stale_secs(config.series_stale_secs),
            portfolio: QueryCache::with_stale_secs(config.portfolio_stale_secs),
            snapshot: QueryCache::with_stale_secs(config.snapshot_poll_secs),
            settings: QueryCache::with_stale_secs(config.series_stale_secs),
        }
    }

    pub async fn monthly_savings(&self, query: &SavingsQuery) -> Result<MonthlySavingsResponse, CoreError> {
        query.validate()?;
        cached(&self.savings, query.clone(), "monthly-savings", self.max_retries, || {
            self.api.monthly_savings(query)
        })
        .await
    }

    pub async fn position_history(&self, asset_id: Uuid) -> Result<Vec<AssetPositionPoint>, CoreError> {
        cached(&self.positions, asset_id, "position-history", self.max_retries, || {
            self.api.position_history(asset_id)
        })
        .await
    }

    pub async fn rv_evolution(&self) -> Result<Vec<RvPoint>, CoreError> {
        cached(&self.rv, (), "rv-evolution", self.max_retries, || self.api.rv_evolution()).await
    }

    pub async fn patrimonio_evolution(&self) -> Result<Vec<PatrimonioPoint>, CoreError> {
        cached(&self.patrimonio, (), "patrimonio-evolution", self.max_retries, || {
            self.api.patrimonio_evolution()
        })
        .await
    }

    pub async fn portfolio(&self) -> Result<Portfolio, CoreError> {
        cached(&self.portfolio, (), "portfolio", self.max_retries, || self.api.portfolio()).await
    }

    pub async fn snapshot_status(&self) -> Result<SnapshotStatus, CoreError> {
        cached(&self.snapshot, (), "snapshot-status", self.max_retries, || {
            self.api.snapshot_status()
        })
        .await
    }

    pub async fn settings(&self) -> Result<BackendSettings, CoreError> {
        cached(&self.settings, (), "settings", self.max_retries, || self.api.settings()).await
    }

    /// Ask the backend to refresh market prices, then mark the live
    /// valuation stale so the next read refetches it.
    pub async fn update_prices(&self) -> Result<PriceUpdateResult, CoreError> {
        let result = with_retry("update-prices", self.max_retries, || self.api.update_prices()).await?;
        tracing::info!(updated = result.updated, errors = result.errors.len(), "Prices updated");
        self.portfolio.invalidate(&());
        Ok(result)
    }

    /// Refetch the snapshot status even if the cached one is fresh.
    pub async fn poll_snapshot_status(&self) -> Result<SnapshotStatus, CoreError> {
        self.snapshot.invalidate(&());
        self.snapshot_status().await
    }

    /// Last valuation received, however old. Lets a page keep showing it
    /// while a refetch is in flight.
    pub fn last_known_portfolio(&self) -> Option<Portfolio> {
        self.portfolio.last_known(&())
    }

    pub fn last_known_snapshot_status(&self) -> Option<SnapshotStatus> {
        self.snapshot.last_known(&())
    }

    pub fn invalidate_portfolio(&self) {
        self.portfolio.invalidate(&());
    }

    /// Mark every cached response stale.
    pub fn invalidate_all(&self) {
        self.savings.invalidate_all();
        self.positions.invalidate_all();
        self.rv.invalidate_all();
        self.patrimonio.invalidate_all();
        self.portfolio.invalidate_all();
        self.snapshot.invalidate_all();
        self.settings.invalidate_all();
    }
}

/// Serve `key` from `cache` if fresh, otherwise fetch and store it.
async fn cached<K, V, F, Fut>(
    cache: &QueryCache<K, V>,
    key: K,
    label: &str,
    max_retries: u32,
    fetch: F,
) -> Result<V, CoreError>
where
    K: Eq + Hash + Clone,
    V: Clone,
    F: Fn() -> Fut,
    Fut: Future<Output = Result<V, CoreError>>,
{
    if let Some(value) = cache.get_fresh(&key, Utc::now()) {
        tracing::debug!(query = label, "Cache hit");
        return Ok(value);
    }

    let ticket = cache.begin();
    let value = with_retry(label, max_retries, fetch).await?;

    if cache.complete(key.clone(), ticket, value.clone(), Utc::now()) {
        return Ok(value);
    }

    tracing::debug!(query = label, "Discarding out-of-order response");
    Ok(cache.last_known(&key).unwrap_or(value))
}

/// Run `fetch`, retrying up to `max_retries` extra times before giving up.
async fn with_retry<V, F, Fut>(label: &str, max_retries: u32, fetch: F) -> Result<V, CoreError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<V, CoreError>>,
{
    let mut attempt = 0;
    loop {
        match fetch().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max_retries => {
                attempt += 1;
                tracing::warn!(query = label, attempt, error = %e, "Request failed, retrying");
            }
            Err(e) => {
                tracing::warn!(query = label, error = %e, "Request failed");
                return Err(e);
            }
        }
    }
}
