use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;
use uuid::Uuid;

use super::traits::FintrackApi;
use crate::errors::CoreError;
use crate::models::dashboard::PatrimonioPoint;
use crate::models::portfolio::{Portfolio, PriceUpdateResult};
use crate::models::savings::{MonthlySavingsResponse, SavingsQuery};
use crate::models::series::{AssetPositionPoint, RvPoint};
use crate::models::settings::{BackendSettings, ClientConfig};
use crate::models::snapshot::SnapshotStatus;

/// Longest slice of an error body kept in `CoreError::Api` messages.
const MAX_ERROR_BODY: usize = 200;

/// Fintrack REST client over `reqwest`.
///
/// - JSON in, JSON out; monetary fields stay decimal strings.
/// - Optional bearer token on every request.
/// - Non-2xx responses become `CoreError::Api` with the status and the
///   start of the response body.
pub struct HttpApi {
    client: Client,
    config: ClientConfig,
}

impl HttpApi {
    pub fn new(config: ClientConfig) -> Result<Self, CoreError> {
        config.validate()?;
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(config.request_timeout_secs));
        Ok(Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, CoreError> {
        let url = self.config.endpoint_url(path);
        tracing::debug!(endpoint = %path, "GET");
        let request = self.authorize(self.client.get(&url).query(query));
        self.send(path, request).await
    }

    async fn post_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CoreError> {
        let url = self.config.endpoint_url(path);
        tracing::debug!(endpoint = %path, "POST");
        let request = self.authorize(self.client.post(&url));
        self.send(path, request).await
    }

    async fn send<T: DeserializeOwned>(&self, path: &str, request: RequestBuilder) -> Result<T, CoreError> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(endpoint = %path, error = %e, "Request failed");
            CoreError::from(e)
        })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(endpoint = %path, status = status.as_u16(), "Non-success status");
            return Err(CoreError::Api {
                endpoint: path.to_string(),
                status: status.as_u16(),
                message: truncate(&body, MAX_ERROR_BODY),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(endpoint = %path, error = %e, "Failed to parse response");
            CoreError::Deserialization(format!("{path}: {e}"))
        })
    }
}

fn truncate(body: &str, max: usize) -> String {
    match body.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl FintrackApi for HttpApi {
    async fn monthly_savings(&self, query: &SavingsQuery) -> Result<MonthlySavingsResponse, CoreError> {
        query.validate()?;
        let mut params: Vec<(&str, &str)> = Vec::new();
        if let Some(from) = &query.from {
            params.push(("from", from.as_str()));
        }
        if let Some(to) = &query.to {
            params.push(("to", to.as_str()));
        }
        self.get_json("/reports/monthly-savings/", &params).await
    }

    async fn position_history(&self, asset_id: Uuid) -> Result<Vec<AssetPositionPoint>, CoreError> {
        self.get_json(&format!("/assets/{asset_id}/position-history/"), &[])
            .await
    }

    async fn rv_evolution(&self) -> Result<Vec<RvPoint>, CoreError> {
        self.get_json("/reports/rv-evolution/", &[]).await
    }

    async fn patrimonio_evolution(&self) -> Result<Vec<PatrimonioPoint>, CoreError> {
        self.get_json("/reports/patrimonio-evolution/", &[]).await
    }

    async fn portfolio(&self) -> Result<Portfolio, CoreError> {
        self.get_json("/portfolio/", &[]).await
    }

    async fn snapshot_status(&self) -> Result<SnapshotStatus, CoreError> {
        self.get_json("/reports/snapshot-status/", &[]).await
    }

    async fn settings(&self) -> Result<BackendSettings, CoreError> {
        self.get_json("/settings/", &[]).await
    }

    async fn update_prices(&self) -> Result<PriceUpdateResult, CoreError> {
        self.post_json("/assets/update-prices/").await
    }
}
