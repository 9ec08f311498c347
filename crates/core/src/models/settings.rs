use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Client-side configuration: where the API lives and how eagerly to refetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API root, e.g. `http://localhost:8000/api`. No trailing slash needed.
    pub base_url: String,

    /// Bearer token sent with every request, if the session has one.
    pub api_token: Option<String>,

    /// Per-request timeout.
    pub request_timeout_secs: u64,

    /// Extra attempts after a failed request (the original client retries once).
    pub max_retries: u32,

    /// Freshness window for monthly savings and evolution series.
    pub series_stale_secs: u64,

    /// Freshness window for the live portfolio valuation.
    pub portfolio_stale_secs: u64,

    /// Polling period of the snapshot-status timer.
    pub snapshot_poll_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            api_token: None,
            request_timeout_secs: 30,
            max_retries: 1,
            series_stale_secs: 5 * 60,
            portfolio_stale_secs: 30,
            snapshot_poll_secs: 60,
        }
    }
}

impl ClientConfig {
    /// Load from a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let config: ClientConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(CoreError::InvalidConfig(format!(
                "base_url '{}' must start with http:// or https://",
                self.base_url
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(CoreError::InvalidConfig(
                "request_timeout_secs must be greater than 0".into(),
            ));
        }
        if self.snapshot_poll_secs == 0 {
            return Err(CoreError::InvalidConfig(
                "snapshot_poll_secs must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// `base_url` joined with an endpoint path starting with `/`.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim().trim_end_matches('/'), path)
    }
}

/// User settings stored by the backend (`GET /settings/`).
/// Only the fields the client acts on are modeled; the rest is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendSettings {
    pub base_currency: String,

    /// Auto price refresh period in minutes; 0 disables it.
    #[serde(default)]
    pub price_update_interval: u32,

    /// Snapshot period in minutes.
    #[serde(default)]
    pub snapshot_frequency: u32,
}
