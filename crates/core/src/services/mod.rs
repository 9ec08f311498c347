pub mod analytics_service;
pub mod chart_service;
pub mod dashboard_service;
pub mod query_service;
pub mod range_service;
#[cfg(not(target_arch = "wasm32"))]
pub mod refresh_service;
pub mod savings_service;
