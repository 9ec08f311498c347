// ═══════════════════════════════════════════════════════════════════
// API Tests — HttpApi requests, auth header, status & body handling
// ═══════════════════════════════════════════════════════════════════

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use uuid::Uuid;

use fintrack_core::api::http::HttpApi;
use fintrack_core::api::traits::FintrackApi;
use fintrack_core::errors::CoreError;
use fintrack_core::models::savings::SavingsQuery;
use fintrack_core::models::settings::ClientConfig;

// ═══════════════════════════════════════════════════════════════════
// Test Helpers — one-shot local HTTP server
// ═══════════════════════════════════════════════════════════════════

/// Accept a single connection, answer with `status` and `body`, and hand
/// back the raw request head.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut head = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            head.extend_from_slice(&chunk[..n]);
            if head.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
        String::from_utf8_lossy(&head).into_owned()
    });

    (format!("http://{addr}/api"), handle)
}

fn client(base_url: &str, token: Option<&str>) -> HttpApi {
    let mut config = ClientConfig::default().with_base_url(base_url);
    if let Some(token) = token {
        config = config.with_token(token);
    }
    HttpApi::new(config).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
// Requests
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn monthly_savings_sends_bounds_and_token() {
    let (url, server) = serve_once(
        "200 OK",
        r#"{"months":[{"month":"2024-01","cash_end":"10.00","cash_delta":null,"investment_cost_delta":null,"real_savings":null,"comments":[]}]}"#,
    )
    .await;
    let api = client(&url, Some("tok-123"));

    let response = api
        .monthly_savings(&SavingsQuery::between("2024-01", "2024-12"))
        .await
        .unwrap();
    assert_eq!(response.months.len(), 1);
    assert_eq!(response.months[0].cash_end, "10.00");

    let request = server.await.unwrap();
    assert!(
        request.starts_with("GET /api/reports/monthly-savings/?from=2024-01&to=2024-12 HTTP/1.1"),
        "unexpected request line: {request}"
    );
    assert!(request.to_lowercase().contains("authorization: bearer tok-123"));
}

#[tokio::test]
async fn full_history_sends_no_query_and_no_token() {
    let (url, server) = serve_once("200 OK", r#"{"months":[]}"#).await;
    let api = client(&url, None);

    let response = api.monthly_savings(&SavingsQuery::full_history()).await.unwrap();
    assert!(response.months.is_empty());

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /api/reports/monthly-savings/ HTTP/1.1"));
    assert!(!request.to_lowercase().contains("authorization:"));
}

#[tokio::test]
async fn position_history_path_contains_asset_id() {
    let (url, server) = serve_once(
        "200 OK",
        r#"[{"captured_at":"2024-06-01T10:00:00+02:00","market_value":"1500.00","cost_basis":"1200.00"}]"#,
    )
    .await;
    let api = client(&url, None);
    let asset_id = Uuid::new_v4();

    let points = api.position_history(asset_id).await.unwrap();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].market_value, "1500.00");

    let request = server.await.unwrap();
    assert!(request.starts_with(&format!("GET /api/assets/{asset_id}/position-history/ HTTP/1.1")));
}

#[tokio::test]
async fn patrimonio_evolution_reads_monthly_points() {
    let (url, server) = serve_once(
        "200 OK",
        r#"[{"month":"2024-05","cash":"400.00","investments":"800.00"},{"month":"2024-06","cash":"500.00","investments":"1000.00"}]"#,
    )
    .await;
    let api = client(&url, None);

    let points = api.patrimonio_evolution().await.unwrap();
    assert_eq!(points.len(), 2);
    assert_eq!(points[1].investments, "1000.00");
    assert_eq!(points[1].renta_variable, None);

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /api/reports/patrimonio-evolution/ HTTP/1.1"));
}

#[tokio::test]
async fn update_prices_is_a_post() {
    let (url, server) = serve_once("200 OK", r#"{"updated":2,"errors":[]}"#).await;
    let api = client(&url, None);

    let result = api.update_prices().await.unwrap();
    assert_eq!(result.updated, 2);

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /api/assets/update-prices/ HTTP/1.1"));
}

#[tokio::test]
async fn trailing_slash_in_base_url_is_ignored() {
    let (url, server) = serve_once(
        "200 OK",
        r#"{"frequency_minutes":60,"last_snapshot":null,"next_snapshot":null}"#,
    )
    .await;
    let api = client(&format!("{url}/"), None);

    let status = api.snapshot_status().await.unwrap();
    assert_eq!(status.frequency_minutes, 60);

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /api/reports/snapshot-status/ HTTP/1.1"));
}

// ═══════════════════════════════════════════════════════════════════
// Failures
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn non_success_status_is_api_error() {
    let (url, server) = serve_once("500 Internal Server Error", r#"{"detail":"boom"}"#).await;
    let api = client(&url, None);

    let err = api.portfolio().await.unwrap_err();
    match err {
        CoreError::Api {
            endpoint,
            status,
            message,
        } => {
            assert_eq!(endpoint, "/portfolio/");
            assert_eq!(status, 500);
            assert!(message.contains("boom"));
        }
        other => panic!("Expected Api, got {other:?}"),
    }
    server.await.unwrap();
}

#[tokio::test]
async fn malformed_body_is_deserialization_error() {
    let (url, server) = serve_once("200 OK", r#"{"base_currency": 5}"#).await;
    let api = client(&url, None);

    match api.settings().await.unwrap_err() {
        CoreError::Deserialization(msg) => assert!(msg.starts_with("/settings/:")),
        other => panic!("Expected Deserialization, got {other:?}"),
    }
    server.await.unwrap();
}

#[tokio::test]
async fn invalid_query_fails_before_sending() {
    let api = client("http://127.0.0.1:9/api", None);
    let err = api
        .monthly_savings(&SavingsQuery::between("2024-12", "2024-01"))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::ValidationError(_)));
}

#[tokio::test]
async fn unreachable_backend_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = client(&format!("http://{addr}/api"), None);
    let err = api.rv_evolution().await.unwrap_err();
    assert!(matches!(err, CoreError::Network(_)));
}

#[test]
fn invalid_config_is_rejected() {
    let config = ClientConfig::default().with_base_url("localhost:8000");
    assert!(matches!(HttpApi::new(config), Err(CoreError::InvalidConfig(_))));
}
