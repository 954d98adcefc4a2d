#![allow(clippy::unwrap_used)]
// Integration tests for the `Dashboard` refresh orchestrator.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use finboard_api::{AdminClient, MemoryCredentials};
use finboard_core::{AdminStore, AuthSource, Dashboard, DashboardConfig, StoreSettings, Tab};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup(interval: Duration) -> (MockServer, Dashboard) {
    let server = MockServer::start().await;
    let url = Url::parse(&server.uri()).unwrap();
    let client = AdminClient::with_client(
        reqwest::Client::new(),
        url.clone(),
        Arc::new(MemoryCredentials::new()),
    );
    let store = Arc::new(AdminStore::new(Arc::new(client), StoreSettings::default()));
    let mut config = DashboardConfig::new(url, AuthSource::Anonymous);
    config.refresh_interval = interval;
    (server, Dashboard::with_store(config, store))
}

async fn expect_get(server: &MockServer, route: &str, body: serde_json::Value, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(times)
        .mount(server)
        .await;
}

// ── Tab dispatch ────────────────────────────────────────────────────

#[tokio::test]
async fn test_refresh_all_overview_by_default() {
    let (server, dash) = setup(Duration::from_secs(30)).await;
    expect_get(&server, "/api/v1/admin/stats", json!({}), 1).await;
    expect_get(&server, "/api/v1/admin/users/activity", json!([]), 1).await;
    expect_get(&server, "/api/v1/admin/system/metrics", json!({}), 1).await;
    expect_get(&server, "/api/v1/admin/system/health", json!({}), 0).await;

    assert_eq!(dash.active_tab(), Tab::Overview);
    dash.refresh_all().await;

    assert!(dash.store().user_activity().is_loaded());
    assert!(!dash.store().is_refreshing());
}

#[tokio::test]
async fn test_refresh_all_follows_active_tab() {
    let (server, dash) = setup(Duration::from_secs(30)).await;
    expect_get(&server, "/api/v1/admin/system/health", json!({"status": "degraded"}), 1).await;
    expect_get(&server, "/api/v1/admin/system/metrics", json!({}), 1).await;
    expect_get(&server, "/api/v1/admin/stats", json!({}), 0).await;

    dash.set_active_tab("Health");
    dash.refresh_all().await;

    assert_eq!(
        dash.store().system_health().data.unwrap().status,
        finboard_core::HealthStatus::Degraded
    );
}

#[tokio::test]
async fn test_unknown_tab_refreshes_overview() {
    let (server, dash) = setup(Duration::from_secs(30)).await;
    expect_get(&server, "/api/v1/admin/stats", json!({}), 1).await;
    expect_get(&server, "/api/v1/admin/users/activity", json!([]), 1).await;
    expect_get(&server, "/api/v1/admin/system/metrics", json!({}), 1).await;

    assert_eq!(dash.set_active_tab("reports"), Tab::Overview);
    dash.refresh_all().await;
}

#[tokio::test]
async fn test_set_active_tab_makes_no_request() {
    let (server, dash) = setup(Duration::from_secs(30)).await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    dash.set_active_tab("audit");
    assert_eq!(dash.active_tab(), Tab::Audit);
}

// ── Auto-refresh ────────────────────────────────────────────────────

#[tokio::test]
async fn test_auto_refresh_ticks_until_disabled() {
    let (server, dash) = setup(Duration::from_millis(50)).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/admin/logs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    dash.set_active_tab("logs");
    let mut logs = dash.store().subscribe_logs();
    dash.set_auto_refresh(true);
    assert!(dash.auto_refresh());

    // Wait for one full loading → settled cycle.
    let settled = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let state = logs.changed().await.unwrap();
            if state.resource.is_loaded() && !state.resource.loading {
                break state;
            }
        }
    })
    .await
    .unwrap();
    assert_eq!(settled.resource.error, None);

    dash.set_auto_refresh(false);
    assert!(!dash.auto_refresh());
    dash.shutdown().await;
}
