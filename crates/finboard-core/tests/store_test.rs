#![allow(clippy::unwrap_used)]
// Integration tests for `AdminStore` against a wiremock backend.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use finboard_api::{AdminClient, CredentialStore, MemoryCredentials};
use finboard_core::{AdminStore, LogLevel, Resource, StoreSettings, UserActivity};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Arc<AdminStore>) {
    let server = MockServer::start().await;
    let client = AdminClient::with_client(
        reqwest::Client::new(),
        Url::parse(&server.uri()).unwrap(),
        Arc::new(MemoryCredentials::with_token(SecretString::from("tok"))),
    );
    let store = AdminStore::new(Arc::new(client), StoreSettings::default());
    (server, Arc::new(store))
}

fn stats_json() -> serde_json::Value {
    json!({
        "users": {"total": 42, "active": 30, "verified": 40, "new_24h": 2},
        "files": {"total": 10, "completed": 9, "processing": 1, "failed": 0},
        "financial_data": {"statements": 5, "line_items": 300, "models": 7},
        "system": {"version": "1.4.0", "environment": "staging"}
    })
}

fn metrics_json() -> serde_json::Value {
    json!({
        "cpu_usage": 12.5,
        "memory_usage": 40.0,
        "disk_usage": 70.0,
        "active_connections": 4,
        "request_count_24h": 1200,
        "error_rate_24h": 0.02,
        "avg_response_time": 85.0
    })
}

fn log_json(id: i64) -> serde_json::Value {
    json!({
        "id": id,
        "timestamp": "2024-06-15T10:30:00Z",
        "level": "INFO",
        "message": format!("entry {id}"),
    })
}

async fn mount_json(server: &MockServer, route: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

// ── Single resources ────────────────────────────────────────────────

#[tokio::test]
async fn test_user_activity_end_to_end() {
    let (server, store) = setup().await;
    let body = json!([{
        "user_id": 1,
        "username": "alice",
        "last_login": null,
        "login_count": 5,
        "files_uploaded": 2,
        "models_created": 1,
        "is_active": true
    }]);
    mount_json(&server, "/api/v1/admin/users/activity", body).await;

    store.fetch_user_activity().await;

    let activity = store.user_activity();
    assert_eq!(
        activity.data,
        Some(vec![UserActivity {
            user_id: 1,
            username: "alice".into(),
            last_login: None,
            login_count: 5,
            files_uploaded: 2,
            models_created: 1,
            is_active: true,
        }])
    );
    assert!(!activity.loading);
    assert_eq!(activity.error, None);
    assert!(activity.last_updated.is_some());
}

#[tokio::test]
async fn test_loading_visible_while_request_in_flight() {
    let (server, store) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/admin/stats"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(stats_json())
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;

    let mut updates = store.subscribe_system_stats();
    let task = tokio::spawn({
        let store = store.clone();
        async move { store.fetch_system_stats().await }
    });

    let loading = updates.changed().await.unwrap();
    assert!(loading.loading);
    assert_eq!(loading.data, None);
    assert_eq!(loading.error, None);

    task.await.unwrap();
    let done = store.system_stats();
    assert!(!done.loading);
    assert_eq!(done.data.unwrap().users.total, 42);
}

#[tokio::test]
async fn test_failure_keeps_stale_data() {
    let (server, store) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/admin/system/metrics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(metrics_json()))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/admin/system/metrics"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"detail": "db down"})))
        .mount(&server)
        .await;

    store.fetch_system_metrics().await;
    let first = store.system_metrics();
    assert!(first.data.is_some());

    store.fetch_system_metrics().await;
    let second = store.system_metrics();
    assert_eq!(second.data, first.data);
    assert!(!second.loading);
    assert!(second.error.unwrap().contains("db down"));
    assert_eq!(second.last_updated, first.last_updated);
}

#[tokio::test]
async fn test_unauthorized_recorded_on_envelope() {
    let (server, store) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/admin/security"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    store.fetch_security_overview().await;

    let security = store.security_overview();
    assert_eq!(security.data, None);
    assert!(security.error.is_some());
    assert!(store.client().credentials().token().is_none());
}

// ── Composites ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_overview_composite_isolates_failures() {
    let (server, store) = setup().await;
    mount_json(&server, "/api/v1/admin/stats", stats_json()).await;
    mount_json(&server, "/api/v1/admin/system/metrics", metrics_json()).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/admin/users/activity"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "boom"})))
        .mount(&server)
        .await;

    store.fetch_overview_data().await;

    let stats = store.system_stats();
    assert!(stats.data.is_some());
    assert_eq!(stats.error, None);

    let metrics = store.system_metrics();
    assert!(metrics.data.is_some());
    assert_eq!(metrics.error, None);

    let activity = store.user_activity();
    assert_eq!(activity.data, None);
    assert!(activity.error.unwrap().contains("boom"));

    assert!(!store.is_refreshing());
}

#[tokio::test]
async fn test_refreshing_flag_set_during_composite() {
    let (server, store) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/admin/system/health"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "healthy", "checks": {}}))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;
    mount_json(&server, "/api/v1/admin/system/metrics", metrics_json()).await;

    let mut refreshing = store.subscribe_refreshing();
    let task = tokio::spawn({
        let store = store.clone();
        async move { store.fetch_health_data().await }
    });

    assert_eq!(refreshing.changed().await, Some(1));
    task.await.unwrap();
    assert!(!store.is_refreshing());
    assert_eq!(
        store.system_health().data.unwrap().status,
        finboard_core::HealthStatus::Healthy
    );
}

#[tokio::test]
async fn test_system_composite_fetches_maintenance() {
    let (server, store) = setup().await;
    mount_json(&server, "/api/v1/admin/stats", stats_json()).await;
    mount_json(&server, "/api/v1/admin/system/metrics", metrics_json()).await;
    mount_json(
        &server,
        "/api/v1/admin/maintenance",
        json!({"maintenance_mode": false, "pending_tasks": ["purge_logs"]}),
    )
    .await;

    store.fetch_system_data().await;

    let maintenance = store.maintenance_status().data.unwrap();
    assert_eq!(maintenance.pending_tasks.len(), 1);
    assert!(store.system_stats().data.is_some());
}

// ── Paginated slices ────────────────────────────────────────────────

#[tokio::test]
async fn test_logs_envelope_shape() {
    let (server, store) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/admin/logs"))
        .and(query_param("envelope", "true"))
        .and(query_param("limit", "100"))
        .and(query_param("skip", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [log_json(1), log_json(2)],
            "pagination": {"total": 250, "skip": 0, "limit": 100}
        })))
        .mount(&server)
        .await;

    store.fetch_logs().await;

    let logs = store.logs();
    assert_eq!(logs.items.len(), 2);
    assert_eq!(logs.resource.data.as_ref().map(Vec::len), Some(2));
    assert_eq!(logs.total, 250);
    assert!(logs.has_next_page());
    assert!(!logs.resource.loading);
}

#[tokio::test]
async fn test_logs_legacy_shape() {
    let (server, store) = setup().await;
    mount_json(
        &server,
        "/api/v1/admin/logs",
        json!({"logs": [log_json(7)], "total": 31, "skip": 30}),
    )
    .await;

    store.fetch_logs().await;

    let logs = store.logs();
    assert_eq!(logs.items.len(), 1);
    assert_eq!(logs.total, 31);
    assert_eq!(logs.skip, 30);
}

#[tokio::test]
async fn test_audit_bare_array_keeps_prior_total() {
    let (server, store) = setup().await;
    let entry = json!({
        "id": 3,
        "timestamp": "2024-06-15T10:30:00Z",
        "action": "login",
        "username": "alice"
    });
    Mock::given(method("GET"))
        .and(path("/api/v1/admin/audit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [entry.clone()],
            "pagination": {"total": 12}
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/admin/audit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([entry.clone(), entry])))
        .mount(&server)
        .await;
    mount_json(&server, "/api/v1/admin/security", json!({"failed_logins_24h": 3})).await;

    store.fetch_audit().await;
    assert_eq!(store.audit().total, 12);

    store.fetch_audit_data().await;
    let audit = store.audit();
    assert_eq!(audit.items.len(), 2);
    assert_eq!(audit.resource.data.as_ref().map(Vec::len), Some(2));
    assert_eq!(audit.total, 12);
    assert_eq!(store.security_overview().data.unwrap().failed_logins_24h, 3);
}

#[tokio::test]
async fn test_unknown_page_shape_is_error() {
    let (server, store) = setup().await;
    mount_json(&server, "/api/v1/admin/logs", json!({"rows": []})).await;

    store.fetch_logs().await;

    let logs = store.logs();
    assert!(logs.resource.error.is_some());
    assert!(logs.items.is_empty());
}

#[tokio::test]
async fn test_filter_update_makes_no_request() {
    let (server, store) = setup().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let before = store.logs();
    store.update_log_filters(|f| {
        f.level = Some(LogLevel::Error);
        f.search = Some("upload".into());
    });
    store.update_audit_filters(|f| f.action = Some("delete".into()));

    let after = store.logs();
    assert_eq!(after.resource, before.resource);
    assert_eq!(after.items, before.items);
    assert_eq!(after.filters.level, Some(LogLevel::Error));
    assert_eq!(store.audit().filters.action.as_deref(), Some("delete"));
    assert_eq!(store.audit().resource, Resource::new());
}

#[tokio::test]
async fn test_filters_flow_into_next_fetch() {
    let (server, store) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/admin/logs"))
        .and(query_param("level", "ERROR"))
        .and(query_param("search", "upload"))
        .and(query_param("skip", "100"))
        .and(query_param("limit", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([log_json(5)])))
        .expect(1)
        .mount(&server)
        .await;

    store.update_log_filters(|f| {
        f.level = Some(LogLevel::Error);
        f.search = Some("upload".into());
    });
    store.set_logs_page(100, 100);
    store.fetch_logs().await;

    assert_eq!(store.logs().items.len(), 1);
    assert_eq!(store.logs().resource.error, None);
}
