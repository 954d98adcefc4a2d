#![allow(clippy::unwrap_used)]
// Integration tests for `AdminClient` using wiremock.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use finboard_api::{
    AdminClient, AuditQuery, CredentialStore, Error, FileCredentials, LogLevel, LogQuery,
    MaintenanceTask, MemoryCredentials,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup_with(creds: Arc<dyn CredentialStore>) -> (MockServer, AdminClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = AdminClient::with_client(reqwest::Client::new(), base_url, creds);
    (server, client)
}

async fn setup() -> (MockServer, AdminClient, Arc<MemoryCredentials>) {
    let creds = Arc::new(MemoryCredentials::with_token(SecretString::from("tok-123")));
    let (server, client) = setup_with(creds.clone()).await;
    (server, client, creds)
}

fn log_json(id: i64, msg: &str) -> serde_json::Value {
    json!({
        "id": id,
        "timestamp": "2024-06-15T10:30:00Z",
        "level": "ERROR",
        "message": msg,
        "module": "uploads"
    })
}

// ── HTTP client behaviour ───────────────────────────────────────────

#[tokio::test]
async fn test_bearer_token_attached() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/admin/system/metrics"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cpu_usage": 12.5,
            "memory_usage": null,
            "disk_usage": 70.0,
            "active_connections": 4,
            "request_count_24h": 1200,
            "error_rate_24h": 0.02,
            "avg_response_time": 85.0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let metrics = client.system_metrics().await.unwrap();
    assert_eq!(metrics.cpu_usage, Some(12.5));
    assert_eq!(metrics.memory_usage, None);
    assert_eq!(metrics.active_connections, 4);
}

#[tokio::test]
async fn test_no_token_sends_no_authorization_header() {
    let (server, client) = setup_with(Arc::new(MemoryCredentials::new())).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/admin/stats"))
        .respond_with(|req: &Request| {
            if req.headers.contains_key("authorization") {
                ResponseTemplate::new(400)
            } else {
                ResponseTemplate::new(200).set_body_json(json!({ "users": { "total": 3 } }))
            }
        })
        .mount(&server)
        .await;

    let stats = client.system_stats().await.unwrap();
    assert_eq!(stats.users.total, 3);
}

#[tokio::test]
async fn test_unauthorized_clears_credentials() {
    let (server, client, creds) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "detail": "expired" })))
        .mount(&server)
        .await;

    let result = client.system_stats().await;
    assert!(matches!(result, Err(Error::Unauthorized)), "got: {result:?}");
    assert!(creds.token().is_none());
}

#[tokio::test]
async fn test_unauthorized_removes_session_file() {
    let dir = tempfile::tempdir().unwrap();
    let creds = Arc::new(FileCredentials::new(dir.path().join("session.json")));
    creds
        .store(&finboard_api::Session::new(SecretString::from("old"), None))
        .unwrap();
    let (server, client) = setup_with(creds.clone()).await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    assert!(client.security_overview().await.is_err());
    assert!(!creds.path().exists());
}

#[tokio::test]
async fn test_api_error_uses_detail() {
    let (server, client, creds) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/admin/stats"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "detail": "Admin only" })))
        .mount(&server)
        .await;

    match client.system_stats().await {
        Err(Error::Api { status, message }) => {
            assert_eq!(status, 403);
            assert_eq!(message, "Admin only");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
    // Only 401 clears the session.
    assert!(creds.token().is_some());
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/admin/users/activity"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client.user_activity(None).await;
    assert!(matches!(result, Err(Error::Deserialization { .. })), "got: {result:?}");
}

// ── User activity ───────────────────────────────────────────────────

#[tokio::test]
async fn test_user_activity_with_limit() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/admin/users/activity"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "user_id": 1,
            "username": "alice",
            "last_login": null,
            "login_count": 5,
            "files_uploaded": 2,
            "models_created": 1,
            "is_active": true
        }])))
        .mount(&server)
        .await;

    let activity = client.user_activity(Some(10)).await.unwrap();
    assert_eq!(activity.len(), 1);
    assert_eq!(activity[0].username, "alice");
    assert_eq!(activity[0].last_login, None);
    assert_eq!(activity[0].login_count, 5);
}

// ── Paginated endpoints ─────────────────────────────────────────────

#[tokio::test]
async fn test_logs_maps_time_range_and_envelope_flag() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/admin/logs"))
        .and(query_param("limit", "25"))
        .and(query_param("skip", "50"))
        .and(query_param("level", "ERROR"))
        .and(query_param("search", "upload"))
        .and(query_param("from_ts", "2024-06-01T00:00:00Z"))
        .and(query_param("to_ts", "2024-06-02T00:00:00Z"))
        .and(query_param("envelope", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [log_json(1, "upload failed")],
            "pagination": { "total": 51, "skip": 50, "limit": 25 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = LogQuery {
        limit: Some(25),
        skip: Some(50),
        level: Some(LogLevel::Error),
        search: Some("upload".into()),
        from: Some("2024-06-01T00:00:00Z".parse().unwrap()),
        to: Some("2024-06-02T00:00:00Z".parse().unwrap()),
    };
    let page = client.logs(&query, true).await.unwrap();

    assert_eq!(page.len(), 1);
    assert_eq!(page.items[0].message, "upload failed");
    assert_eq!(page.items[0].level, LogLevel::Error);
    assert_eq!(page.total, Some(51));
    assert_eq!(page.skip, Some(50));
}

#[tokio::test]
async fn test_logs_legacy_shape() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/admin/logs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "logs": [log_json(1, "a"), log_json(2, "b")],
            "total": 2,
            "skip": 0
        })))
        .mount(&server)
        .await;

    let page = client.logs(&LogQuery::default(), true).await.unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page.total, Some(2));
    assert_eq!(page.skip, Some(0));
}

#[tokio::test]
async fn test_audit_bare_array() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/admin/audit"))
        .and(query_param("envelope", "false"))
        .and(query_param("user_id", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 99,
            "timestamp": "2024-06-15T10:30:00Z",
            "user_id": 7,
            "action": "model.delete"
        }])))
        .mount(&server)
        .await;

    let query = AuditQuery {
        user_id: Some(7),
        ..AuditQuery::default()
    };
    let page = client.audit(&query, false).await.unwrap();
    assert_eq!(page.items[0].action, "model.delete");
    assert!(page.items[0].success);
    assert_eq!(page.total, None);
}

#[tokio::test]
async fn test_unknown_page_shape_is_an_error() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/admin/audit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "rows": [] })))
        .mount(&server)
        .await;

    let result = client.audit(&AuditQuery::default(), true).await;
    assert!(matches!(result, Err(Error::Deserialization { .. })), "got: {result:?}");
}

// ── Session endpoints ───────────────────────────────────────────────

#[tokio::test]
async fn test_login_persists_session() {
    let creds = Arc::new(MemoryCredentials::new());
    let (server, client) = setup_with(creds.clone()).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .and(body_json(json!({ "username": "admin", "password": "hunter2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh-token",
            "token_type": "bearer",
            "user": { "username": "admin" }
        })))
        .mount(&server)
        .await;

    let session = client
        .login("admin", &SecretString::from("hunter2"))
        .await
        .unwrap();
    assert_eq!(session.username.as_deref(), Some("admin"));
    assert_eq!(creds.token().unwrap().expose_secret(), "fresh-token");
}

#[tokio::test]
async fn test_login_rejected() {
    let (server, client) = setup_with(Arc::new(MemoryCredentials::new())).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.login("admin", &SecretString::from("nope")).await;
    assert!(matches!(result, Err(Error::Authentication { .. })), "got: {result:?}");
}

#[tokio::test]
async fn test_logout_clears_even_on_server_error() {
    let (server, client, creds) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert!(client.logout().await.is_err());
    assert!(creds.token().is_none());
}

// ── Maintenance / security ──────────────────────────────────────────

#[tokio::test]
async fn test_run_maintenance() {
    let (server, client, _) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/admin/maintenance/run"))
        .and(body_json(json!({ "task": "purge_logs" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "task": "purge_logs",
            "success": true,
            "affected": 1500
        })))
        .mount(&server)
        .await;

    let result = client.run_maintenance(MaintenanceTask::PurgeLogs).await.unwrap();
    assert!(result.success);
    assert_eq!(result.affected, Some(1500));
}

#[tokio::test]
async fn test_revoke_session_accepts_empty_body() {
    let (server, client, _) = setup().await;
    let id = uuid::Uuid::new_v4();

    Mock::given(method("DELETE"))
        .and(path(format!("/api/v1/admin/security/sessions/{id}")))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    client.revoke_session(id).await.unwrap();
}
