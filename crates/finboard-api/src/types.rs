// Admin API request and response types
//
// Field sets follow the backend's JSON. Counters default to zero and
// optional gauges stay `None` so older backend versions still decode.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── Authentication ───────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub user: Option<LoginUser>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginUser {
    pub username: String,
}

// ── System stats ─────────────────────────────────────────────────────

/// Aggregate counters shown on the overview tab.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemStats {
    #[serde(default)]
    pub users: UserStats,
    #[serde(default)]
    pub files: FileStats,
    #[serde(default)]
    pub financial_data: FinancialDataStats,
    #[serde(default)]
    pub system: SystemInfo,
    #[serde(default)]
    pub performance: PerformanceStats,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub active: u64,
    #[serde(default)]
    pub verified: u64,
    #[serde(default, alias = "new_last_24h")]
    pub new_24h: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStats {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub completed: u64,
    #[serde(default)]
    pub processing: u64,
    #[serde(default)]
    pub failed: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialDataStats {
    #[serde(default)]
    pub statements: u64,
    #[serde(default)]
    pub line_items: u64,
    #[serde(default)]
    pub models: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(default)]
    pub uptime_seconds: Option<u64>,
    #[serde(default)]
    pub database_status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceStats {
    #[serde(default)]
    pub avg_processing_time_seconds: Option<f64>,
    #[serde(default)]
    pub avg_response_time_ms: Option<f64>,
}

// ── User activity ────────────────────────────────────────────────────

/// Per-user activity record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserActivity {
    pub user_id: i64,
    pub username: String,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default)]
    pub login_count: u64,
    #[serde(default)]
    pub files_uploaded: u64,
    #[serde(default)]
    pub models_created: u64,
    #[serde(default)]
    pub is_active: bool,
}

// ── System metrics & health ──────────────────────────────────────────

/// Point-in-time resource gauges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemMetrics {
    #[serde(default)]
    pub cpu_usage: Option<f64>,
    #[serde(default)]
    pub memory_usage: Option<f64>,
    #[serde(default)]
    pub disk_usage: Option<f64>,
    #[serde(default)]
    pub active_connections: u64,
    #[serde(default)]
    pub request_count_24h: u64,
    #[serde(default)]
    pub error_rate_24h: f64,
    #[serde(default)]
    pub avg_response_time: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
    #[default]
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Healthy => "healthy",
            Self::Degraded => "degraded",
            Self::Unhealthy => "unhealthy",
            Self::Unknown => "unknown",
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentHealth {
    #[serde(default)]
    pub status: HealthStatus,
    #[serde(default)]
    pub latency_ms: Option<f64>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Overall backend health with per-component checks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemHealth {
    #[serde(default)]
    pub status: HealthStatus,
    #[serde(default)]
    pub checks: BTreeMap<String, ComponentHealth>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

// ── Logs ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    #[serde(alias = "debug")]
    Debug,
    #[serde(alias = "info")]
    Info,
    #[serde(alias = "warning", alias = "WARN", alias = "warn")]
    Warning,
    #[serde(alias = "error")]
    Error,
    #[serde(alias = "critical")]
    Critical,
    /// Any level name the backend emits that is not listed above.
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
            Self::Unknown => "UNKNOWN",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(default)]
    pub id: Option<i64>,
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    #[serde(default, alias = "logger")]
    pub module: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

/// Query parameters for the logs endpoint.
///
/// `from` / `to` go over the wire as `from_ts` / `to_ts`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LogQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<LogLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(rename = "from_ts", skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,
    #[serde(rename = "to_ts", skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
}

// ── Audit ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    pub action: String,
    #[serde(default)]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub resource_id: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

fn default_true() -> bool {
    true
}

/// Query parameters for the audit endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuditQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(rename = "from_ts", skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,
    #[serde(rename = "to_ts", skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
}

// ── Security ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecurityOverview {
    #[serde(default)]
    pub failed_logins_24h: u64,
    #[serde(default)]
    pub locked_accounts: u64,
    #[serde(default)]
    pub active_sessions: Vec<ActiveSession>,
    #[serde(default)]
    pub suspicious_ips: Vec<SuspiciousIp>,
    #[serde(default)]
    pub recent_events: Vec<SecurityEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSession {
    pub id: Uuid,
    pub user_id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_seen: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuspiciousIp {
    pub ip_address: String,
    #[serde(default)]
    pub failed_attempts: u64,
    #[serde(default)]
    pub last_attempt: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityEvent {
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
}

// ── Maintenance ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceTask {
    CleanupFiles,
    PurgeLogs,
    VacuumDatabase,
    ClearCache,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceStatus {
    #[serde(default)]
    pub maintenance_mode: bool,
    #[serde(default)]
    pub last_cleanup: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pending_tasks: Vec<MaintenanceTask>,
    #[serde(default)]
    pub database_size_mb: Option<f64>,
    #[serde(default)]
    pub storage_used_mb: Option<f64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct MaintenanceRun {
    pub task: MaintenanceTask,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceResult {
    pub task: MaintenanceTask,
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub affected: Option<u64>,
}

// ── Reports ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    UserActivity,
    SystemUsage,
    Audit,
    Financial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: Uuid,
    pub kind: ReportKind,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub download_url: Option<String>,
}

/// Body of a report generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRequest {
    pub kind: ReportKind,
    #[serde(rename = "from_ts", skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,
    #[serde(rename = "to_ts", skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
}
