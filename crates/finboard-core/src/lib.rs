//! Reactive resource cache between `finboard-api` and UI consumers (CLI).
//!
//! - **[`Resource<T>`]**: the `{data, loading, error, last_updated}` envelope
//!   every fetched resource lives in.
//!
//! - **[`ResourceCell<S>`]**: owns one envelope behind a `tokio::sync::watch`
//!   channel. [`track()`](ResourceCell::track) drives it through
//!   loading → success/error, keeps stale data visible while revalidating,
//!   and discards responses superseded by a newer request.
//!
//! - **[`AdminStore`]**: explicit (non-global) store grouping the overview,
//!   system, health, logs, audit, and security slices. Composite fetches run
//!   their members concurrently; one failure never blocks its siblings.
//!
//! - **[`Dashboard`]**: refresh orchestrator: active tab, `refresh_all()`
//!   dispatch, and an optional auto-refresh background task.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod resource;
pub mod store;
pub mod stream;
pub mod tab;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{AuthSource, DashboardConfig, TlsVerification};
pub use dashboard::Dashboard;
pub use error::CoreError;
pub use resource::{FETCH_FAILED, Resource, ResourceCell, Trackable};
pub use store::{AdminStore, AuditFilters, LogFilters, Paginated, StoreSettings};
pub use stream::ResourceStream;
pub use tab::Tab;

// Re-export API types consumers render directly.
pub use finboard_api::{
    ActiveSession, AuditEntry, ComponentHealth, HealthStatus, LogEntry, LogLevel,
    MaintenanceResult, MaintenanceStatus, MaintenanceTask, Report, ReportKind, ReportRequest,
    ReportStatus, SecurityOverview, SystemHealth, SystemMetrics, SystemStats, UserActivity,
};
