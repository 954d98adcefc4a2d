// ── AdminStore ──
//
// One `ResourceCell` per backend resource. Individual fetch actions drive a
// single cell; composite actions join the fetches a tab needs.

use std::sync::Arc;

use finboard_api::{
    AdminClient, AuditEntry, LogEntry, MaintenanceStatus, SecurityOverview, SystemHealth,
    SystemMetrics, SystemStats, UserActivity,
};
use tokio::sync::watch;
use tracing::debug;

use super::audit::AuditFilters;
use super::logs::LogFilters;
use super::paginated::Paginated;
use crate::resource::{Resource, ResourceCell};
use crate::stream::ResourceStream;

/// List sizes used by the store's fetch actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreSettings {
    /// Rows requested by [`AdminStore::fetch_user_activity`].
    pub activity_limit: u32,
    /// Initial page size for the logs slice.
    pub logs_page_size: u64,
    /// Initial page size for the audit slice.
    pub audit_page_size: u64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            activity_limit: 20,
            logs_page_size: 100,
            audit_page_size: 50,
        }
    }
}

/// Explicit store for every admin resource.
///
/// Cheap to share behind an `Arc`; every method takes `&self`.
pub struct AdminStore {
    pub(super) client: Arc<AdminClient>,
    settings: StoreSettings,

    pub(super) system_stats: ResourceCell<Resource<SystemStats>>,
    pub(super) user_activity: ResourceCell<Resource<Vec<UserActivity>>>,
    pub(super) system_metrics: ResourceCell<Resource<SystemMetrics>>,
    pub(super) system_health: ResourceCell<Resource<SystemHealth>>,
    pub(super) security: ResourceCell<Resource<SecurityOverview>>,
    pub(super) maintenance: ResourceCell<Resource<MaintenanceStatus>>,
    pub(super) logs: ResourceCell<Paginated<LogEntry, LogFilters>>,
    pub(super) audit: ResourceCell<Paginated<AuditEntry, AuditFilters>>,

    /// Number of composite fetches in flight.
    refreshing: watch::Sender<usize>,
}

/// Decrements the in-flight composite counter when dropped.
pub(super) struct BatchGuard<'a> {
    counter: &'a watch::Sender<usize>,
    name: &'static str,
}

impl Drop for BatchGuard<'_> {
    fn drop(&mut self) {
        self.counter.send_modify(|n| *n = n.saturating_sub(1));
        debug!(batch = self.name, "composite refresh finished");
    }
}

impl AdminStore {
    pub fn new(client: Arc<AdminClient>, settings: StoreSettings) -> Self {
        let (refreshing, _) = watch::channel(0);
        Self {
            client,
            settings,
            system_stats: ResourceCell::new("system_stats", Resource::new()),
            user_activity: ResourceCell::new("user_activity", Resource::new()),
            system_metrics: ResourceCell::new("system_metrics", Resource::new()),
            system_health: ResourceCell::new("system_health", Resource::new()),
            security: ResourceCell::new("security", Resource::new()),
            maintenance: ResourceCell::new("maintenance", Resource::new()),
            logs: ResourceCell::new("logs", Paginated::with_limit(settings.logs_page_size)),
            audit: ResourceCell::new("audit", Paginated::with_limit(settings.audit_page_size)),
            refreshing,
        }
    }

    pub fn client(&self) -> &Arc<AdminClient> {
        &self.client
    }

    pub fn settings(&self) -> StoreSettings {
        self.settings
    }

    /// `true` while at least one composite fetch is running.
    pub fn is_refreshing(&self) -> bool {
        *self.refreshing.borrow() > 0
    }

    pub fn subscribe_refreshing(&self) -> ResourceStream<usize> {
        ResourceStream::new(self.refreshing.subscribe())
    }

    pub(super) fn begin_batch(&self, name: &'static str) -> BatchGuard<'_> {
        self.refreshing.send_modify(|n| *n += 1);
        debug!(batch = name, "composite refresh started");
        BatchGuard {
            counter: &self.refreshing,
            name,
        }
    }

    // ── Snapshots ────────────────────────────────────────────────────

    pub fn system_stats(&self) -> Resource<SystemStats> {
        self.system_stats.get()
    }

    pub fn user_activity(&self) -> Resource<Vec<UserActivity>> {
        self.user_activity.get()
    }

    pub fn system_metrics(&self) -> Resource<SystemMetrics> {
        self.system_metrics.get()
    }

    pub fn system_health(&self) -> Resource<SystemHealth> {
        self.system_health.get()
    }

    pub fn security_overview(&self) -> Resource<SecurityOverview> {
        self.security.get()
    }

    pub fn maintenance_status(&self) -> Resource<MaintenanceStatus> {
        self.maintenance.get()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_system_stats(&self) -> ResourceStream<Resource<SystemStats>> {
        self.system_stats.subscribe()
    }

    pub fn subscribe_user_activity(&self) -> ResourceStream<Resource<Vec<UserActivity>>> {
        self.user_activity.subscribe()
    }

    pub fn subscribe_system_metrics(&self) -> ResourceStream<Resource<SystemMetrics>> {
        self.system_metrics.subscribe()
    }

    pub fn subscribe_system_health(&self) -> ResourceStream<Resource<SystemHealth>> {
        self.system_health.subscribe()
    }

    pub fn subscribe_security_overview(&self) -> ResourceStream<Resource<SecurityOverview>> {
        self.security.subscribe()
    }

    pub fn subscribe_maintenance_status(&self) -> ResourceStream<Resource<MaintenanceStatus>> {
        self.maintenance.subscribe()
    }

    // ── Individual fetches ───────────────────────────────────────────

    pub async fn fetch_system_stats(&self) {
        self.system_stats
            .fetch(|| self.client.system_stats())
            .await;
    }

    pub async fn fetch_user_activity(&self) {
        let limit = self.settings.activity_limit;
        self.user_activity
            .fetch(|| self.client.user_activity(Some(limit)))
            .await;
    }

    pub async fn fetch_system_metrics(&self) {
        self.system_metrics
            .fetch(|| self.client.system_metrics())
            .await;
    }

    pub async fn fetch_system_health(&self) {
        self.system_health
            .fetch(|| self.client.system_health())
            .await;
    }

    pub async fn fetch_security_overview(&self) {
        self.security
            .fetch(|| self.client.security_overview())
            .await;
    }

    pub async fn fetch_maintenance_status(&self) {
        self.maintenance
            .fetch(|| self.client.maintenance_status())
            .await;
    }

    // ── Composites ───────────────────────────────────────────────────

    /// Stats, user activity, and metrics.
    pub async fn fetch_overview_data(&self) {
        let _batch = self.begin_batch("overview");
        tokio::join!(
            self.fetch_system_stats(),
            self.fetch_user_activity(),
            self.fetch_system_metrics(),
        );
    }

    /// Stats, metrics, and maintenance status.
    pub async fn fetch_system_data(&self) {
        let _batch = self.begin_batch("system");
        tokio::join!(
            self.fetch_system_stats(),
            self.fetch_system_metrics(),
            self.fetch_maintenance_status(),
        );
    }

    /// Health checks and metrics.
    pub async fn fetch_health_data(&self) {
        let _batch = self.begin_batch("health");
        tokio::join!(self.fetch_system_health(), self.fetch_system_metrics());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use finboard_api::{MemoryCredentials, TransportConfig};

    fn store() -> AdminStore {
        let client = AdminClient::new(
            "http://127.0.0.1:9".parse().unwrap(),
            Arc::new(MemoryCredentials::new()),
            &TransportConfig::default(),
        )
        .unwrap();
        AdminStore::new(Arc::new(client), StoreSettings::default())
    }

    #[test]
    fn initial_state_is_empty() {
        let store = store();
        assert_eq!(store.system_stats(), Resource::new());
        assert!(!store.is_refreshing());
        assert_eq!(store.logs().limit, 100);
        assert_eq!(store.audit().limit, 50);
    }

    #[test]
    fn batch_guard_tracks_nesting() {
        let store = store();
        let outer = store.begin_batch("a");
        let inner = store.begin_batch("b");
        assert!(store.is_refreshing());
        drop(inner);
        assert!(store.is_refreshing());
        drop(outer);
        assert!(!store.is_refreshing());
    }

    #[test]
    fn filter_and_page_updates_are_local() {
        let store = store();
        store.update_log_filters(|f| f.search = Some("timeout".into()));
        store.set_logs_page(200, 100);
        let logs = store.logs();
        assert_eq!(logs.filters.search.as_deref(), Some("timeout"));
        assert_eq!(logs.skip, 200);
        assert!(!logs.resource.loading);
        assert_eq!(logs.query().skip, Some(200));
    }
}
