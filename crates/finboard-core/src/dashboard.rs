// ── Dashboard: refresh orchestration ──
//
// Owns the store, the active tab, and the optional auto-refresh task.
// Cloning a `Dashboard` shares the same inner state.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use finboard_api::{
    AdminClient, CredentialStore, FileCredentials, MaintenanceResult, MaintenanceTask,
    MemoryCredentials, Report, ReportRequest, Session, TlsMode, TransportConfig,
};
use secrecy::SecretString;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{AuthSource, DashboardConfig, TlsVerification};
use crate::error::CoreError;
use crate::store::AdminStore;
use crate::stream::ResourceStream;
use crate::tab::Tab;

/// The refresh orchestrator.
#[derive(Clone)]
pub struct Dashboard {
    inner: Arc<DashboardInner>,
}

struct DashboardInner {
    config: DashboardConfig,
    store: Arc<AdminStore>,
    active_tab: watch::Sender<Tab>,
    auto_refresh: watch::Sender<bool>,
    task: Mutex<Option<RefreshTask>>,
}

struct RefreshTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl Dashboard {
    /// Build the HTTP client and store from configuration. No requests are
    /// made until a refresh is triggered.
    pub fn new(config: DashboardConfig) -> Result<Self, CoreError> {
        let credentials = build_credentials(&config.auth);
        let transport = build_transport(&config);
        let client = AdminClient::new(config.url.clone(), credentials, &transport)?;
        let store = Arc::new(AdminStore::new(Arc::new(client), config.store));
        Ok(Self::with_store(config, store))
    }

    /// Wrap an existing store (tests, custom clients).
    pub fn with_store(config: DashboardConfig, store: Arc<AdminStore>) -> Self {
        let (active_tab, _) = watch::channel(config.default_tab);
        let (auto_refresh, _) = watch::channel(false);
        Self {
            inner: Arc::new(DashboardInner {
                config,
                store,
                active_tab,
                auto_refresh,
                task: Mutex::new(None),
            }),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &Arc<AdminStore> {
        &self.inner.store
    }

    // ── Tabs ─────────────────────────────────────────────────────────

    pub fn active_tab(&self) -> Tab {
        *self.inner.active_tab.borrow()
    }

    /// Select a tab by name. Unrecognized names select the overview.
    /// No fetch is triggered.
    pub fn set_active_tab(&self, name: &str) -> Tab {
        let tab = Tab::from_name(name);
        self.inner.active_tab.send_replace(tab);
        debug!(%tab, "active tab changed");
        tab
    }

    pub fn subscribe_active_tab(&self) -> ResourceStream<Tab> {
        ResourceStream::new(self.inner.active_tab.subscribe())
    }

    // ── Refresh ──────────────────────────────────────────────────────

    /// Run the composite fetch for the active tab.
    pub async fn refresh_all(&self) {
        let tab = self.active_tab();
        debug!(%tab, "refreshing");
        self.refresh_tab(tab).await;
    }

    /// Run the composite fetch for a specific tab.
    pub async fn refresh_tab(&self, tab: Tab) {
        let store = &self.inner.store;
        match tab {
            Tab::Overview => store.fetch_overview_data().await,
            Tab::System => store.fetch_system_data().await,
            Tab::Logs => store.fetch_logs_data().await,
            Tab::Audit => store.fetch_audit_data().await,
            Tab::Health => store.fetch_health_data().await,
        }
    }

    pub fn auto_refresh(&self) -> bool {
        *self.inner.auto_refresh.borrow()
    }

    pub fn subscribe_auto_refresh(&self) -> ResourceStream<bool> {
        ResourceStream::new(self.inner.auto_refresh.subscribe())
    }

    /// Enable or disable periodic `refresh_all()` at the configured
    /// interval. Must be called from within a Tokio runtime.
    pub fn set_auto_refresh(&self, enabled: bool) {
        let mut slot = self
            .inner
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(task) = slot.take() {
            task.cancel.cancel();
        }

        let interval = self.inner.config.refresh_interval;
        if enabled && interval.is_zero() {
            warn!("auto-refresh requested with a zero interval, ignoring");
            self.inner.auto_refresh.send_replace(false);
            return;
        }

        if enabled {
            let cancel = CancellationToken::new();
            let handle = tokio::spawn(refresh_task(self.clone(), interval, cancel.clone()));
            *slot = Some(RefreshTask { cancel, handle });
            info!(interval = ?interval, "auto-refresh enabled");
        } else {
            debug!("auto-refresh disabled");
        }
        self.inner.auto_refresh.send_replace(enabled);
    }

    /// Stop the auto-refresh task and wait for it to finish.
    pub async fn shutdown(&self) {
        let task = self
            .inner
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = task {
            task.cancel.cancel();
            join_refresh_task(task.handle).await;
        }
        self.inner.auto_refresh.send_replace(false);
        debug!("dashboard shut down");
    }

    // ── One-off operations ───────────────────────────────────────────

    /// Log in and persist the session through the configured credential
    /// store.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<Session, CoreError> {
        Ok(self.inner.store.client().login(username, password).await?)
    }

    /// End the session. Local credentials are cleared regardless.
    pub async fn logout(&self) -> Result<(), CoreError> {
        Ok(self.inner.store.client().logout().await?)
    }

    /// Run a maintenance task, then refresh the maintenance status.
    pub async fn run_maintenance(&self, task: MaintenanceTask) -> Result<MaintenanceResult, CoreError> {
        let result = self.inner.store.client().run_maintenance(task).await?;
        self.inner.store.fetch_maintenance_status().await;
        Ok(result)
    }

    /// Terminate a user session, then refresh the security overview.
    pub async fn revoke_session(&self, id: Uuid) -> Result<(), CoreError> {
        self.inner.store.client().revoke_session(id).await?;
        self.inner.store.fetch_security_overview().await;
        Ok(())
    }

    pub async fn list_reports(&self) -> Result<Vec<Report>, CoreError> {
        Ok(self.inner.store.client().list_reports().await?)
    }

    pub async fn generate_report(&self, request: &ReportRequest) -> Result<Report, CoreError> {
        Ok(self.inner.store.client().generate_report(request).await?)
    }
}

// ── Background task ──────────────────────────────────────────────────

/// Wait for the refresh task; `false` if it panicked or was aborted.
async fn join_refresh_task(handle: JoinHandle<()>) -> bool {
    match handle.await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, panicked = e.is_panic(), "auto-refresh task ended abnormally");
            false
        }
    }
}

async fn refresh_task(dashboard: Dashboard, interval: Duration, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    ticker.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => dashboard.refresh_all().await,
        }
    }
    debug!("auto-refresh task stopped");
}

// ── Helpers ──────────────────────────────────────────────────────────

fn build_credentials(auth: &AuthSource) -> Arc<dyn CredentialStore> {
    match auth {
        AuthSource::Token(token) => Arc::new(MemoryCredentials::with_token(token.clone())),
        AuthSource::SessionFile(path) => Arc::new(FileCredentials::new(path.clone())),
        AuthSource::Anonymous => Arc::new(MemoryCredentials::new()),
    }
}

fn build_transport(config: &DashboardConfig) -> TransportConfig {
    TransportConfig {
        tls: match &config.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        },
        timeout: config.timeout,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dashboard(interval: Duration) -> Dashboard {
        let mut config = DashboardConfig::new(
            "http://127.0.0.1:9".parse().unwrap(),
            AuthSource::Anonymous,
        );
        config.refresh_interval = interval;
        Dashboard::new(config).unwrap()
    }

    #[test]
    fn unknown_tab_name_selects_overview() {
        let dash = dashboard(Duration::from_secs(30));
        assert_eq!(dash.set_active_tab("logs"), Tab::Logs);
        assert_eq!(dash.active_tab(), Tab::Logs);
        assert_eq!(dash.set_active_tab("billing"), Tab::Overview);
        assert_eq!(dash.active_tab(), Tab::Overview);
    }

    #[tokio::test]
    async fn zero_interval_keeps_auto_refresh_off() {
        let dash = dashboard(Duration::ZERO);
        dash.set_auto_refresh(true);
        assert!(!dash.auto_refresh());
    }

    #[tokio::test]
    async fn shutdown_stops_auto_refresh() {
        let dash = dashboard(Duration::from_secs(60));
        dash.set_auto_refresh(true);
        assert!(dash.auto_refresh());
        dash.shutdown().await;
        assert!(!dash.auto_refresh());
    }

    #[tokio::test]
    async fn panicked_refresh_task_is_reported_not_propagated() {
        let crashed = tokio::spawn(async { panic!("refresh blew up") });
        assert!(!join_refresh_task(crashed).await);

        let clean = tokio::spawn(async {});
        assert!(join_refresh_task(clean).await);
    }
}
