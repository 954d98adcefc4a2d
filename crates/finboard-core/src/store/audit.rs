// ── Audit slice ──

use chrono::{DateTime, Utc};
use finboard_api::{AuditEntry, AuditQuery};
use serde::Serialize;

use super::AdminStore;
use super::paginated::Paginated;
use crate::stream::ResourceStream;

/// Filters applied to the next audit fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditFilters {
    pub user_id: Option<i64>,
    pub action: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl Paginated<AuditEntry, AuditFilters> {
    /// Wire query for the current page and filters.
    pub fn query(&self) -> AuditQuery {
        AuditQuery {
            limit: Some(self.limit),
            skip: Some(self.skip),
            user_id: self.filters.user_id,
            action: self.filters.action.clone().filter(|s| !s.is_empty()),
            from: self.filters.from,
            to: self.filters.to,
        }
    }
}

impl AdminStore {
    pub fn audit(&self) -> Paginated<AuditEntry, AuditFilters> {
        self.audit.get()
    }

    pub fn subscribe_audit(&self) -> ResourceStream<Paginated<AuditEntry, AuditFilters>> {
        self.audit.subscribe()
    }

    /// Patch the audit filters in place. No fetch is triggered.
    pub fn update_audit_filters(&self, patch: impl FnOnce(&mut AuditFilters)) {
        self.audit.update(|state| patch(&mut state.filters));
    }

    /// Move the audit page window. No fetch is triggered.
    pub fn set_audit_page(&self, skip: u64, limit: u64) {
        self.audit.update(|state| {
            state.skip = skip;
            state.limit = limit;
        });
    }

    /// Fetch the current audit page using the stored filters.
    pub async fn fetch_audit(&self) {
        let client = &self.client;
        self.audit
            .track(
                |state| async move { client.audit(&state.query(), true).await },
                Paginated::apply_page,
            )
            .await;
    }

    /// Composite for the audit tab: audit trail plus security overview.
    pub async fn fetch_audit_data(&self) {
        let _batch = self.begin_batch("audit");
        tokio::join!(self.fetch_audit(), self.fetch_security_overview());
    }
}
