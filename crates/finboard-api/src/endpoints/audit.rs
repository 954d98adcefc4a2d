use tracing::debug;

use crate::client::AdminClient;
use crate::error::Error;
use crate::page::Page;
use crate::types::{AuditEntry, AuditQuery};

impl AdminClient {
    /// Audit trail entries.
    ///
    /// `GET /api/v1/admin/audit?limit=&skip=&user_id=&action=&from_ts=&to_ts=&envelope=`
    pub async fn audit(&self, query: &AuditQuery, envelope: bool) -> Result<Page<AuditEntry>, Error> {
        debug!(?query, envelope, "fetching audit log");
        self.paged("/api/v1/admin/audit", query, envelope).await
    }
}
