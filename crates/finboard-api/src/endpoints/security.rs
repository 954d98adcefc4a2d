use tracing::debug;
use uuid::Uuid;

use crate::client::AdminClient;
use crate::error::Error;
use crate::types::SecurityOverview;

impl AdminClient {
    /// Failed logins, locked accounts, active sessions, suspicious IPs.
    ///
    /// `GET /api/v1/admin/security`
    pub async fn security_overview(&self) -> Result<SecurityOverview, Error> {
        debug!("fetching security overview");
        self.get("/api/v1/admin/security").await
    }

    /// Terminate an active user session.
    ///
    /// `DELETE /api/v1/admin/security/sessions/{id}`
    pub async fn revoke_session(&self, id: Uuid) -> Result<(), Error> {
        debug!(%id, "revoking session");
        let _: serde_json::Value = self
            .delete(&format!("/api/v1/admin/security/sessions/{id}"))
            .await?;
        Ok(())
    }
}
