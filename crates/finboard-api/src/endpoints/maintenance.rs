use tracing::debug;

use crate::client::AdminClient;
use crate::error::Error;
use crate::types::{MaintenanceResult, MaintenanceRun, MaintenanceStatus, MaintenanceTask};

impl AdminClient {
    /// Maintenance mode flag, storage usage, and pending tasks.
    ///
    /// `GET /api/v1/admin/maintenance`
    pub async fn maintenance_status(&self) -> Result<MaintenanceStatus, Error> {
        debug!("fetching maintenance status");
        self.get("/api/v1/admin/maintenance").await
    }

    /// Run a maintenance task synchronously on the backend.
    ///
    /// `POST /api/v1/admin/maintenance/run` with `{"task": "..."}`
    pub async fn run_maintenance(&self, task: MaintenanceTask) -> Result<MaintenanceResult, Error> {
        debug!(?task, "running maintenance task");
        self.post("/api/v1/admin/maintenance/run", &MaintenanceRun { task })
            .await
    }
}
