// System endpoints: aggregate stats, resource metrics, health checks.

use tracing::debug;

use crate::client::AdminClient;
use crate::error::Error;
use crate::types::{SystemHealth, SystemMetrics, SystemStats};

impl AdminClient {
    /// Aggregate user, file, and financial-data counters.
    ///
    /// `GET /api/v1/admin/stats`
    pub async fn system_stats(&self) -> Result<SystemStats, Error> {
        debug!("fetching system stats");
        self.get("/api/v1/admin/stats").await
    }

    /// Point-in-time resource gauges.
    ///
    /// `GET /api/v1/admin/system/metrics`
    pub async fn system_metrics(&self) -> Result<SystemMetrics, Error> {
        debug!("fetching system metrics");
        self.get("/api/v1/admin/system/metrics").await
    }

    /// Overall health with per-component checks.
    ///
    /// `GET /api/v1/admin/system/health`
    pub async fn system_health(&self) -> Result<SystemHealth, Error> {
        debug!("fetching system health");
        self.get("/api/v1/admin/system/health").await
    }
}
