use tracing::debug;

use crate::client::AdminClient;
use crate::error::Error;
use crate::types::{Report, ReportRequest};

impl AdminClient {
    /// Previously generated reports.
    ///
    /// `GET /api/v1/admin/reports`
    pub async fn list_reports(&self) -> Result<Vec<Report>, Error> {
        debug!("listing reports");
        self.get("/api/v1/admin/reports").await
    }

    /// Queue a new report.
    ///
    /// `POST /api/v1/admin/reports`
    pub async fn generate_report(&self, request: &ReportRequest) -> Result<Report, Error> {
        debug!(kind = ?request.kind, "generating report");
        self.post("/api/v1/admin/reports", request).await
    }
}
