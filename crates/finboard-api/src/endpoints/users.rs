use tracing::debug;

use crate::client::AdminClient;
use crate::error::Error;
use crate::types::UserActivity;

impl AdminClient {
    /// Per-user activity records, most recently active first.
    ///
    /// `GET /api/v1/admin/users/activity?limit=N`
    pub async fn user_activity(&self, limit: Option<u32>) -> Result<Vec<UserActivity>, Error> {
        debug!(?limit, "fetching user activity");
        match limit {
            Some(limit) => {
                self.get_with_query("/api/v1/admin/users/activity", &[("limit", limit)])
                    .await
            }
            None => self.get("/api/v1/admin/users/activity").await,
        }
    }
}
