use serde::Serialize;
use tracing::debug;

use crate::client::AdminClient;
use crate::error::Error;
use crate::page::Page;
use crate::types::{LogEntry, LogQuery};

#[derive(Serialize)]
struct WithEnvelope<'a, Q> {
    #[serde(flatten)]
    query: &'a Q,
    envelope: bool,
}

impl AdminClient {
    /// Application log entries.
    ///
    /// `GET /api/v1/admin/logs?limit=&skip=&level=&search=&from_ts=&to_ts=&envelope=`
    ///
    /// Whatever shape the backend answers with is normalized into a [`Page`].
    pub async fn logs(&self, query: &LogQuery, envelope: bool) -> Result<Page<LogEntry>, Error> {
        debug!(?query, envelope, "fetching logs");
        self.paged("/api/v1/admin/logs", query, envelope).await
    }

    /// GET a paginated endpoint with the `envelope` flag appended.
    pub(crate) async fn paged<T, Q>(
        &self,
        path: &str,
        query: &Q,
        envelope: bool,
    ) -> Result<Page<T>, Error>
    where
        T: serde::de::DeserializeOwned,
        Q: Serialize + Sync,
    {
        self.get_with_query(path, &WithEnvelope { query, envelope })
            .await
    }
}
