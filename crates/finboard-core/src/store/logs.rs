// ── Logs slice ──

use chrono::{DateTime, Utc};
use finboard_api::{LogEntry, LogLevel, LogQuery};
use serde::Serialize;

use super::AdminStore;
use super::paginated::Paginated;
use crate::stream::ResourceStream;

/// Filters applied to the next logs fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LogFilters {
    pub level: Option<LogLevel>,
    pub search: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl Paginated<LogEntry, LogFilters> {
    /// Wire query for the current page and filters.
    pub fn query(&self) -> LogQuery {
        LogQuery {
            limit: Some(self.limit),
            skip: Some(self.skip),
            level: self.filters.level,
            search: self.filters.search.clone().filter(|s| !s.is_empty()),
            from: self.filters.from,
            to: self.filters.to,
        }
    }
}

impl AdminStore {
    pub fn logs(&self) -> Paginated<LogEntry, LogFilters> {
        self.logs.get()
    }

    pub fn subscribe_logs(&self) -> ResourceStream<Paginated<LogEntry, LogFilters>> {
        self.logs.subscribe()
    }

    /// Patch the log filters in place. No fetch is triggered.
    pub fn update_log_filters(&self, patch: impl FnOnce(&mut LogFilters)) {
        self.logs.update(|state| patch(&mut state.filters));
    }

    /// Move the logs page window. No fetch is triggered.
    pub fn set_logs_page(&self, skip: u64, limit: u64) {
        self.logs.update(|state| {
            state.skip = skip;
            state.limit = limit;
        });
    }

    /// Fetch the current logs page using the stored filters.
    pub async fn fetch_logs(&self) {
        let client = &self.client;
        self.logs
            .track(
                |state| async move { client.logs(&state.query(), true).await },
                Paginated::apply_page,
            )
            .await;
    }

    /// Composite for the logs tab.
    pub async fn fetch_logs_data(&self) {
        let _batch = self.begin_batch("logs");
        self.fetch_logs().await;
    }
}
