// ── Resource envelope & tracking wrapper ──
//
// Every fetched resource lives in a `Resource<T>` owned by a
// `ResourceCell`. All mutation goes through `watch::Sender` patches, so
// each transition is atomic and pushed to subscribers.

use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::stream::ResourceStream;

/// Message stored when a fetch error renders as an empty string.
pub const FETCH_FAILED: &str = "Failed to fetch data";

/// The `{data, loading, error, last_updated}` envelope around one piece of
/// server-fetched state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl<T> Default for Resource<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            last_updated: None,
        }
    }
}

impl<T> Resource<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` once the resource has loaded successfully at least once.
    pub fn is_loaded(&self) -> bool {
        self.last_updated.is_some()
    }
}

/// State shapes a [`ResourceCell`] can drive through a fetch.
pub trait Trackable: Clone + Send + Sync + 'static {
    /// Enter the loading state. Data stays untouched.
    fn begin(&mut self);

    /// Leave the loading state after a successful fetch.
    fn succeed(&mut self, at: DateTime<Utc>);

    /// Leave the loading state after a failed fetch. Data stays untouched.
    fn fail(&mut self, message: String);
}

impl<T: Clone + Send + Sync + 'static> Trackable for Resource<T> {
    fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn succeed(&mut self, at: DateTime<Utc>) {
        self.loading = false;
        self.error = None;
        // Back-to-back fetches can observe the same clock reading.
        self.last_updated = Some(match self.last_updated {
            Some(prev) if prev >= at => prev + chrono::Duration::nanoseconds(1),
            _ => at,
        });
    }

    fn fail(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }
}

/// Owner of one tracked state value.
///
/// Reads are cheap clones of the current value; writes are single
/// `watch` patches. Each [`track`](Self::track) call takes a new request
/// generation, and a response that settles after a newer call has started
/// is dropped without touching the state.
pub struct ResourceCell<S: Trackable> {
    name: &'static str,
    state: watch::Sender<S>,
    generation: AtomicU64,
}

impl<S: Trackable> ResourceCell<S> {
    pub fn new(name: &'static str, initial: S) -> Self {
        let (state, _) = watch::channel(initial);
        Self {
            name,
            state,
            generation: AtomicU64::new(0),
        }
    }

    /// Resource name used in log output.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Clone of the current state.
    pub fn get(&self) -> S {
        self.state.borrow().clone()
    }

    /// Subscribe to every subsequent patch.
    pub fn subscribe(&self) -> ResourceStream<S> {
        ResourceStream::new(self.state.subscribe())
    }

    /// Apply a synchronous patch (filters, pagination).
    pub fn update(&self, f: impl FnOnce(&mut S)) {
        self.state.send_modify(f);
    }

    /// Drive the state through one fetch.
    ///
    /// 1. Patches the loading state in; existing data stays visible.
    /// 2. Calls `fetch` with a snapshot of the state, so it can read
    ///    filters and pagination.
    /// 3. On success, `apply` merges the value and the success stamp is set.
    /// 4. On failure, the error's message is recorded; data is untouched.
    ///
    /// Never fails: every error ends up in the state.
    pub async fn track<V, E, F, Fut>(&self, fetch: F, apply: impl FnOnce(&mut S, V))
    where
        F: FnOnce(S) -> Fut,
        Fut: Future<Output = Result<V, E>>,
        E: Display,
    {
        let mut generation = 0;
        let mut snapshot = None;
        self.state.send_modify(|state| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            state.begin();
            snapshot = Some(state.clone());
        });
        let Some(snapshot) = snapshot else { return };

        let result = fetch(snapshot).await;

        self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != generation {
                debug!(resource = self.name, generation, "discarding superseded response");
                return false;
            }
            match result {
                Ok(value) => {
                    apply(state, value);
                    state.succeed(Utc::now());
                }
                Err(e) => {
                    let mut message = e.to_string();
                    if message.is_empty() {
                        message = FETCH_FAILED.into();
                    }
                    warn!(resource = self.name, error = %message, "fetch failed");
                    state.fail(message);
                }
            }
            true
        });
    }
}

impl<T: Clone + Send + Sync + 'static> ResourceCell<Resource<T>> {
    /// [`track`](Self::track) for plain resources: the fetched value
    /// replaces `data`.
    pub async fn fetch<E, F, Fut>(&self, fetch: F)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        self.track(|_| fetch(), |state, value| state.data = Some(value))
            .await;
    }
}
