use chrono::{DateTime, Utc};
use finboard_api::Page;
use serde::Serialize;

use crate::resource::{Resource, Trackable};

/// Resource envelope for a paginated list, with page position and filters.
///
/// `resource.data` holds the raw items of the last successful fetch and
/// `items` mirrors it. `total` and `skip` only change when the backend
/// reports them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paginated<T, F> {
    #[serde(flatten)]
    pub resource: Resource<Vec<T>>,
    pub items: Vec<T>,
    pub total: u64,
    pub skip: u64,
    pub limit: u64,
    pub filters: F,
}

impl<T, F: Default> Paginated<T, F> {
    pub fn with_limit(limit: u64) -> Self {
        Self {
            resource: Resource::new(),
            items: Vec::new(),
            total: 0,
            skip: 0,
            limit,
            filters: F::default(),
        }
    }
}

impl<T: Clone, F> Paginated<T, F> {
    /// Merge a fetched page into the state.
    pub fn apply_page(&mut self, page: Page<T>) {
        self.resource.data = Some(page.items.clone());
        self.items = page.items;
        if let Some(total) = page.total {
            self.total = total;
        }
        if let Some(skip) = page.skip {
            self.skip = skip;
        }
    }

    /// `true` when another page exists past the current one.
    pub fn has_next_page(&self) -> bool {
        let shown = u64::try_from(self.items.len()).unwrap_or(u64::MAX);
        self.skip.saturating_add(shown) < self.total
    }
}

impl<T, F> Trackable for Paginated<T, F>
where
    T: Clone + Send + Sync + 'static,
    F: Clone + Send + Sync + 'static,
{
    fn begin(&mut self) {
        self.resource.begin();
    }

    fn succeed(&mut self, at: DateTime<Utc>) {
        self.resource.succeed(at);
    }

    fn fail(&mut self, message: String) {
        self.resource.fail(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    type State = Paginated<u32, ()>;

    #[test]
    fn envelope_page_sets_total_and_skip() {
        let mut state = State::with_limit(10);
        state.apply_page(Page {
            items: vec![1, 2],
            total: Some(12),
            skip: Some(10),
        });
        assert_eq!(state.items, vec![1, 2]);
        assert_eq!(state.resource.data, Some(vec![1, 2]));
        assert_eq!(state.total, 12);
        assert_eq!(state.skip, 10);
        assert!(!state.has_next_page());
    }

    #[test]
    fn bare_page_keeps_previous_total() {
        let mut state = State::with_limit(10);
        state.total = 40;
        state.skip = 20;
        state.apply_page(Page {
            items: vec![9],
            total: None,
            skip: None,
        });
        assert_eq!(state.items, vec![9]);
        assert_eq!(state.total, 40);
        assert_eq!(state.skip, 20);
        assert!(state.has_next_page());
    }
}
