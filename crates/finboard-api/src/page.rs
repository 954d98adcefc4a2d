// Canonical paginated response
//
// The backend has shipped three shapes for paginated endpoints over time.
// They are all normalized here, at the wire boundary, into a single `Page`.

use serde::{Deserialize, Serialize};

/// Pagination block of the `{items, pagination}` envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default, alias = "offset")]
    pub skip: Option<u64>,
    #[serde(default)]
    pub limit: Option<u64>,
}

/// One page of a paginated resource.
///
/// `total` and `skip` are `None` when the backend did not report them
/// (bare-array responses); callers keep their previous values in that case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "WirePage<T>",
    bound(deserialize = "T: Deserialize<'de>", serialize = "T: Serialize")
)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: Option<u64>,
    pub skip: Option<u64>,
}

impl<T> Page<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Every response shape a paginated endpoint may return.
///
/// Anything else fails to deserialize, which surfaces as an error instead of
/// an empty page.
#[derive(Deserialize)]
#[serde(untagged)]
enum WirePage<T> {
    Envelope {
        items: Vec<T>,
        #[serde(default)]
        pagination: Pagination,
    },
    Legacy {
        logs: Vec<T>,
        #[serde(default)]
        total: Option<u64>,
        #[serde(default)]
        skip: Option<u64>,
    },
    Bare(Vec<T>),
}

impl<T> From<WirePage<T>> for Page<T> {
    fn from(wire: WirePage<T>) -> Self {
        match wire {
            WirePage::Envelope { items, pagination } => Self {
                items,
                total: pagination.total,
                skip: pagination.skip,
            },
            WirePage::Legacy { logs, total, skip } => Self {
                items: logs,
                total,
                skip,
            },
            WirePage::Bare(items) => Self {
                items,
                total: None,
                skip: None,
            },
        }
    }
}
