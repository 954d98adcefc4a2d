// ── Admin store ──
//
// Resource cells grouped into slices, plus the fetch actions that feed them.

mod admin_store;
mod audit;
mod logs;
mod paginated;

pub use admin_store::{AdminStore, StoreSettings};
pub use audit::AuditFilters;
pub use logs::LogFilters;
pub use paginated::Paginated;
