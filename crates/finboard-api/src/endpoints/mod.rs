// Endpoint wrappers, one file per resource domain. Each method performs a
// single HTTP call through `AdminClient` and returns the typed body.

mod audit;
mod auth;
mod logs;
mod maintenance;
mod reports;
mod security;
mod system;
mod users;
