// finboard-api: Async Rust client for the finboard admin REST API

pub mod client;
pub mod credentials;
pub mod endpoints;
pub mod error;
pub mod page;
pub mod transport;
pub mod types;

pub use client::AdminClient;
pub use credentials::{CredentialStore, FileCredentials, MemoryCredentials, Session};
pub use error::Error;
pub use page::{Page, Pagination};
pub use transport::{TlsMode, TransportConfig};
pub use types::*;
