use thiserror::Error;

/// Top-level error type for the `finboard-api` crate.
///
/// Covers every failure mode of the admin REST surface: authentication,
/// transport, backend rejections, and response decoding.
/// `finboard-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The backend answered 401. Persisted credentials have already been
    /// cleared by the time the caller sees this.
    #[error("Not authenticated -- stored session was cleared")]
    Unauthorized,

    /// Login was rejected (wrong credentials, locked account, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Backend ─────────────────────────────────────────────────────
    /// Non-success status returned by the backend.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Local session ───────────────────────────────────────────────
    /// Reading or writing the persisted session failed.
    #[error("Session store error: {0}")]
    Session(String),
}
