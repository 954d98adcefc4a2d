// ── Core error types ──
//
// User-facing errors from finboard-core. Consumers never match on HTTP
// status codes or JSON failures directly; the `From<finboard_api::Error>`
// impl translates transport-layer errors into these variants.
//
// Store fetch actions never return these: fetch failures end up as strings
// on the resource envelope. `CoreError` covers construction and one-off
// operations (login, maintenance runs, reports).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Request timed out")]
    Timeout,

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    #[error("Not found: {message}")]
    NotFound { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<finboard_api::Error> for CoreError {
    fn from(err: finboard_api::Error) -> Self {
        use finboard_api::Error as Api;

        match err {
            Api::Unauthorized => CoreError::AuthenticationFailed {
                message: "session expired or revoked -- log in again".into(),
            },
            Api::Authentication { message } => CoreError::AuthenticationFailed { message },
            Api::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            Api::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            Api::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            Api::Api { status: 404, message } => CoreError::NotFound { message },
            Api::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            Api::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
            Api::Session(msg) => CoreError::Config {
                message: format!("session store: {msg}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_maps_to_auth_failure() {
        let err = CoreError::from(finboard_api::Error::Unauthorized);
        assert!(matches!(err, CoreError::AuthenticationFailed { .. }));
    }

    #[test]
    fn not_found_status_is_distinguished() {
        let err = CoreError::from(finboard_api::Error::Api {
            status: 404,
            message: "no such report".into(),
        });
        assert!(matches!(err, CoreError::NotFound { .. }));

        let err = CoreError::from(finboard_api::Error::Api {
            status: 500,
            message: "boom".into(),
        });
        assert!(matches!(err, CoreError::Api { status: Some(500), .. }));
    }
}
