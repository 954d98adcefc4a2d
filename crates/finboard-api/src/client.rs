// Admin API HTTP client
//
// Wraps `reqwest::Client` with base-URL handling, bearer credentials and
// response decoding. Endpoint wrappers live in `endpoints/` as inherent
// methods so this module stays focused on transport mechanics.

use std::sync::Arc;

use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};
use url::Url;

use crate::credentials::CredentialStore;
use crate::error::Error;
use crate::transport::TransportConfig;

/// Error body shapes the backend uses: `{"detail": "..."}` or `{"message": "..."}`.
#[derive(serde::Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
    message: Option<String>,
}

/// HTTP client for the admin REST API.
///
/// Attaches `Authorization: Bearer <token>` whenever the credential store
/// holds a token, and clears that store on every 401 response.
pub struct AdminClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Arc<dyn CredentialStore>,
}

impl AdminClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the backend root (e.g. `https://admin.example.com`);
    /// endpoint paths are appended to it verbatim.
    pub fn new(
        base_url: Url,
        credentials: Arc<dyn CredentialStore>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, credentials))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            http,
            base_url,
            credentials,
        }
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The credential store consulted on every request.
    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Build a full URL: `{base}{path}`. Any path prefix on the base URL
    /// is preserved.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {}", url);
        self.send(self.http.get(url)).await
    }

    /// Send a GET request with query parameters and decode the JSON body.
    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, Error>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = self.url(path)?;
        debug!("GET {}", url);
        self.send(self.http.get(url).query(query)).await
    }

    /// Send a POST request with a JSON body.
    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {}", url);
        self.send(self.http.post(url).json(body)).await
    }

    /// Send a PUT request with a JSON body.
    pub async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PUT {}", url);
        self.send(self.http.put(url).json(body)).await
    }

    /// Send a DELETE request.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("DELETE {}", url);
        self.send(self.http.delete(url)).await
    }

    /// Attach the stored bearer token, if any.
    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.credentials.token() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: reqwest::RequestBuilder) -> Result<T, Error> {
        let resp = self
            .authorize(builder)
            .send()
            .await
            .map_err(Error::Transport)?;
        self.parse(resp).await
    }

    /// Map the status, run the 401 cleanup, and decode the body.
    async fn parse<T: DeserializeOwned>(&self, resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED {
            warn!("backend rejected credentials, clearing stored session");
            self.credentials.clear();
            return Err(Error::Unauthorized);
        }

        let body = resp.text().await.map_err(Error::Transport)?;

        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        trace!(bytes = body.len(), "decoding response");

        // 204 / empty bodies decode as JSON null so `()` works.
        let text = if body.trim().is_empty() { "null" } else { &body };
        serde_json::from_str(text).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }
}

/// Pull a human-readable message out of an error response body.
fn error_message(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        match parsed.detail {
            Some(serde_json::Value::String(s)) => return s,
            Some(other) if !other.is_null() => return other.to_string(),
            _ => {}
        }
        if let Some(msg) = parsed.message {
            return msg;
        }
    }
    let preview: String = body.chars().take(200).collect();
    if preview.is_empty() {
        "empty response body".into()
    } else {
        preview
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::credentials::MemoryCredentials;

    fn client(base: &str) -> AdminClient {
        AdminClient::with_client(
            reqwest::Client::new(),
            Url::parse(base).unwrap(),
            Arc::new(MemoryCredentials::new()),
        )
    }

    #[test]
    fn url_preserves_base_prefix() {
        let c = client("https://example.com/backend/");
        assert_eq!(
            c.url("/api/v1/admin/stats").unwrap().as_str(),
            "https://example.com/backend/api/v1/admin/stats"
        );
    }

    #[test]
    fn error_message_prefers_detail() {
        assert_eq!(error_message(r#"{"detail":"Not allowed"}"#), "Not allowed");
        assert_eq!(error_message(r#"{"message":"boom"}"#), "boom");
        assert_eq!(error_message("plain text"), "plain text");
        assert_eq!(error_message(""), "empty response body");
    }

    #[test]
    fn structured_detail_is_rendered_as_json() {
        let msg = error_message(r#"{"detail":[{"loc":["query","limit"],"msg":"bad"}]}"#);
        assert!(msg.contains("limit"));
    }
}
