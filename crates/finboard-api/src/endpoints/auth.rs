// Session endpoints: login and logout.

use secrecy::{ExposeSecret, SecretString};
use tracing::{info, warn};

use crate::client::AdminClient;
use crate::credentials::Session;
use crate::error::Error;
use crate::types::{LoginRequest, LoginResponse};

impl AdminClient {
    /// Exchange username + password for a bearer token and persist it.
    ///
    /// `POST /api/v1/auth/login`
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<Session, Error> {
        let body = LoginRequest {
            username,
            password: password.expose_secret(),
        };
        let resp: LoginResponse = self
            .post("/api/v1/auth/login", &body)
            .await
            .map_err(|e| match e {
                Error::Unauthorized => Error::Authentication {
                    message: "invalid username or password".into(),
                },
                Error::Api { status: 403, message } => Error::Authentication { message },
                other => other,
            })?;

        let session = Session::new(
            SecretString::from(resp.access_token),
            Some(resp.user.map_or_else(|| username.to_owned(), |u| u.username)),
        );
        self.credentials().store(&session)?;
        info!(username, "logged in");
        Ok(session)
    }

    /// End the server-side session and clear local credentials.
    ///
    /// `POST /api/v1/auth/logout`. Local credentials are cleared even if the
    /// backend call fails.
    pub async fn logout(&self) -> Result<(), Error> {
        let result: Result<serde_json::Value, Error> =
            self.post("/api/v1/auth/logout", &serde_json::json!({})).await;
        self.credentials().clear();
        match result {
            Ok(_) | Err(Error::Unauthorized) => {
                info!("logged out");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "server-side logout failed, local session cleared");
                Err(e)
            }
        }
    }
}
