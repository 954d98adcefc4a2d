// ── Runtime dashboard configuration ──
//
// These types describe *how* to reach the admin backend. They carry
// credential data and tuning but never touch config files: the CLI builds
// a `DashboardConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::store::StoreSettings;
use crate::tab::Tab;

/// Where the bearer token comes from.
#[derive(Debug, Clone)]
pub enum AuthSource {
    /// Token supplied directly (flag, env var, keyring, config file).
    /// Cleared from memory only on 401.
    Token(SecretString),
    /// Session file written by `finboard login`; removed on 401.
    SessionFile(PathBuf),
    /// No credentials; requests go out unauthenticated.
    Anonymous,
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed staging deployments).
    DangerAcceptInvalid,
}

/// Configuration for one dashboard session against one backend.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Backend base URL (e.g., `https://admin.example.com`).
    pub url: Url,
    pub auth: AuthSource,
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    /// Auto-refresh period. Zero disables the background task.
    pub refresh_interval: Duration,
    /// Tab selected at startup.
    pub default_tab: Tab,
    /// Page sizes and list limits used by the store.
    pub store: StoreSettings,
}

impl DashboardConfig {
    pub fn new(url: Url, auth: AuthSource) -> Self {
        Self {
            url,
            auth,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            refresh_interval: Duration::from_secs(30),
            default_tab: Tab::default(),
            store: StoreSettings::default(),
        }
    }
}
