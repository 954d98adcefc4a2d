//! Shared configuration for the finboard CLI.
//!
//! TOML profiles, token resolution (env + keyring + plaintext + session
//! file), and translation to `finboard_core::DashboardConfig`. The CLI adds
//! flag-aware overrides on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use finboard_core::{AuthSource, DashboardConfig, StoreSettings, Tab, TlsVerification};

const KEYRING_SERVICE: &str = "finboard";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use when none is given explicitly.
    pub fn active_profile_name(&self) -> &str {
        self.default_profile.as_deref().unwrap_or("default")
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Auto-refresh period in seconds. `0` disables auto-refresh.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
            refresh_interval: default_refresh_interval(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_refresh_interval() -> u64 {
    30
}

/// A named backend profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Backend base URL (e.g., "https://admin.example.com").
    pub url: String,

    /// Bearer token (plaintext, prefer keyring or env var).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Environment variable name containing the bearer token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_env: Option<String>,

    /// Override the auto-refresh period (seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_interval: Option<u64>,

    /// Tab selected on startup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_tab: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs_page_size: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_page_size: Option<u64>,

    /// Rows requested for the user activity list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_limit: Option<u32>,

    /// Path to custom CA certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "finboard", "finboard")
}

fn home_fallback(parts: &[&str]) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    for part in parts {
        p.push(part);
    }
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(&[".config", "finboard", "config.toml"]),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Session file written by `finboard login` for one profile.
pub fn session_path(profile_name: &str) -> PathBuf {
    let dir = project_dirs().map_or_else(
        || home_fallback(&[".local", "share", "finboard"]),
        |dirs| dirs.data_dir().to_path_buf(),
    );
    dir.join("sessions").join(format!("{profile_name}.json"))
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file, layered over defaults and under
/// `FINBOARD_*` environment variables (`__` separates nested keys).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("FINBOARD_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file is missing or invalid.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Saving ──────────────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    debug!(path = %path.display(), "config saved");
    Ok(())
}

// ── Keyring ─────────────────────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(
        KEYRING_SERVICE,
        &format!("{profile_name}/token"),
    )?)
}

/// Store a profile's bearer token in the system keyring.
pub fn store_token(profile_name: &str, token: &SecretString) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(token.expose_secret())?;
    Ok(())
}

/// Remove a profile's bearer token from the system keyring. Missing
/// entries are not an error.
pub fn delete_token(profile_name: &str) -> Result<(), ConfigError> {
    match keyring_entry(profile_name)?.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn keyring_token(profile_name: &str) -> Option<String> {
    keyring_entry(profile_name).ok()?.get_password().ok()
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// Resolve the token source for a profile.
///
/// Order: `token_env` variable, system keyring, plaintext `token`, then
/// the profile's session file. The session file is always the fallback so
/// `finboard login` has somewhere to persist to.
pub fn resolve_auth(profile: &Profile, profile_name: &str) -> AuthSource {
    resolve_auth_with(
        profile,
        profile_name,
        |name| std::env::var(name).ok(),
        keyring_token,
    )
}

fn resolve_auth_with(
    profile: &Profile,
    profile_name: &str,
    env: impl Fn(&str) -> Option<String>,
    keyring: impl Fn(&str) -> Option<String>,
) -> AuthSource {
    // 1. Profile's token_env → env var lookup
    if let Some(token) = profile.token_env.as_deref().and_then(&env) {
        debug!(profile = profile_name, "token from environment");
        return AuthSource::Token(SecretString::from(token));
    }

    // 2. System keyring
    if let Some(token) = keyring(profile_name) {
        debug!(profile = profile_name, "token from keyring");
        return AuthSource::Token(SecretString::from(token));
    }

    // 3. Plaintext in config
    if let Some(ref token) = profile.token {
        return AuthSource::Token(SecretString::from(token.clone()));
    }

    // 4. Session from `finboard login`
    AuthSource::SessionFile(session_path(profile_name))
}

// ── DashboardConfig translation ─────────────────────────────────────

pub fn parse_url(raw: &str) -> Result<url::Url, ConfigError> {
    let url: url::Url = raw.parse().map_err(|e| ConfigError::Validation {
        field: "url".into(),
        reason: format!("invalid URL '{raw}': {e}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "url".into(),
            reason: format!("expected http or https, got '{}'", url.scheme()),
        });
    }
    Ok(url)
}

fn page_size(field: &str, value: Option<u64>, default: u64) -> Result<u64, ConfigError> {
    match value {
        Some(0) => Err(ConfigError::Validation {
            field: field.into(),
            reason: "must be greater than zero".into(),
        }),
        Some(n) => Ok(n),
        None => Ok(default),
    }
}

/// Build a `DashboardConfig` from a profile, with no CLI flag overrides.
pub fn profile_to_dashboard_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<DashboardConfig, ConfigError> {
    let url = parse_url(&profile.url)?;
    let auth = resolve_auth(profile, profile_name);
    build_dashboard_config(url, auth, profile, defaults)
}

fn build_dashboard_config(
    url: url::Url,
    auth: AuthSource,
    profile: &Profile,
    defaults: &Defaults,
) -> Result<DashboardConfig, ConfigError> {
    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let base = StoreSettings::default();
    let store = StoreSettings {
        activity_limit: profile.activity_limit.unwrap_or(base.activity_limit),
        logs_page_size: page_size("logs_page_size", profile.logs_page_size, base.logs_page_size)?,
        audit_page_size: page_size(
            "audit_page_size",
            profile.audit_page_size,
            base.audit_page_size,
        )?,
    };

    let mut config = DashboardConfig::new(url, auth);
    config.tls = tls;
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.refresh_interval =
        Duration::from_secs(profile.refresh_interval.unwrap_or(defaults.refresh_interval));
    config.default_tab = profile
        .default_tab
        .as_deref()
        .map_or_else(Tab::default, Tab::from_name);
    config.store = store;
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn profile(url: &str) -> Profile {
        Profile {
            url: url.into(),
            ..Profile::default()
        }
    }

    #[test]
    fn loads_profiles_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_profile = "prod"

[defaults]
timeout = 10

[profiles.prod]
url = "https://admin.example.com"
token_env = "FINBOARD_TEST_PROD_TOKEN"
logs_page_size = 25
default_tab = "logs"
"#,
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.active_profile_name(), "prod");
        assert_eq!(cfg.defaults.timeout, 10);
        assert_eq!(cfg.defaults.output, "table");
        let prod = cfg.profile("prod").unwrap();
        assert_eq!(prod.logs_page_size, Some(25));
        assert!(matches!(
            cfg.profile("staging"),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_then_load_preserves_profile() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        let mut p = profile("https://admin.example.com");
        p.audit_page_size = Some(10);
        cfg.profiles.insert("default".into(), p.clone());

        save_config_to(&cfg, &path).unwrap();
        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.profiles.get("default"), Some(&p));
    }

    #[test]
    fn token_chain_prefers_env_then_keyring_then_plaintext() {
        let mut p = profile("https://a.example.com");
        p.token_env = Some("TOKEN_VAR".into());
        p.token = Some("plain".into());

        let from_env = resolve_auth_with(&p, "x", |_| Some("env".into()), |_| Some("kr".into()));
        assert!(matches!(from_env, AuthSource::Token(t) if t.expose_secret() == "env"));

        let from_kr = resolve_auth_with(&p, "x", |_| None, |_| Some("kr".into()));
        assert!(matches!(from_kr, AuthSource::Token(t) if t.expose_secret() == "kr"));

        let from_plain = resolve_auth_with(&p, "x", |_| None, |_| None);
        assert!(matches!(from_plain, AuthSource::Token(t) if t.expose_secret() == "plain"));
    }

    #[test]
    fn token_chain_falls_back_to_session_file() {
        let p = profile("https://a.example.com");
        let auth = resolve_auth_with(&p, "staging", |_| None, |_| None);
        match auth {
            AuthSource::SessionFile(path) => assert!(path.ends_with("sessions/staging.json")),
            other => panic!("unexpected auth source: {other:?}"),
        }
    }

    #[test]
    fn dashboard_config_applies_profile_overrides() {
        let mut p = profile("https://admin.example.com");
        p.refresh_interval = Some(0);
        p.default_tab = Some("Audit".into());
        p.logs_page_size = Some(20);
        p.insecure = Some(true);

        let cfg =
            build_dashboard_config(parse_url(&p.url).unwrap(), AuthSource::Anonymous, &p, &Defaults::default())
                .unwrap();
        assert_eq!(cfg.refresh_interval, Duration::ZERO);
        assert_eq!(cfg.timeout, Duration::from_secs(30));
        assert_eq!(cfg.default_tab, Tab::Audit);
        assert_eq!(cfg.store.logs_page_size, 20);
        assert_eq!(cfg.store.audit_page_size, 50);
        assert_eq!(cfg.tls, TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn rejects_zero_page_size_and_bad_urls() {
        let mut p = profile("https://admin.example.com");
        p.audit_page_size = Some(0);
        let err = build_dashboard_config(
            parse_url(&p.url).unwrap(),
            AuthSource::Anonymous,
            &p,
            &Defaults::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "audit_page_size"));

        assert!(parse_url("not a url").is_err());
        assert!(parse_url("ftp://files.example.com").is_err());
    }
}
