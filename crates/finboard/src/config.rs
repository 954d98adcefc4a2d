//! CLI flag overrides on top of `finboard-config` profiles.
//!
//! This is the single boundary where global flags and TOML profiles are
//! merged into a `finboard_core::DashboardConfig`.

use std::time::Duration;

use secrecy::SecretString;

use finboard_config::{Config, Profile};
use finboard_core::{AuthSource, DashboardConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// A dashboard configuration plus the profile it was resolved from.
pub struct Resolved {
    pub profile_name: String,
    pub config: DashboardConfig,
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .unwrap_or_else(|| config.active_profile_name().to_owned())
}

/// Comma-separated profile names, for diagnostics.
pub fn available_profiles(config: &Config) -> String {
    if config.profiles.is_empty() {
        "(none)".into()
    } else {
        config.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

/// Build a `DashboardConfig` from the config file, profile, and CLI flags.
pub fn resolve(global: &GlobalOpts) -> Result<Resolved, CliError> {
    let cfg = finboard_config::load_config_or_default();
    resolve_with(global, &cfg)
}

pub fn resolve_with(global: &GlobalOpts, cfg: &Config) -> Result<Resolved, CliError> {
    let profile_name = active_profile_name(global, cfg);

    let config = if let Some(profile) = cfg.profiles.get(&profile_name) {
        from_profile(profile, &profile_name, global, cfg)?
    } else if let Some(url) = global.url.as_deref() {
        // No profile: build from flags / env vars alone
        let url = finboard_config::parse_url(url)?;
        let auth = flag_token(global).unwrap_or_else(|| {
            AuthSource::SessionFile(finboard_config::session_path(&profile_name))
        });
        let mut config = DashboardConfig::new(url, auth);
        config.timeout = Duration::from_secs(global.timeout.unwrap_or(cfg.defaults.timeout));
        config.refresh_interval = Duration::from_secs(cfg.defaults.refresh_interval);
        if global.insecure || cfg.defaults.insecure {
            config.tls = TlsVerification::DangerAcceptInvalid;
        }
        config
    } else if global.profile.is_some() {
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: available_profiles(cfg),
        });
    } else {
        return Err(CliError::NoConfig {
            path: finboard_config::config_path().display().to_string(),
        });
    };

    Ok(Resolved {
        profile_name,
        config,
    })
}

fn from_profile(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
    cfg: &Config,
) -> Result<DashboardConfig, CliError> {
    let mut config =
        finboard_config::profile_to_dashboard_config(profile, profile_name, &cfg.defaults)?;

    // URL (flag > env > profile)
    if let Some(url) = global.url.as_deref() {
        config.url = finboard_config::parse_url(url)?;
    }

    // Token (flag > env > profile chain)
    if let Some(auth) = flag_token(global) {
        config.auth = auth;
    }

    if global.insecure {
        config.tls = TlsVerification::DangerAcceptInvalid;
    }

    if let Some(secs) = global.timeout {
        config.timeout = Duration::from_secs(secs);
    }

    Ok(config)
}

fn flag_token(global: &GlobalOpts) -> Option<AuthSource> {
    global
        .token
        .as_ref()
        .filter(|t| !t.is_empty())
        .map(|t| AuthSource::Token(SecretString::from(t.clone())))
}
