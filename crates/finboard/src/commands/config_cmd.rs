//! Config subcommand handlers.

use dialoguer::{Input, Select};
use secrecy::{ExposeSecret, SecretString};

use finboard_config::{Config, Profile};
use finboard_core::Tab;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn prompt_token() -> Result<SecretString, CliError> {
    let token = rpassword::prompt_password("Bearer token: ").map_err(prompt_err)?;
    if token.trim().is_empty() {
        return Err(CliError::Validation {
            field: "token".into(),
            reason: "token cannot be empty".into(),
        });
    }
    Ok(SecretString::from(token.trim().to_owned()))
}

/// Copy of the config with plaintext tokens masked.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.token.is_some() {
            profile.token = Some("********".into());
        }
    }
    cfg
}

fn config_detail(cfg: &Config) -> String {
    let mut lines = vec![
        format!(
            "default_profile = {}",
            cfg.default_profile.as_deref().unwrap_or("(unset)")
        ),
        format!(
            "defaults        = output={} color={} insecure={} timeout={}s refresh={}s",
            cfg.defaults.output,
            cfg.defaults.color,
            cfg.defaults.insecure,
            cfg.defaults.timeout,
            cfg.defaults.refresh_interval
        ),
    ];
    for (name, p) in &cfg.profiles {
        lines.push(String::new());
        lines.push(format!("[profiles.{name}]"));
        lines.push(format!("  url         = {}", p.url));
        let auth = match (&p.token_env, &p.token) {
            (Some(var), _) => format!("env ${var}"),
            (None, Some(_)) => "plaintext token".into(),
            (None, None) => "keyring / session".into(),
        };
        lines.push(format!("  auth        = {auth}"));
        if let Some(tab) = &p.default_tab {
            lines.push(format!("  default_tab = {tab}"));
        }
        if let Some(secs) = p.refresh_interval {
            lines.push(format!("  refresh     = {secs}s"));
        }
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = finboard_config::config_path();
            eprintln!("finboard configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let mut cfg = finboard_config::load_config_or_default();

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let url: String = Input::new()
                .with_prompt("Backend URL")
                .default("http://localhost:8000".into())
                .validate_with(|s: &String| {
                    finboard_config::parse_url(s)
                        .map(|_| ())
                        .map_err(|e| e.to_string())
                })
                .interact_text()
                .map_err(prompt_err)?;

            let auth_choices = &[
                "Log in later with `finboard login` (session file)",
                "Bearer token in system keyring",
                "Bearer token in config file (plaintext)",
            ];
            let auth_selection = Select::new()
                .with_prompt("Authentication")
                .items(auth_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            let token = match auth_selection {
                1 => {
                    let token = prompt_token()?;
                    finboard_config::store_token(&profile_name, &token)?;
                    eprintln!("   ✓ Token stored in system keyring");
                    None
                }
                2 => Some(prompt_token()?.expose_secret().to_owned()),
                _ => None,
            };

            let tab_names: Vec<String> =
                [Tab::Overview, Tab::System, Tab::Logs, Tab::Audit, Tab::Health]
                    .iter()
                    .map(ToString::to_string)
                    .collect();
            let tab_selection = Select::new()
                .with_prompt("Default tab")
                .items(&tab_names)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            let profile = Profile {
                url,
                token,
                default_tab: tab_names.get(tab_selection).cloned(),
                ..Profile::default()
            };
            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());

            finboard_config::save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Test it: finboard overview");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = redacted(&finboard_config::load_config_or_default());
            let out = output::render_single(global.output, &cfg, config_detail, |c| {
                c.active_profile_name().to_owned()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", finboard_config::config_path().display());
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = finboard_config::load_config_or_default();
            let default = cfg.active_profile_name();
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: finboard config init");
            } else {
                for name in cfg.profiles.keys() {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = finboard_config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name,
                });
            }
            cfg.default_profile = Some(name.clone());
            finboard_config::save_config(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }

        // ── SetToken ────────────────────────────────────────────────
        ConfigCommand::SetToken { profile } => {
            let cfg = finboard_config::load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));
            if !cfg.profiles.contains_key(&profile_name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name: profile_name,
                });
            }

            let token = prompt_token()?;
            finboard_config::store_token(&profile_name, &token)?;
            eprintln!("✓ Token stored in system keyring for profile '{profile_name}'");
            Ok(())
        }
    }
}
