//! Login / logout handlers.

use dialoguer::Input;
use secrecy::SecretString;

use finboard_core::{AuthSource, Dashboard};

use crate::cli::{GlobalOpts, LoginArgs};
use crate::error::CliError;

fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

pub async fn login(
    dashboard: &Dashboard,
    args: LoginArgs,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let username = match args.username {
        Some(u) => u,
        None => Input::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(prompt_err)?,
    };
    let password = match args.password {
        Some(p) => p,
        None => rpassword::prompt_password("Password: ").map_err(prompt_err)?,
    };

    if username.is_empty() || password.is_empty() {
        return Err(CliError::Validation {
            field: "credentials".into(),
            reason: "username and password cannot be empty".into(),
        });
    }

    let session = dashboard
        .login(&username, &SecretString::from(password))
        .await?;

    if !global.quiet {
        let who = session.username.as_deref().unwrap_or(&username);
        eprintln!("✓ Logged in as {who} (profile '{profile_name}')");
        if let AuthSource::SessionFile(path) = &dashboard.config().auth {
            eprintln!("  Session stored at {}", path.display());
        }
    }
    Ok(())
}

pub async fn logout(
    dashboard: &Dashboard,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    dashboard.logout().await?;
    if !global.quiet {
        eprintln!("✓ Logged out (profile '{profile_name}')");
        if matches!(dashboard.config().auth, AuthSource::Token(_)) {
            eprintln!(
                "  A configured token is still in use. Remove it with: \
                 finboard config set-token, or clear FINBOARD_TOKEN"
            );
        }
    }
    Ok(())
}
