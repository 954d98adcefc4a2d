//! Command dispatch: bridges CLI args -> dashboard actions -> output formatting.

pub mod audit;
pub mod config_cmd;
pub mod logs;
pub mod maintenance;
pub mod overview;
pub mod refresh;
pub mod reports;
pub mod security;
pub mod session;
pub mod system;
pub mod util;

use finboard_core::{AuthSource, Dashboard};

use crate::cli::{Command, GlobalOpts};
use crate::config::Resolved;
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    resolved: Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let Resolved {
        profile_name,
        mut config,
    } = resolved;

    // Per-command adjustments that must happen before the store exists.
    match &cmd {
        Command::Login(_) => {
            config.auth = AuthSource::SessionFile(finboard_config::session_path(&profile_name));
        }
        Command::Activity(args) => {
            if let Some(limit) = args.limit {
                config.store.activity_limit = limit;
            }
        }
        Command::Watch(args) => {
            if let Some(interval) = args.interval {
                config.refresh_interval = interval;
            }
        }
        _ => {}
    }

    let dashboard = Dashboard::new(config)?;

    let result = match cmd {
        Command::Login(args) => session::login(&dashboard, args, &profile_name, global).await,
        Command::Logout => session::logout(&dashboard, &profile_name, global).await,
        Command::Overview => overview::overview(&dashboard, global).await,
        Command::Stats => overview::stats(&dashboard, global).await,
        Command::Activity(_) => overview::activity(&dashboard, global).await,
        Command::Metrics => system::metrics(&dashboard, global).await,
        Command::Health => system::health(&dashboard, global).await,
        Command::Security(args) => security::handle(&dashboard, args, global).await,
        Command::Logs(args) => logs::handle(&dashboard, args, global).await,
        Command::Audit(args) => audit::handle(&dashboard, args, global).await,
        Command::Refresh(args) => refresh::refresh(&dashboard, args, global).await,
        Command::Watch(args) => refresh::watch(&dashboard, args, global).await,
        Command::Maintenance(args) => maintenance::handle(&dashboard, args, global).await,
        Command::Reports(args) => reports::handle(&dashboard, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "config and completions are handled before dispatch".into(),
        )),
    };

    dashboard.shutdown().await;
    result
}
