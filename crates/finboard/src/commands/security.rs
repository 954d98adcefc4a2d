//! Security overview and session management.

use tabled::Tabled;
use uuid::Uuid;

use finboard_core::{ActiveSession, Dashboard, SecurityOverview};

use crate::cli::{GlobalOpts, SecurityArgs, SecurityCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct SessionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Last Seen")]
    last_seen: String,
}

impl From<&ActiveSession> for SessionRow {
    fn from(s: &ActiveSession) -> Self {
        Self {
            id: s.id.to_string(),
            user: s
                .username
                .clone()
                .unwrap_or_else(|| s.user_id.to_string()),
            ip: output::opt_str(s.ip_address.as_deref()),
            created: output::timestamp(Some(s.created_at)),
            last_seen: output::timestamp(s.last_seen),
        }
    }
}

fn detail(s: &SecurityOverview) -> String {
    let mut lines = vec![
        format!("Failed logins (24h): {}", s.failed_logins_24h),
        format!("Locked accounts:     {}", s.locked_accounts),
        format!("Active sessions:     {}", s.active_sessions.len()),
    ];
    if !s.suspicious_ips.is_empty() {
        lines.push(String::new());
        lines.push("Suspicious IPs:".into());
        for ip in &s.suspicious_ips {
            lines.push(format!(
                "  {:<40} {} failed, last {}",
                ip.ip_address,
                ip.failed_attempts,
                output::timestamp(ip.last_attempt)
            ));
        }
    }
    if !s.recent_events.is_empty() {
        lines.push(String::new());
        lines.push("Recent events:".into());
        for ev in &s.recent_events {
            lines.push(format!(
                "  {} {:<20} {} {}",
                output::timestamp(Some(ev.timestamp)),
                ev.event_type,
                output::opt_str(ev.username.as_deref()),
                output::opt_str(ev.ip_address.as_deref()),
            ));
        }
    }
    lines.join("\n")
}

pub async fn handle(
    dashboard: &Dashboard,
    args: SecurityArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command.unwrap_or(SecurityCommand::Show) {
        SecurityCommand::Show => {
            let store = dashboard.store();
            store.fetch_security_overview().await;
            let overview = util::settle("security overview", &store.security_overview())?;
            let out = output::render_single(global.output, &overview, detail, |s| {
                s.failed_logins_24h.to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SecurityCommand::Sessions => {
            let store = dashboard.store();
            store.fetch_security_overview().await;
            let overview = util::settle("security overview", &store.security_overview())?;
            let out = output::render_list(
                global.output,
                &overview.active_sessions,
                |s| SessionRow::from(s),
                |s| s.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SecurityCommand::Revoke { id } => {
            let id: Uuid = id.parse().map_err(|e| CliError::Validation {
                field: "id".into(),
                reason: format!("expected a session UUID: {e}"),
            })?;
            dashboard.revoke_session(id).await?;
            if !global.quiet {
                eprintln!("✓ Session {id} revoked");
            }
            Ok(())
        }
    }
}
