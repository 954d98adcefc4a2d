//! Overview tab: system stats, user activity, and metrics.

use std::collections::BTreeMap;

use serde::Serialize;
use tabled::Tabled;

use finboard_core::{Dashboard, Resource, SystemMetrics, SystemStats, UserActivity};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::{system, util};

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct ActivityRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "User")]
    username: String,
    #[tabled(rename = "Last Login")]
    last_login: String,
    #[tabled(rename = "Logins")]
    logins: u64,
    #[tabled(rename = "Files")]
    files: u64,
    #[tabled(rename = "Models")]
    models: u64,
    #[tabled(rename = "Active")]
    active: String,
}

impl From<&UserActivity> for ActivityRow {
    fn from(u: &UserActivity) -> Self {
        Self {
            id: u.user_id,
            username: u.username.clone(),
            last_login: output::timestamp(u.last_login),
            logins: u.login_count,
            files: u.files_uploaded,
            models: u.models_created,
            active: if u.is_active { "yes" } else { "no" }.into(),
        }
    }
}

pub(super) fn stats_detail(s: &SystemStats) -> String {
    [
        format!(
            "Users:       {} total, {} active, {} verified, {} new (24h)",
            s.users.total, s.users.active, s.users.verified, s.users.new_24h
        ),
        format!(
            "Files:       {} total, {} completed, {} processing, {} failed",
            s.files.total, s.files.completed, s.files.processing, s.files.failed
        ),
        format!(
            "Financial:   {} statements, {} line items, {} models",
            s.financial_data.statements, s.financial_data.line_items, s.financial_data.models
        ),
        format!(
            "Version:     {} ({})",
            output::opt_str(s.system.version.as_deref()),
            output::opt_str(s.system.environment.as_deref())
        ),
        format!(
            "Database:    {}",
            output::opt_str(s.system.database_status.as_deref())
        ),
    ]
    .join("\n")
}

fn activity_table(users: &[UserActivity]) -> String {
    let rows: Vec<ActivityRow> = users.iter().map(ActivityRow::from).collect();
    output::render_table(&rows)
}

// ── Handlers ────────────────────────────────────────────────────────

#[derive(Serialize)]
struct OverviewView<'a> {
    stats: Option<&'a SystemStats>,
    activity: Option<&'a Vec<UserActivity>>,
    metrics: Option<&'a SystemMetrics>,
    errors: BTreeMap<&'static str, &'a str>,
}

pub async fn overview(dashboard: &Dashboard, global: &GlobalOpts) -> Result<(), CliError> {
    let store = dashboard.store();
    let pb = util::spinner("Loading overview…", global.quiet);
    store.fetch_overview_data().await;
    pb.finish_and_clear();

    let stats = store.system_stats();
    let activity = store.user_activity();
    let metrics = store.system_metrics();

    let mut errors = BTreeMap::new();
    for (name, err) in [
        ("stats", &stats.error),
        ("activity", &activity.error),
        ("metrics", &metrics.error),
    ] {
        if let Some(err) = err {
            errors.insert(name, err.as_str());
        }
    }

    if stats.data.is_none() && activity.data.is_none() && metrics.data.is_none() {
        return util::settle("overview", &stats).map(|_| ());
    }

    let view = OverviewView {
        stats: stats.data.as_ref(),
        activity: activity.data.as_ref(),
        metrics: metrics.data.as_ref(),
        errors,
    };

    let out = output::render_single(
        global.output,
        &view,
        |v| {
            let mut sections = Vec::new();
            if let Some(s) = v.stats {
                sections.push(stats_detail(s));
            }
            if let Some(m) = v.metrics {
                sections.push(system::metrics_detail(m));
            }
            if let Some(a) = v.activity {
                sections.push(activity_table(a));
            }
            for (name, err) in &v.errors {
                sections.push(format!("! {name}: {err}"));
            }
            sections.join("\n\n")
        },
        |v| {
            v.stats
                .map(|s| s.users.total.to_string())
                .unwrap_or_default()
        },
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn stats(dashboard: &Dashboard, global: &GlobalOpts) -> Result<(), CliError> {
    let store = dashboard.store();
    store.fetch_system_stats().await;
    let stats = util::settle("system stats", &store.system_stats())?;
    let out = output::render_single(global.output, &stats, stats_detail, |s| {
        s.users.total.to_string()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn activity(dashboard: &Dashboard, global: &GlobalOpts) -> Result<(), CliError> {
    let store = dashboard.store();
    store.fetch_user_activity().await;
    let envelope: Resource<Vec<UserActivity>> = store.user_activity();
    let users = util::settle("user activity", &envelope)?;
    let out = output::render_list(global.output, &users, |u| ActivityRow::from(u), |u| {
        u.username.clone()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
