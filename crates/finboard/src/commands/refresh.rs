//! Tab refresh and watch mode.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tabled::Tabled;

use finboard_core::{AdminStore, Dashboard, Resource, Tab};

use crate::cli::{GlobalOpts, RefreshArgs, WatchArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Status rows ─────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ResourceStatus {
    name: &'static str,
    loaded: bool,
    loading: bool,
    last_updated: Option<DateTime<Utc>>,
    error: Option<String>,
}

impl ResourceStatus {
    fn of<T>(name: &'static str, r: &Resource<T>) -> Self {
        Self {
            name,
            loaded: r.data.is_some(),
            loading: r.loading,
            last_updated: r.last_updated,
            error: r.error.clone(),
        }
    }

    fn failed(&self) -> bool {
        self.error.is_some() && !self.loaded
    }
}

#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "Resource")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Updated")]
    updated: String,
    #[tabled(rename = "Error")]
    error: String,
}

impl StatusRow {
    fn new(s: &ResourceStatus, color: bool) -> Self {
        let ok = match (&s.error, s.last_updated) {
            (Some(_), _) => Some(false),
            (None, Some(_)) => Some(true),
            (None, None) => None,
        };
        Self {
            name: s.name.into(),
            status: output::status_label(ok, s.loading, color),
            updated: util::age(s.last_updated),
            error: output::opt_str(s.error.as_deref()),
        }
    }
}

/// Status of every resource a tab's composite fetch touches.
fn tab_status(store: &AdminStore, tab: Tab) -> Vec<ResourceStatus> {
    match tab {
        Tab::Overview => vec![
            ResourceStatus::of("stats", &store.system_stats()),
            ResourceStatus::of("activity", &store.user_activity()),
            ResourceStatus::of("metrics", &store.system_metrics()),
        ],
        Tab::System => vec![
            ResourceStatus::of("stats", &store.system_stats()),
            ResourceStatus::of("metrics", &store.system_metrics()),
            ResourceStatus::of("maintenance", &store.maintenance_status()),
        ],
        Tab::Logs => vec![ResourceStatus::of("logs", &store.logs().resource)],
        Tab::Audit => vec![
            ResourceStatus::of("audit", &store.audit().resource),
            ResourceStatus::of("security", &store.security_overview()),
        ],
        Tab::Health => vec![
            ResourceStatus::of("health", &store.system_health()),
            ResourceStatus::of("metrics", &store.system_metrics()),
        ],
    }
}

fn render_status(
    dashboard: &Dashboard,
    tab: Tab,
    global: &GlobalOpts,
) -> Result<Vec<ResourceStatus>, CliError> {
    let color = output::should_color(global.color);
    let statuses = tab_status(dashboard.store(), tab);
    let out = output::render_list(
        global.output,
        &statuses,
        |s| StatusRow::new(s, color),
        |s| format!("{} {}", s.name, if s.failed() { "error" } else { "ok" }),
    )?;
    output::print_output(&out, global.quiet);
    Ok(statuses)
}

fn select_tab(dashboard: &Dashboard, name: Option<&str>) -> Tab {
    let name = name.map_or_else(|| dashboard.config().default_tab.to_string(), str::to_owned);
    dashboard.set_active_tab(&name)
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn refresh(
    dashboard: &Dashboard,
    args: RefreshArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let tab = select_tab(dashboard, args.tab.as_deref());

    let pb = util::spinner(&format!("Refreshing {tab}…"), global.quiet);
    dashboard.refresh_all().await;
    pb.finish_and_clear();

    let statuses = render_status(dashboard, tab, global)?;
    if statuses.iter().all(ResourceStatus::failed) {
        let message = statuses
            .iter()
            .find_map(|s| s.error.clone())
            .unwrap_or_else(|| finboard_core::FETCH_FAILED.into());
        return Err(CliError::FetchFailed {
            resource: tab.to_string(),
            message,
        });
    }
    Ok(())
}

pub async fn watch(
    dashboard: &Dashboard,
    args: WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let interval = dashboard.config().refresh_interval;
    if interval.is_zero() {
        return Err(CliError::Validation {
            field: "interval".into(),
            reason: "watch needs a non-zero refresh interval".into(),
        });
    }

    let tab = select_tab(dashboard, args.tab.as_deref());
    let limit = args.count.unwrap_or(u32::MAX);
    if limit == 0 {
        return Ok(());
    }

    dashboard.refresh_all().await;
    render_status(dashboard, tab, global)?;
    let mut done: u32 = 1;
    if done >= limit {
        return Ok(());
    }

    if !global.quiet {
        eprintln!(
            "Watching {tab} every {} (Ctrl-C to stop)",
            humantime::format_duration(interval)
        );
    }

    let mut refreshing = dashboard.store().subscribe_refreshing();
    dashboard.set_auto_refresh(true);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            next = refreshing.changed() => match next {
                Some(0) => {
                    render_status(dashboard, tab, global)?;
                    done = done.saturating_add(1);
                    if done >= limit {
                        break;
                    }
                }
                Some(_) => {}
                None => break,
            },
        }
    }

    dashboard.set_auto_refresh(false);
    Ok(())
}
