//! Metrics and health handlers.

use tabled::Tabled;

use finboard_core::{ComponentHealth, Dashboard, SystemHealth, SystemMetrics};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct CheckRow {
    #[tabled(rename = "Component")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Latency")]
    latency: String,
    #[tabled(rename = "Message")]
    message: String,
}

fn check_row(name: &str, c: &ComponentHealth, color: bool) -> CheckRow {
    CheckRow {
        name: name.to_owned(),
        status: output::health_label(c.status, color),
        latency: c
            .latency_ms
            .map_or_else(|| "-".into(), |ms| format!("{ms:.0}ms")),
        message: output::opt_str(c.message.as_deref()),
    }
}

pub(super) fn metrics_detail(m: &SystemMetrics) -> String {
    [
        format!("CPU:         {}", output::opt_pct(m.cpu_usage)),
        format!("Memory:      {}", output::opt_pct(m.memory_usage)),
        format!("Disk:        {}", output::opt_pct(m.disk_usage)),
        format!("Connections: {}", m.active_connections),
        format!("Requests:    {} (24h)", m.request_count_24h),
        format!("Error rate:  {:.2}% (24h)", m.error_rate_24h * 100.0),
        format!("Avg resp:    {:.0}ms", m.avg_response_time),
    ]
    .join("\n")
}

fn health_detail(h: &SystemHealth, color: bool) -> String {
    let mut out = format!(
        "Status:  {}\nChecked: {}",
        output::health_label(h.status, color),
        output::timestamp(h.timestamp)
    );
    if !h.checks.is_empty() {
        let rows: Vec<CheckRow> = h
            .checks
            .iter()
            .map(|(name, c)| check_row(name, c, color))
            .collect();
        out.push_str("\n\n");
        out.push_str(&output::render_table(&rows));
    }
    out
}

pub async fn metrics(dashboard: &Dashboard, global: &GlobalOpts) -> Result<(), CliError> {
    let store = dashboard.store();
    store.fetch_system_metrics().await;
    let metrics = util::settle("system metrics", &store.system_metrics())?;
    let out = output::render_single(global.output, &metrics, metrics_detail, |m| {
        output::opt_pct(m.cpu_usage)
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn health(dashboard: &Dashboard, global: &GlobalOpts) -> Result<(), CliError> {
    let store = dashboard.store();
    store.fetch_system_health().await;
    let health = util::settle("system health", &store.system_health())?;
    let color = output::should_color(global.color);
    let out = output::render_single(
        global.output,
        &health,
        |h| health_detail(h, color),
        |h| h.status.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
