//! Maintenance status and task execution.

use finboard_core::{Dashboard, MaintenanceResult, MaintenanceStatus, MaintenanceTask};

use crate::cli::{GlobalOpts, MaintenanceArgs, MaintenanceCommand, MaintenanceTaskArg};
use crate::error::CliError;
use crate::output;

use super::util;

fn task(arg: MaintenanceTaskArg) -> MaintenanceTask {
    match arg {
        MaintenanceTaskArg::CleanupFiles => MaintenanceTask::CleanupFiles,
        MaintenanceTaskArg::PurgeLogs => MaintenanceTask::PurgeLogs,
        MaintenanceTaskArg::VacuumDatabase => MaintenanceTask::VacuumDatabase,
        MaintenanceTaskArg::ClearCache => MaintenanceTask::ClearCache,
    }
}

fn task_name(task: MaintenanceTask) -> &'static str {
    match task {
        MaintenanceTask::CleanupFiles => "cleanup-files",
        MaintenanceTask::PurgeLogs => "purge-logs",
        MaintenanceTask::VacuumDatabase => "vacuum-database",
        MaintenanceTask::ClearCache => "clear-cache",
    }
}

fn mb(v: Option<f64>) -> String {
    v.map_or_else(|| "-".into(), |v| format!("{v:.1} MB"))
}

fn status_detail(s: &MaintenanceStatus) -> String {
    let pending = if s.pending_tasks.is_empty() {
        "none".to_owned()
    } else {
        s.pending_tasks
            .iter()
            .map(|t| task_name(*t))
            .collect::<Vec<_>>()
            .join(", ")
    };
    [
        format!(
            "Maintenance mode: {}",
            if s.maintenance_mode { "on" } else { "off" }
        ),
        format!("Last cleanup:     {}", output::timestamp(s.last_cleanup)),
        format!("Database size:    {}", mb(s.database_size_mb)),
        format!("Storage used:     {}", mb(s.storage_used_mb)),
        format!("Pending tasks:    {pending}"),
    ]
    .join("\n")
}

fn result_detail(r: &MaintenanceResult) -> String {
    let mut line = format!(
        "{} {}",
        if r.success { "✓" } else { "✗" },
        task_name(r.task)
    );
    if let Some(n) = r.affected {
        line.push_str(&format!(" ({n} affected)"));
    }
    if let Some(msg) = &r.message {
        line.push_str(&format!(": {msg}"));
    }
    line
}

pub async fn handle(
    dashboard: &Dashboard,
    args: MaintenanceArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        MaintenanceCommand::Status => {
            let store = dashboard.store();
            store.fetch_maintenance_status().await;
            let status = util::settle("maintenance status", &store.maintenance_status())?;
            let out = output::render_single(global.output, &status, status_detail, |s| {
                s.maintenance_mode.to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        MaintenanceCommand::Run { task: arg, yes } => {
            let task = task(arg);
            if !util::confirm(&format!("Run {}?", task_name(task)), yes)? {
                return Ok(());
            }
            let pb = util::spinner(&format!("Running {}…", task_name(task)), global.quiet);
            let result = dashboard.run_maintenance(task).await;
            pb.finish_and_clear();
            let result = result?;
            let out = output::render_single(global.output, &result, result_detail, |r| {
                r.success.to_string()
            })?;
            output::print_output(&out, global.quiet);
            if result.success {
                Ok(())
            } else {
                Err(CliError::ApiError {
                    status: None,
                    message: result
                        .message
                        .unwrap_or_else(|| format!("{} failed", task_name(task))),
                })
            }
        }
    }
}
