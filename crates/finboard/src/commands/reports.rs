//! Report listing and generation.

use tabled::Tabled;

use finboard_core::{Dashboard, Report, ReportKind, ReportRequest, ReportStatus};

use crate::cli::{GlobalOpts, ReportKindArg, ReportsArgs, ReportsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct ReportRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Kind")]
    kind: &'static str,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Download")]
    download: String,
}

impl From<&Report> for ReportRow {
    fn from(r: &Report) -> Self {
        Self {
            id: r.id.to_string(),
            kind: kind_name(r.kind),
            status: status_name(r.status),
            created: output::timestamp(Some(r.created_at)),
            download: output::opt_str(r.download_url.as_deref()),
        }
    }
}

fn kind(arg: ReportKindArg) -> ReportKind {
    match arg {
        ReportKindArg::UserActivity => ReportKind::UserActivity,
        ReportKindArg::SystemUsage => ReportKind::SystemUsage,
        ReportKindArg::Audit => ReportKind::Audit,
        ReportKindArg::Financial => ReportKind::Financial,
    }
}

fn kind_name(kind: ReportKind) -> &'static str {
    match kind {
        ReportKind::UserActivity => "user-activity",
        ReportKind::SystemUsage => "system-usage",
        ReportKind::Audit => "audit",
        ReportKind::Financial => "financial",
    }
}

fn status_name(status: ReportStatus) -> &'static str {
    match status {
        ReportStatus::Pending => "pending",
        ReportStatus::Running => "running",
        ReportStatus::Completed => "completed",
        ReportStatus::Failed => "failed",
    }
}

pub async fn handle(
    dashboard: &Dashboard,
    args: ReportsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ReportsCommand::List => {
            let reports = dashboard.list_reports().await?;
            let out = output::render_list(
                global.output,
                &reports,
                |r| ReportRow::from(r),
                |r| r.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ReportsCommand::Generate {
            kind: arg,
            from,
            to,
        } => {
            let request = ReportRequest {
                kind: kind(arg),
                from: util::parse_opt_time("from", from.as_deref())?,
                to: util::parse_opt_time("to", to.as_deref())?,
            };
            if matches!((request.from, request.to), (Some(from), Some(to)) if from > to) {
                return Err(CliError::Validation {
                    field: "from".into(),
                    reason: "start of range is after its end".into(),
                });
            }
            let report = dashboard.generate_report(&request).await?;
            let out = output::render_single(
                global.output,
                &report,
                |r| {
                    format!(
                        "Queued {} report {} ({})",
                        kind_name(r.kind),
                        r.id,
                        status_name(r.status)
                    )
                },
                |r| r.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
