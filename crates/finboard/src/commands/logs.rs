//! Application log listing.

use tabled::Tabled;

use finboard_core::{Dashboard, LogEntry, LogLevel};

use crate::cli::{GlobalOpts, LevelArg, LogsArgs};
use crate::error::CliError;
use crate::output::{self, PageInfo};

use super::util;

#[derive(Tabled)]
struct LogRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Level")]
    level: String,
    #[tabled(rename = "Module")]
    module: String,
    #[tabled(rename = "Message")]
    message: String,
}

impl From<&LogEntry> for LogRow {
    fn from(e: &LogEntry) -> Self {
        Self {
            time: output::timestamp(Some(e.timestamp)),
            level: e.level.to_string(),
            module: output::opt_str(e.module.as_deref()),
            message: e.message.clone(),
        }
    }
}

fn level(arg: LevelArg) -> LogLevel {
    match arg {
        LevelArg::Debug => LogLevel::Debug,
        LevelArg::Info => LogLevel::Info,
        LevelArg::Warning => LogLevel::Warning,
        LevelArg::Error => LogLevel::Error,
        LevelArg::Critical => LogLevel::Critical,
    }
}

pub async fn handle(
    dashboard: &Dashboard,
    args: LogsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let from = util::parse_opt_time("from", args.from.as_deref())?;
    let to = util::parse_opt_time("to", args.to.as_deref())?;

    let store = dashboard.store();
    store.update_log_filters(|f| {
        f.level = args.level.map(level);
        f.search = args.search;
        f.from = from;
        f.to = to;
    });
    let limit = args.limit.unwrap_or(store.settings().logs_page_size);
    store.set_logs_page(args.skip, limit);

    let pb = util::spinner("Fetching logs…", global.quiet);
    store.fetch_logs().await;
    pb.finish_and_clear();

    let page = store.logs();
    let items = util::settle_page("logs", &page)?;
    let out = output::render_page(
        global.output,
        &items,
        PageInfo {
            total: page.total,
            skip: page.skip,
            limit: page.limit,
        },
        |e| LogRow::from(e),
        |e| format!("{} {} {}", e.timestamp.to_rfc3339(), e.level, e.message),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
