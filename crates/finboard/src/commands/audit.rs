//! Audit trail listing.

use tabled::Tabled;

use finboard_core::{AuditEntry, Dashboard};

use crate::cli::{AuditArgs, GlobalOpts};
use crate::error::CliError;
use crate::output::{self, PageInfo};

use super::util;

#[derive(Tabled)]
struct AuditRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Resource")]
    resource: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "OK")]
    success: String,
}

impl From<&AuditEntry> for AuditRow {
    fn from(e: &AuditEntry) -> Self {
        let resource = match (&e.resource_type, &e.resource_id) {
            (Some(t), Some(id)) => format!("{t}/{id}"),
            (Some(t), None) => t.clone(),
            _ => "-".into(),
        };
        Self {
            id: e.id,
            time: output::timestamp(Some(e.timestamp)),
            user: e
                .username
                .clone()
                .or_else(|| e.user_id.map(|id| id.to_string()))
                .unwrap_or_else(|| "-".into()),
            action: e.action.clone(),
            resource,
            ip: output::opt_str(e.ip_address.as_deref()),
            success: if e.success { "yes" } else { "no" }.into(),
        }
    }
}

pub async fn handle(
    dashboard: &Dashboard,
    args: AuditArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let from = util::parse_opt_time("from", args.from.as_deref())?;
    let to = util::parse_opt_time("to", args.to.as_deref())?;

    let store = dashboard.store();
    store.update_audit_filters(|f| {
        f.user_id = args.user_id;
        f.action = args.action;
        f.from = from;
        f.to = to;
    });
    let limit = args.limit.unwrap_or(store.settings().audit_page_size);
    store.set_audit_page(args.skip, limit);

    let pb = util::spinner("Fetching audit trail…", global.quiet);
    store.fetch_audit().await;
    pb.finish_and_clear();

    let page = store.audit();
    let items = util::settle_page("audit trail", &page)?;
    let out = output::render_page(
        global.output,
        &items,
        PageInfo {
            total: page.total,
            skip: page.skip,
            limit: page.limit,
        },
        |e| AuditRow::from(e),
        |e| e.id.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
