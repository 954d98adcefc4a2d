//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use finboard_core::HealthStatus;

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Health status label, colored when enabled.
pub fn health_label(status: HealthStatus, color: bool) -> String {
    let label = status.to_string();
    if !color {
        return label;
    }
    match status {
        HealthStatus::Healthy => label.green().to_string(),
        HealthStatus::Degraded => label.yellow().to_string(),
        HealthStatus::Unhealthy => label.red().to_string(),
        HealthStatus::Unknown => label.dimmed().to_string(),
    }
}

/// Resource status label: `ok`, `error`, `loading`, or `idle`.
pub fn status_label(ok: Option<bool>, loading: bool, color: bool) -> String {
    let (label, paint): (&str, fn(&str) -> String) = match (loading, ok) {
        (true, _) => ("loading", |s| s.cyan().to_string()),
        (false, Some(true)) => ("ok", |s| s.green().to_string()),
        (false, Some(false)) => ("error", |s| s.red().to_string()),
        (false, None) => ("idle", |s| s.dimmed().to_string()),
    };
    if color { paint(label) } else { label.into() }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(data.iter().map(&id_fn).collect::<Vec<_>>().join("\n")),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted
/// string, since single-item detail views don't use `Tabled` derive.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize + ?Sized,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(id_fn(data)),
    }
}

/// Page window of a paginated listing.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct PageInfo {
    pub total: u64,
    pub skip: u64,
    pub limit: u64,
}

#[derive(serde::Serialize)]
struct PageView<'a, T> {
    items: &'a [T],
    #[serde(flatten)]
    page: PageInfo,
}

/// Render one page of a paginated listing.
///
/// Structured formats wrap the items with `total` / `skip` / `limit`; the
/// table gets a "Showing a-b of n" footer.
pub fn render_page<T, R>(
    format: OutputFormat,
    items: &[T],
    page: PageInfo,
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let mut out = render_list(format, items, to_row, id_fn)?;
            if page.total > 0 && !items.is_empty() {
                let shown = u64::try_from(items.len()).unwrap_or(u64::MAX);
                let first = page.skip.saturating_add(1);
                let last = page.skip.saturating_add(shown).min(page.total.max(first));
                out.push_str(&format!("\nShowing {first}-{last} of {}", page.total));
            }
            Ok(out)
        }
        OutputFormat::Plain => render_list(format, items, to_row, id_fn),
        OutputFormat::Json | OutputFormat::JsonCompact | OutputFormat::Yaml => render_single(
            format,
            &PageView { items, page },
            |_| String::new(),
            |_| String::new(),
        ),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// Render rows as a rounded table.
pub fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    Ok(if compact {
        serde_json::to_string(data)?
    } else {
        serde_json::to_string_pretty(data)?
    })
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    Ok(serde_yaml::to_string(data)?)
}

// ── Value formatting ─────────────────────────────────────────────────

pub fn opt_pct(v: Option<f64>) -> String {
    v.map_or_else(|| "-".into(), |v| format!("{v:.1}%"))
}

pub fn opt_str(v: Option<&str>) -> String {
    v.unwrap_or("-").to_owned()
}

pub fn timestamp(ts: Option<chrono::DateTime<chrono::Utc>>) -> String {
    ts.map_or_else(
        || "-".into(),
        |t| t.format("%Y-%m-%d %H:%M:%S").to_string(),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(serde::Serialize)]
    struct Item {
        id: u32,
    }

    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "ID")]
        id: u32,
    }

    #[test]
    fn list_formats() {
        let items = [Item { id: 1 }, Item { id: 2 }];
        let plain =
            render_list(OutputFormat::Plain, &items, |i| Row { id: i.id }, |i| i.id.to_string())
                .unwrap();
        assert_eq!(plain, "1\n2");

        let json = render_list(
            OutputFormat::JsonCompact,
            &items,
            |i| Row { id: i.id },
            |i| i.id.to_string(),
        )
        .unwrap();
        assert_eq!(json, r#"[{"id":1},{"id":2}]"#);

        let table =
            render_list(OutputFormat::Table, &items, |i| Row { id: i.id }, |i| i.id.to_string())
                .unwrap();
        assert!(table.contains("ID"));
    }

    #[test]
    fn labels_without_color() {
        assert_eq!(status_label(Some(true), false, false), "ok");
        assert_eq!(status_label(Some(false), false, false), "error");
        assert_eq!(status_label(None, true, false), "loading");
        assert_eq!(health_label(HealthStatus::Degraded, false), "degraded");
        assert_eq!(opt_pct(Some(12.345)), "12.3%");
        assert_eq!(opt_pct(None), "-");
    }
}
