//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use indicatif::{ProgressBar, ProgressStyle};

use finboard_core::{FETCH_FAILED, Paginated, Resource};

use crate::error::CliError;

/// Unwrap a settled envelope.
///
/// Data wins over errors: when a refetch failed but an earlier value is
/// still cached, the error is reported on stderr and the stale data is
/// returned for rendering.
pub fn settle<T: Clone>(name: &str, resource: &Resource<T>) -> Result<T, CliError> {
    match (&resource.data, &resource.error) {
        (Some(data), Some(err)) => {
            eprintln!("warning: {name}: {err} (showing cached data)");
            Ok(data.clone())
        }
        (Some(data), None) => Ok(data.clone()),
        (None, err) => Err(CliError::FetchFailed {
            resource: name.into(),
            message: err.clone().unwrap_or_else(|| FETCH_FAILED.into()),
        }),
    }
}

/// [`settle`] for paginated slices: yields the current page items.
pub fn settle_page<T: Clone, F>(name: &str, page: &Paginated<T, F>) -> Result<Vec<T>, CliError> {
    settle(name, &page.resource).map(|_| page.items.clone())
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
pub fn parse_time(field: &str, raw: &str) -> Result<DateTime<Utc>, CliError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| CliError::Validation {
            field: field.into(),
            reason: format!("expected RFC 3339 timestamp or YYYY-MM-DD, got '{raw}'"),
        })
}

pub fn parse_opt_time(field: &str, raw: Option<&str>) -> Result<Option<DateTime<Utc>>, CliError> {
    raw.map(|r| parse_time(field, r)).transpose()
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}

/// Spinner on stderr while a fetch is in flight. Hidden when quiet or not
/// attached to a terminal.
pub fn spinner(message: &str, quiet: bool) -> ProgressBar {
    if quiet || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_owned());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Age of a timestamp, e.g. `"3s ago"`.
pub fn age(ts: Option<DateTime<Utc>>) -> String {
    ts.map_or_else(
        || "-".into(),
        |t| {
            let secs = (Utc::now() - t).num_seconds().max(0).unsigned_abs();
            format!("{} ago", humantime::format_duration(Duration::from_secs(secs)))
        },
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_dates_and_timestamps() {
        let d = parse_time("from", "2024-06-01").unwrap();
        assert_eq!(d.to_rfc3339(), "2024-06-01T00:00:00+00:00");
        let t = parse_time("from", "2024-06-01T12:30:00+02:00").unwrap();
        assert_eq!(t.to_rfc3339(), "2024-06-01T10:30:00+00:00");
        assert!(parse_time("to", "yesterday").is_err());
        assert_eq!(parse_opt_time("to", None).unwrap(), None);
    }

    #[test]
    fn settle_prefers_cached_data() {
        let mut r: Resource<u32> = Resource::new();
        assert!(matches!(
            settle("x", &r),
            Err(CliError::FetchFailed { ref message, .. }) if message == FETCH_FAILED
        ));
        r.error = Some("boom".into());
        assert!(matches!(
            settle("x", &r),
            Err(CliError::FetchFailed { ref message, .. }) if message == "boom"
        ));
        r.data = Some(7);
        assert_eq!(settle("x", &r).unwrap(), 7);
    }
}
