//! Shared helpers for command handlers.

use std::io::IsTerminal;

use chrono::DateTime;

use unified_api::ListOptions;

use crate::cli::ListArgs;
use crate::error::CliError;

/// `--page/--per-page` as request options; `None` when both are unset.
pub fn list_options(args: ListArgs) -> Option<ListOptions> {
    (args.page > 0 || args.per_page > 0).then_some(ListOptions {
        page: args.page,
        per_page: args.per_page,
    })
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal to ask on, refuses instead of guessing.
pub fn confirm(message: &str, yes_flag: bool, action: &str) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Controller timestamps are epoch milliseconds.
pub fn format_millis(millis: Option<i64>) -> String {
    millis
        .and_then(DateTime::from_timestamp_millis)
        .map_or_else(|| "-".into(), |t| t.format("%Y-%m-%d %H:%M:%S").to_string())
}

/// Controller `first_seen`/`last_seen` are epoch seconds.
pub fn format_secs(secs: Option<i64>) -> String {
    secs.and_then(|s| DateTime::from_timestamp(s, 0))
        .map_or_else(|| "-".into(), |t| t.format("%Y-%m-%d %H:%M:%S").to_string())
}

/// Seconds as `1d 2h 3m`.
pub fn format_uptime(secs: Option<i64>) -> String {
    let Some(secs) = secs.filter(|s| *s >= 0) else {
        return "-".into();
    };
    let (days, rem) = (secs / 86_400, secs % 86_400);
    let (hours, mins) = (rem / 3_600, (rem % 3_600) / 60);
    if days > 0 {
        format!("{days}d {hours}h {mins}m")
    } else if hours > 0 {
        format!("{hours}h {mins}m")
    } else {
        format!("{mins}m")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_options_only_when_set() {
        assert!(list_options(ListArgs { page: 0, per_page: 0 }).is_none());
        let opts = list_options(ListArgs { page: 2, per_page: 0 });
        assert_eq!(opts.map(|o| o.page), Some(2));
    }

    #[test]
    fn timestamps_render_in_utc() {
        assert_eq!(format_millis(Some(1_700_000_000_000)), "2023-11-14 22:13:20");
        assert_eq!(format_secs(Some(1_700_000_000)), "2023-11-14 22:13:20");
        assert_eq!(format_millis(None), "-");
    }

    #[test]
    fn uptime_units() {
        assert_eq!(format_uptime(Some(59)), "0m");
        assert_eq!(format_uptime(Some(3_660)), "1h 1m");
        assert_eq!(format_uptime(Some(90_061)), "1d 1h 1m");
        assert_eq!(format_uptime(None), "-");
    }
}
