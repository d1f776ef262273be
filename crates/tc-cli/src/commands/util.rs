//! Shared utilities for CLI commands.

use std::future::Future;
use std::sync::LazyLock;
use std::time::Duration;

use anyhow::{Context, bail};
use chrono::{Datelike, Days, NaiveDate};
use regex::Regex;
use tc_api::{Client, TaskParams, TimeEntryParams};
use tc_core::{DATE_FORMAT, Task, TaskId, TimeEntry, task_by_id};

use crate::Config;
use crate::cli::RangeArgs;

/// Pre-compiled regex for relative date parsing.
static RELATIVE_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(day|week)s?\s+ago$").unwrap());

/// Conservative bound for relative dates (~1000 years in days).
const MAX_RELATIVE_DAYS: u64 = 1000 * 365;

/// Parse a date string relative to `today`.
///
/// Supports:
/// - ISO dates: "2026-01-15"
/// - "today", "yesterday"
/// - Relative: "3 days ago", "1 week ago"
pub fn parse_date(s: &str, today: NaiveDate) -> anyhow::Result<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        return Ok(date);
    }

    match s {
        "today" => return Ok(today),
        "yesterday" => return days_before(today, 1),
        _ => {}
    }

    let Some(caps) = RELATIVE_DATE_RE.captures(s) else {
        bail!(
            "Invalid date: {s}. Use YYYY-MM-DD (e.g., 2026-01-15), 'today', 'yesterday' or relative (e.g., '3 days ago')"
        );
    };

    let n: u64 = caps[1]
        .parse()
        .context("failed to parse number in relative date")?;
    let days = match &caps[2] {
        "day" => n,
        "week" => n.saturating_mul(7),
        unit => bail!("Unknown date unit: {unit}"),
    };
    if days > MAX_RELATIVE_DAYS {
        bail!("Relative date too far back: {s}");
    }
    days_before(today, days)
}

fn days_before(date: NaiveDate, days: u64) -> anyhow::Result<NaiveDate> {
    date.checked_sub_days(Days::new(days))
        .with_context(|| format!("date out of range: {days} days before {date}"))
}

/// Resolve the --from/--to pair, defaulting to month-to-date.
pub fn resolve_range(
    range: &RangeArgs,
    today: NaiveDate,
) -> anyhow::Result<(NaiveDate, NaiveDate)> {
    let from = match range.from.as_deref() {
        Some(s) => parse_date(s, today)?,
        None => today.with_day(1).unwrap_or(today),
    };
    let to = match range.to.as_deref() {
        Some(s) => parse_date(s, today)?,
        None => today,
    };
    if from > to {
        bail!("--from {from} is after --to {to}");
    }
    Ok((from, to))
}

/// Formats a duration as "Xh Ym" if >= 1 hour, "Xm" otherwise.
/// Seconds are truncated.
pub fn format_duration(duration: Duration) -> String {
    let total_minutes = duration.as_secs() / 60;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours >= 1 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Parse a task ID argument.
pub fn parse_task_id(s: &str) -> anyhow::Result<TaskId> {
    TaskId::new(s.trim()).with_context(|| format!("invalid task ID: {s:?}"))
}

/// Run an API future to completion on a fresh runtime.
pub fn block_on<F: Future>(future: F) -> anyhow::Result<F::Output> {
    let runtime = tokio::runtime::Runtime::new().context("failed to initialize tokio runtime")?;
    Ok(runtime.block_on(future))
}

/// Create an API client from the configuration.
pub fn client(config: &Config) -> anyhow::Result<Client> {
    let connection = config.connection()?;
    Client::new(connection).context("failed to create API client")
}

/// Everything a time summary needs, fetched in one go.
pub struct Fetched {
    pub tasks: Vec<Task>,
    pub entries: Vec<TimeEntry>,
}

impl Fetched {
    /// Looks up a task the summary refers to.
    pub fn task(&self, id: &TaskId) -> anyhow::Result<&Task> {
        Ok(task_by_id(&self.tasks, id)?)
    }
}

/// Fetch all tasks plus the time entries of `scope(tasks)` in the range.
pub fn fetch_tasks_and_entries<S>(
    client: &Client,
    from: NaiveDate,
    to: NaiveDate,
    scope: S,
) -> anyhow::Result<Fetched>
where
    S: FnOnce(&[Task]) -> anyhow::Result<Vec<TaskId>>,
{
    block_on(async {
        let tasks = client
            .get_tasks(TaskParams::default())
            .await
            .context("failed to fetch tasks")?;
        let task_ids = scope(&tasks)?;
        let params = TimeEntryParams { from, to, task_ids };
        let entries = client
            .get_time_entries(&params)
            .await
            .context("failed to fetch time entries")?;
        Ok::<_, anyhow::Error>(Fetched { tasks, entries })
    })?
}
