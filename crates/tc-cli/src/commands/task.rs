//! Task command for the time booked directly on one task.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use tc_core::{Task, Totals, summarize_task};

use super::util::{client, fetch_tasks_and_entries, format_duration, parse_task_id, resolve_range};
use crate::Config;
use crate::cli::TaskArgs;

/// Format a single task's totals as one line.
pub fn format_task(task: &Task, totals: Totals, from: NaiveDate, to: NaiveDate) -> String {
    format!(
        "{} [{}] {from} to {to}: total {}, billable {}\n",
        task.name,
        task.task_id,
        format_duration(totals.total),
        format_duration(totals.billable),
    )
}

pub fn run<W: Write>(writer: &mut W, args: &TaskArgs, config: &Config) -> Result<()> {
    let task_id = parse_task_id(&args.id)?;
    let (from, to) = resolve_range(&args.range, Local::now().date_naive())?;
    let client = client(config)?;

    let fetched = fetch_tasks_and_entries(&client, from, to, |tasks| {
        let task = tc_core::task_by_id(tasks, &task_id)?;
        Ok(vec![task.task_id.clone()])
    })?;
    let task = fetched.task(&task_id)?;

    let totals = summarize_task(task, &fetched.entries)
        .with_context(|| format!("failed to summarize task {task_id}"))?;
    write!(writer, "{}", format_task(task, totals, from, to))?;
    Ok(())
}
