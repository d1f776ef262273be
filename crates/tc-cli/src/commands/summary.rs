//! Summary command for rolling recorded time up a task subtree.
//!
//! `tc summary <root>` fetches every task, then the time entries of the
//! subtree below `<root>` for the requested range, and prints per-task totals
//! in tree order. Each row includes the time of everything below it.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use tc_core::{Task, TaskTotals, Totals, TreeError, descendant_ids, summarize_subtree, walk};

use super::util::{client, fetch_tasks_and_entries, format_duration, parse_task_id, resolve_range};
use crate::Config;
use crate::cli::SummaryArgs;

const NAME_WIDTH: usize = 36;

/// One row of the summary, in tree order.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow {
    pub id: String,
    pub name: String,
    /// 0 for the summarized root.
    pub depth: usize,
    pub total_secs: u64,
    pub billable_secs: u64,
}

/// Computed summary data.
#[derive(Debug, Serialize)]
pub struct SummaryData {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub rows: Vec<SummaryRow>,
}

/// Lay out `totals` in tree order below `root`.
pub fn build_rows(
    tasks: &[Task],
    root: &Task,
    totals: &TaskTotals,
) -> Result<Vec<SummaryRow>, TreeError> {
    let mut rows = Vec::new();
    walk(tasks, root, true, |task, chain| {
        let Totals { total, billable } = totals.get(&task.task_id);
        rows.push(SummaryRow {
            id: task.task_id.to_string(),
            name: task.name.clone(),
            depth: chain.depth(),
            total_secs: total.as_secs(),
            billable_secs: billable.as_secs(),
        });
    })?;
    Ok(rows)
}

fn truncate(name: &str, width: usize) -> String {
    // Truncate by characters, not bytes, to avoid panics on multi-byte UTF-8
    if name.chars().count() > width {
        format!("{}...", name.chars().take(width - 3).collect::<String>())
    } else {
        name.to_string()
    }
}

/// Format summary for human-readable output.
pub fn format_summary(data: &SummaryData) -> String {
    let mut output = String::new();

    writeln!(output, "TIME SUMMARY ({} to {})", data.from, data.to).unwrap();
    writeln!(output).unwrap();

    writeln!(
        output,
        "{:<width$}  {:>8}  {:>8}",
        "Task",
        "Total",
        "Billable",
        width = NAME_WIDTH
    )
    .unwrap();
    writeln!(
        output,
        "{}  ────────  ────────",
        "─".repeat(NAME_WIDTH)
    )
    .unwrap();

    for row in &data.rows {
        let indent = "  ".repeat(row.depth);
        let name = truncate(
            &format!("{indent}{} [{}]", row.name, row.id),
            NAME_WIDTH,
        );
        let total = format_duration(std::time::Duration::from_secs(row.total_secs));
        let billable = format_duration(std::time::Duration::from_secs(row.billable_secs));
        writeln!(
            output,
            "{name:<width$}  {total:>8}  {billable:>8}",
            width = NAME_WIDTH
        )
        .unwrap();
    }

    output
}

/// Format summary as JSON.
pub fn format_summary_json(data: &SummaryData) -> Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

pub fn run<W: Write>(writer: &mut W, args: &SummaryArgs, config: &Config) -> Result<()> {
    let root_id = parse_task_id(&args.root)?;
    let (from, to) = resolve_range(&args.range, Local::now().date_naive())?;
    let client = client(config)?;

    let fetched = fetch_tasks_and_entries(&client, from, to, |tasks| {
        let root = tc_core::task_by_id(tasks, &root_id)?;
        Ok(descendant_ids(tasks, root)?)
    })?;
    let root = fetched.task(&root_id)?;

    let totals = summarize_subtree(&fetched.tasks, &fetched.entries, root)
        .with_context(|| format!("failed to summarize tasks below {root_id}"))?;
    let rows = build_rows(&fetched.tasks, root, &totals)?;
    let data = SummaryData { from, to, rows };

    if args.json {
        writeln!(writer, "{}", format_summary_json(&data)?)?;
    } else {
        write!(writer, "{}", format_summary(&data))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;
    use tc_core::{TaskId, TimeEntry};

    fn task(id: u64, parent: u64, name: &str) -> Task {
        Task::new(TaskId::from(id), TaskId::from(parent), name)
    }

    fn entry(id: u64, task: u64, secs: &str, billable: bool) -> TimeEntry {
        TimeEntry::new(id, TaskId::from(task), secs, billable)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> (Vec<Task>, Vec<TimeEntry>) {
        let tasks = vec![
            task(1, 0, "Website"),
            task(11, 1, "Frontend"),
            task(111, 11, "Landing page"),
            task(12, 1, "Backend"),
            task(2, 0, "Internal"),
        ];
        let entries = vec![
            entry(1, 111, "3600", true),
            entry(2, 11, "1800", false),
            entry(3, 12, "5400", true),
            entry(4, 12, "oops", true),
            entry(5, 2, "7200", false),
        ];
        (tasks, entries)
    }

    fn sample_data() -> SummaryData {
        let (tasks, entries) = sample();
        let totals = summarize_subtree(&tasks, &entries, &tasks[0]).unwrap();
        SummaryData {
            from: date(2021, 1, 1),
            to: date(2021, 1, 31),
            rows: build_rows(&tasks, &tasks[0], &totals).unwrap(),
        }
    }

    #[test]
    fn build_rows_follow_tree_order_with_rollup() {
        let data = sample_data();
        let ids: Vec<&str> = data.rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "11", "111", "12"]);

        assert_eq!(data.rows[0].total_secs, 3600 + 1800 + 5400);
        assert_eq!(data.rows[0].billable_secs, 3600 + 5400);
        assert_eq!(data.rows[1].total_secs, 5400);
        assert_eq!(data.rows[1].billable_secs, 3600);
        assert_eq!(data.rows[2].depth, 2);
    }

    #[test]
    fn format_summary_renders_table() {
        let output = format_summary(&sample_data());
        assert_snapshot!(output, @r"
        TIME SUMMARY (2021-01-01 to 2021-01-31)

        Task                                     Total  Billable
        ────────────────────────────────────  ────────  ────────
        Website [1]                              3h 0m    2h 30m
          Frontend [11]                         1h 30m     1h 0m
            Landing page [111]                   1h 0m     1h 0m
          Backend [12]                          1h 30m    1h 30m
        ");
    }

    #[test]
    fn format_summary_json_uses_seconds() {
        let json = format_summary_json(&sample_data()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["from"], "2021-01-01");
        assert_eq!(value["rows"][0]["total_secs"], 10_800);
        assert_eq!(value["rows"][3]["name"], "Backend");
    }

    #[test]
    fn truncate_long_names() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long task name", 10), "a very ...");
        assert_eq!(truncate("ääääääääääää", 5), "ää...");
    }
}
