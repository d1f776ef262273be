//! Bottom-up aggregation of recorded time through the task hierarchy.
//!
//! # Malformed durations
//!
//! The two summarizers treat a malformed entry duration differently:
//!
//! - [`summarize_task`] fails with [`DurationParseError`].
//! - [`summarize_subtree`] skips the entry (logged at `warn`) and keeps going,
//!   so one bad entry does not hide the rest of the tree.
//!
//! Callers that need strict validation should use [`summarize_task`] or
//! validate entries up front with [`TimeEntry::duration`].
//!
//! Sums never overflow: [`Totals`] saturates at `Duration::MAX`.

use std::collections::HashMap;

use crate::entry::{DurationParseError, TimeEntry};
use crate::task::Task;
use crate::totals::{TaskTotals, Totals};
use crate::tree::{TreeError, walk};
use crate::types::TaskId;

/// Entries owned by `task_id`, in input order.
pub fn entries_for_task<'a>(entries: &'a [TimeEntry], task_id: &TaskId) -> Vec<&'a TimeEntry> {
    entries
        .iter()
        .filter(|entry| &entry.task_id == task_id)
        .collect()
}

/// Sums the entries attached directly to `task`.
///
/// Descendants are not included. The first malformed duration aborts the sum.
pub fn summarize_task(task: &Task, entries: &[TimeEntry]) -> Result<Totals, DurationParseError> {
    entries_for_task(entries, &task.task_id)
        .into_iter()
        .map(|entry| {
            entry
                .duration()
                .map(|duration| Totals::from_entry(duration, entry.is_billable()))
        })
        .sum()
}

/// Sums recorded time for `root` and every task below it.
///
/// Each task's own entries are added to its totals and to the totals of every
/// strict ancestor up to `root`. Entries pointing at tasks outside the subtree
/// are ignored.
pub fn summarize_subtree(
    tasks: &[Task],
    entries: &[TimeEntry],
    root: &Task,
) -> Result<TaskTotals, TreeError> {
    let by_task = index_entries(entries);
    let mut totals = TaskTotals::new();

    walk(tasks, root, true, |task, chain| {
        let own = by_task
            .get(&task.task_id)
            .map(|owned| sum_lenient(owned))
            .unwrap_or_default();

        totals.add(&task.task_id, own);
        for ancestor in chain.ids() {
            totals.add(ancestor, own);
        }
    })?;

    tracing::debug!(root = %root.task_id, tasks = totals.len(), "summarized task tree");
    Ok(totals)
}

fn index_entries(entries: &[TimeEntry]) -> HashMap<&TaskId, Vec<&TimeEntry>> {
    let mut index: HashMap<&TaskId, Vec<&TimeEntry>> = HashMap::new();
    for entry in entries {
        index.entry(&entry.task_id).or_default().push(entry);
    }
    index
}

fn sum_lenient(entries: &[&TimeEntry]) -> Totals {
    entries
        .iter()
        .filter_map(|entry| match entry.duration() {
            Ok(duration) => Some(Totals::from_entry(duration, entry.is_billable())),
            Err(err) => {
                tracing::warn!(task = %entry.task_id, error = %err, "skipping time entry");
                None
            }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    const fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    fn task(id: &str, parent: &str) -> Task {
        Task::new(
            TaskId::new(id).unwrap(),
            TaskId::new(parent).unwrap(),
            format!("Task {id}"),
        )
    }

    fn entry(id: u64, task: &str, duration: &str, billable: bool) -> TimeEntry {
        TimeEntry::new(id, TaskId::new(task).unwrap(), duration, billable)
    }

    fn id(s: &str) -> TaskId {
        TaskId::new(s).unwrap()
    }

    fn totals(total: u64, billable: u64) -> Totals {
        Totals {
            total: secs(total),
            billable: secs(billable),
        }
    }

    /// A ─┬─ A-A ─┬─ A-A-A ── A-A-A-A
    ///     │       └─ A-A-B
    ///     └─ A-B
    fn deep_chain() -> (Vec<Task>, Vec<TimeEntry>) {
        let tasks = vec![
            task("A", "0"),
            task("A-A", "A"),
            task("A-A-A", "A-A"),
            task("A-A-A-A", "A-A-A"),
            task("A-A-B", "A-A"),
            task("A-B", "A"),
        ];
        let entries = vec![
            entry(1, "A", "600", true),
            entry(2, "A-A", "600", true),
            entry(3, "A-A-A", "600", true),
            entry(4, "A-A-A-A", "600", true),
            entry(5, "A-A-B", "600", true),
            entry(6, "A-B", "600", true),
        ];
        (tasks, entries)
    }

    #[test]
    fn billable_and_total_time() {
        let tasks = vec![task("A", "0"), task("A-A", "A")];
        let entries = vec![entry(1, "A", "600", true), entry(2, "A", "300", false)];

        let result = summarize_subtree(&tasks, &entries, &tasks[0]).unwrap();
        assert_eq!(result.get(&id("A")), totals(900, 600));
        assert_eq!(result.get(&id("A-A")), Totals::ZERO);
    }

    #[test]
    fn task_tree_totals_below_middle_node() {
        let (tasks, entries) = deep_chain();
        let result = summarize_subtree(&tasks, &entries, &tasks[1]).unwrap();

        assert_eq!(result.len(), 4);
        assert_eq!(result.get(&id("A-A")), totals(2400, 2400));
        assert_eq!(result.get(&id("A-A-A")), totals(1200, 1200));
        assert_eq!(result.get(&id("A-A-A-A")), totals(600, 600));
        assert_eq!(result.get(&id("A-A-B")), totals(600, 600));
        assert!(!result.contains(&id("A")));
        assert!(!result.contains(&id("A-B")));
    }

    #[test]
    fn rollup_reaches_every_ancestor() {
        let (tasks, entries) = deep_chain();
        let result = summarize_subtree(&tasks, &entries, &tasks[0]).unwrap();

        assert_eq!(result.get(&id("A")), totals(3600, 3600));
        assert_eq!(result.get(&id("A-A")), totals(2400, 2400));
        assert_eq!(result.get(&id("A-A-A")), totals(1200, 1200));
        assert_eq!(result.get(&id("A-B")), totals(600, 600));
    }

    #[test]
    fn root_total_equals_sum_of_direct_entries() {
        let (tasks, entries) = deep_chain();
        let result = summarize_subtree(&tasks, &entries, &tasks[0]).unwrap();

        let direct: Totals = tasks
            .iter()
            .map(|t| summarize_task(t, &entries).unwrap())
            .sum();
        assert_eq!(result.get(&id("A")), direct);
    }

    #[test]
    fn billable_never_exceeds_total() {
        let tasks = vec![task("A", "0"), task("A-A", "A"), task("A-B", "A")];
        let entries = vec![
            entry(1, "A-A", "100", false),
            entry(2, "A-A", "50", true),
            entry(3, "A-B", "70", false),
        ];
        let result = summarize_subtree(&tasks, &entries, &tasks[0]).unwrap();
        for (_, t) in &result {
            assert!(t.billable <= t.total);
        }
        assert_eq!(result.get(&id("A")), totals(220, 50));
    }

    #[test]
    fn summarize_subtree_is_idempotent() {
        let (tasks, entries) = deep_chain();
        let first = summarize_subtree(&tasks, &entries, &tasks[0]).unwrap();
        let second = summarize_subtree(&tasks, &entries, &tasks[0]).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn subtree_skips_malformed_durations() {
        let tasks = vec![task("A", "0"), task("A-A", "A")];
        let entries = vec![
            entry(1, "A", "abc", true),
            entry(2, "A", "120", false),
            entry(3, "A-A", "60", true),
        ];
        let result = summarize_subtree(&tasks, &entries, &tasks[0]).unwrap();
        assert_eq!(result.get(&id("A-A")), totals(60, 60));
        assert_eq!(result.get(&id("A")), totals(180, 60));
    }

    #[test]
    fn entries_for_unknown_tasks_are_ignored() {
        let tasks = vec![task("A", "0")];
        let entries = vec![entry(1, "A", "60", false), entry(2, "ghost", "600", true)];
        let result = summarize_subtree(&tasks, &entries, &tasks[0]).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.get(&id("A")), totals(60, 0));
    }

    #[test]
    fn subtree_reports_cycles() {
        let tasks = vec![task("A", "B"), task("B", "A")];
        let result = summarize_subtree(&tasks, &[], &tasks[0]);
        assert!(matches!(result, Err(TreeError::CyclicHierarchy { .. })));
    }

    #[test]
    fn huge_durations_saturate_in_rollup_and_task() {
        let max = u64::MAX.to_string();
        let tasks = vec![task("A", "0"), task("A-A", "A")];
        let entries = vec![
            entry(1, "A-A", &max, true),
            entry(2, "A-A", "1", false),
            entry(3, "A", &max, false),
        ];

        let result = summarize_subtree(&tasks, &entries, &tasks[0]).unwrap();
        let child = result.get(&id("A-A"));
        assert_eq!(child.total, Duration::MAX);
        assert_eq!(child.billable, secs(u64::MAX));
        let root = result.get(&id("A"));
        assert_eq!(root.total, Duration::MAX);
        assert!(root.billable <= root.total);

        let direct = summarize_task(&tasks[1], &entries).unwrap();
        assert_eq!(direct.total, Duration::MAX);
    }

    #[test]
    fn summarize_task_counts_only_direct_entries() {
        let tasks = vec![task("A", "0"), task("A-A", "A")];
        let entries = vec![
            entry(1, "A", "600", true),
            entry(2, "A", "300", false),
            entry(3, "A-A", "999", true),
        ];
        assert_eq!(summarize_task(&tasks[0], &entries).unwrap(), totals(900, 600));
    }

    #[test]
    fn summarize_task_without_entries_is_zero() {
        let t = task("A", "0");
        assert_eq!(summarize_task(&t, &[]).unwrap(), Totals::ZERO);
    }

    #[test]
    fn summarize_task_rejects_malformed_duration() {
        let t = task("A", "0");
        let entries = vec![entry(1, "A", "600", true), entry(2, "A", "abc", false)];
        let err = summarize_task(&t, &entries).unwrap_err();
        assert_eq!(err.entry_id, 2);
        assert_eq!(err.value, "abc");
    }

    #[test]
    fn entries_for_task_matches_exactly() {
        let entries = vec![
            entry(1, "1", "60", false),
            entry(2, "12", "60", false),
            entry(3, "1", "60", false),
        ];
        let ids: Vec<u64> = entries_for_task(&entries, &id("1"))
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }
}
