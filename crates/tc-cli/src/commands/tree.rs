//! Tree command for printing the hierarchy below a task.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};
use tc_api::TaskParams;
use tc_core::{Task, TreeError, task_by_id, walk};

use super::util::{block_on, client, parse_task_id};
use crate::Config;
use crate::cli::TreeArgs;

/// Format the subtree below `root`, two spaces per level.
pub fn format_tree(tasks: &[Task], root: &Task, include_root: bool) -> Result<String, TreeError> {
    let mut output = String::new();
    // Without the root, its children are the outermost level.
    let offset = usize::from(!include_root);

    walk(tasks, root, include_root, |task, chain| {
        let indent = "  ".repeat(chain.depth().saturating_sub(offset));
        writeln!(output, "{indent}{} [{}]", task.name, task.task_id).unwrap();
    })?;

    Ok(output)
}

pub fn run<W: Write>(writer: &mut W, args: &TreeArgs, config: &Config) -> Result<()> {
    let root_id = parse_task_id(&args.root)?;
    let client = client(config)?;
    let tasks = block_on(client.get_tasks(TaskParams::default()))?
        .context("failed to fetch tasks")?;
    let root = task_by_id(&tasks, &root_id)?;

    let output = format_tree(&tasks, root, args.include_root)
        .with_context(|| format!("failed to walk tasks below {root_id}"))?;
    if output.is_empty() {
        writeln!(writer, "{} [{}] has no subtasks.", root.name, root.task_id)?;
    } else {
        write!(writer, "{output}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;
    use tc_core::TaskId;

    fn task(id: u64, parent: u64, name: &str) -> Task {
        Task::new(TaskId::from(id), TaskId::from(parent), name)
    }

    fn sample_tasks() -> Vec<Task> {
        vec![
            task(1, 0, "Website"),
            task(11, 1, "Frontend"),
            task(111, 11, "Landing page"),
            task(12, 1, "Backend"),
            task(2, 0, "Internal"),
        ]
    }

    #[test]
    fn format_tree_with_root() {
        let tasks = sample_tasks();
        let output = format_tree(&tasks, &tasks[0], true).unwrap();
        assert_snapshot!(output, @r"
        Website [1]
          Frontend [11]
            Landing page [111]
          Backend [12]
        ");
    }

    #[test]
    fn format_tree_without_root() {
        let tasks = sample_tasks();
        let output = format_tree(&tasks, &tasks[0], false).unwrap();
        assert_snapshot!(output, @r"
        Frontend [11]
          Landing page [111]
        Backend [12]
        ");
    }

    #[test]
    fn format_tree_of_leaf_without_root_is_empty() {
        let tasks = sample_tasks();
        assert!(format_tree(&tasks, &tasks[4], false).unwrap().is_empty());
    }

    #[test]
    fn format_tree_reports_cycles() {
        let tasks = vec![task(1, 2, "A"), task(2, 1, "B")];
        assert!(format_tree(&tasks, &tasks[0], true).is_err());
    }
}
