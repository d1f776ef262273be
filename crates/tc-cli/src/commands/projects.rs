//! Projects command for listing projects with their direct tasks.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;
use tc_api::TaskParams;
use tc_core::{ProjectNode, Task};

use super::util::{block_on, client};
use crate::Config;
use crate::cli::ProjectsArgs;

/// Project data for JSON output.
#[derive(Debug, Serialize)]
pub struct ProjectEntry<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub archived: bool,
    pub tasks: Vec<TaskEntry<'a>>,
}

/// Child task data for JSON output.
#[derive(Debug, Serialize)]
pub struct TaskEntry<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub archived: bool,
}

impl<'a> From<&'a Task> for TaskEntry<'a> {
    fn from(task: &'a Task) -> Self {
        Self {
            id: task.task_id.as_str(),
            name: &task.name,
            archived: task.archived,
        }
    }
}

fn label(task: &Task) -> String {
    if task.archived {
        format!("{} [{}] (archived)", task.name, task.task_id)
    } else {
        format!("{} [{}]", task.name, task.task_id)
    }
}

/// Format projects for human-readable output.
pub fn format_projects(projects: &[ProjectNode<'_>]) -> String {
    let mut output = String::new();

    if projects.is_empty() {
        writeln!(output, "No projects found.").unwrap();
        return output;
    }

    for node in projects {
        writeln!(output, "{}", label(node.project)).unwrap();
        for task in &node.tasks {
            writeln!(output, "  {}", label(task)).unwrap();
        }
    }

    output
}

/// Format projects as JSON.
pub fn format_projects_json(projects: &[ProjectNode<'_>]) -> Result<String> {
    let entries: Vec<ProjectEntry<'_>> = projects
        .iter()
        .map(|node| ProjectEntry {
            id: node.project.task_id.as_str(),
            name: &node.project.name,
            archived: node.project.archived,
            tasks: node.tasks.iter().copied().map(TaskEntry::from).collect(),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}

pub fn run<W: Write>(writer: &mut W, args: &ProjectsArgs, config: &Config) -> Result<()> {
    let client = client(config)?;
    let params = TaskParams {
        only_archived: args.archived,
        only_active: args.active,
    };
    let projects = block_on(client.get_projects(params))?.context("failed to fetch projects")?;
    let tree = projects.tree();

    let output = if args.json {
        format_projects_json(&tree)?
    } else {
        format_projects(&tree)
    };
    write!(writer, "{output}")?;
    if args.json {
        writeln!(writer)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;
    use tc_core::{TaskId, project_tree};

    fn task(id: u64, parent: u64, name: &str) -> Task {
        Task::new(TaskId::from(id), TaskId::from(parent), name)
    }

    fn sample_tasks() -> Vec<Task> {
        let mut old = task(5, 0, "archive 2019");
        old.archived = true;
        vec![
            task(1, 0, "Website"),
            task(11, 1, "frontend"),
            task(12, 1, "Backend"),
            task(111, 11, "Landing page"),
            task(2, 0, "acme corp"),
            task(21, 2, "Support"),
            old,
        ]
    }

    #[test]
    fn format_projects_sorts_and_indents() {
        let tasks = sample_tasks();
        let output = format_projects(&project_tree(&tasks));
        assert_snapshot!(output, @r"
        acme corp [2]
          Support [21]
        archive 2019 [5] (archived)
        Website [1]
          Backend [12]
          frontend [11]
        ");
    }

    #[test]
    fn format_projects_empty() {
        let output = format_projects(&[]);
        assert_eq!(output, "No projects found.\n");
    }

    #[test]
    fn format_projects_json_lists_children() {
        let tasks = vec![task(1, 0, "Website"), task(12, 1, "Backend")];
        let json = format_projects_json(&project_tree(&tasks)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[0]["id"], "1");
        assert_eq!(value[0]["name"], "Website");
        assert_eq!(value[0]["tasks"][0]["id"], "12");
        assert_eq!(value[0]["tasks"][0]["archived"], false);
    }
}
