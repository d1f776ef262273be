//! Project views over the flat task list.

use thiserror::Error;

use crate::task::Task;
use crate::types::TaskId;

/// Lookup by ID found no task.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("task with ID {task_id} not found")]
pub struct TaskNotFound {
    pub task_id: TaskId,
}

/// A project with its direct children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectNode<'a> {
    pub project: &'a Task,
    pub tasks: Vec<&'a Task>,
}

/// Top-level tasks, in input order.
pub fn project_list(tasks: &[Task]) -> Vec<&Task> {
    tasks.iter().filter(|task| task.is_project()).collect()
}

/// Projects with their direct children.
///
/// Projects and children are each sorted by name, ignoring case; tasks with
/// equal names keep their input order.
pub fn project_tree(tasks: &[Task]) -> Vec<ProjectNode<'_>> {
    let mut nodes: Vec<ProjectNode<'_>> = project_list(tasks)
        .into_iter()
        .map(|project| {
            let mut children: Vec<&Task> = tasks
                .iter()
                .filter(|task| task.is_child_of(project))
                .collect();
            children.sort_by_cached_key(|task| sort_key(task));
            ProjectNode {
                project,
                tasks: children,
            }
        })
        .collect();
    nodes.sort_by_cached_key(|node| sort_key(node.project));
    nodes
}

fn sort_key(task: &Task) -> String {
    task.name.to_uppercase()
}

/// Finds a task by ID.
pub fn task_by_id<'a>(tasks: &'a [Task], task_id: &TaskId) -> Result<&'a Task, TaskNotFound> {
    tasks
        .iter()
        .find(|task| &task.task_id == task_id)
        .ok_or_else(|| TaskNotFound {
            task_id: task_id.clone(),
        })
}
