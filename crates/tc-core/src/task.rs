//! Tasks and projects as delivered by the `/tasks` endpoint.

use serde::{Deserialize, Serialize};

use crate::types::{TaskId, flag_from_wire, u32_from_wire};

fn default_parent() -> TaskId {
    TaskId::no_parent()
}

const fn default_level() -> u32 {
    1
}

/// A named node in the task forest.
///
/// Both "projects" and "tasks" in the remote UI are tasks; a project is a
/// task whose parent is the [`crate::NO_PARENT`] sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub task_id: TaskId,

    #[serde(default = "default_parent")]
    pub parent_id: TaskId,

    pub name: String,

    /// Nesting depth as reported by the service, 1 for projects.
    #[serde(default = "default_level", deserialize_with = "u32_from_wire")]
    pub level: u32,

    #[serde(default, deserialize_with = "flag_from_wire")]
    pub archived: bool,

    /// Comma-separated tag list, as sent by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
}

impl Task {
    /// Creates a task with default level and no tags.
    pub fn new(task_id: TaskId, parent_id: TaskId, name: impl Into<String>) -> Self {
        Self {
            task_id,
            parent_id,
            name: name.into(),
            level: default_level(),
            archived: false,
            tags: None,
        }
    }

    /// True if the task sits at the top of its hierarchy.
    pub fn is_project(&self) -> bool {
        self.parent_id.is_no_parent()
    }

    /// True if `other` is this task's direct parent.
    pub fn is_child_of(&self, other: &Self) -> bool {
        self.parent_id == other.task_id
    }

    /// Tags split on commas, blanks dropped.
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .as_deref()
            .map(|tags| {
                tags.split(',')
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}
