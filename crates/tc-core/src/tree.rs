//! Depth-first walk over the parent-pointer task forest.
//!
//! Tasks arrive as a flat list where each task names its parent. The walk
//! rebuilds the implicit tree below a chosen root and visits it
//! parent-before-children, siblings in input order.
//!
//! # Ancestor chain
//!
//! Every visit receives the [`AncestorChain`] of the visited task: the IDs
//! from the walk root down to the task's immediate parent. The chain is owned
//! by a single `walk` call; it is pushed on descent and popped on return, so
//! a visit never sees IDs from a sibling branch.

use std::collections::HashMap;

use thiserror::Error;

use crate::task::Task;
use crate::types::TaskId;

/// Deepest nesting the walk descends into before giving up.
pub const MAX_WALK_DEPTH: usize = 512;

/// Hierarchy faults found while walking.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// A task is its own ancestor.
    #[error("task {task_id} is its own ancestor")]
    CyclicHierarchy { task_id: TaskId },

    /// The hierarchy is nested deeper than [`MAX_WALK_DEPTH`].
    #[error("task hierarchy deeper than {limit} levels")]
    DepthLimitExceeded { limit: usize },
}

/// IDs of the ancestors of the task being visited, root first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AncestorChain {
    ids: Vec<TaskId>,
}

impl AncestorChain {
    /// Ancestor at `depth`, where depth 1 is the walk root.
    pub fn get(&self, depth: usize) -> Option<&TaskId> {
        depth.checked_sub(1).and_then(|idx| self.ids.get(idx))
    }

    /// Number of ancestors.
    pub fn depth(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, task_id: &TaskId) -> bool {
        self.ids.contains(task_id)
    }

    /// Immediate parent of the visited task.
    pub fn parent(&self) -> Option<&TaskId> {
        self.ids.last()
    }

    /// Ancestor IDs, root first.
    pub fn ids(&self) -> impl Iterator<Item = &TaskId> {
        self.ids.iter()
    }

    fn push(&mut self, task_id: TaskId) {
        self.ids.push(task_id);
    }

    fn pop(&mut self) {
        self.ids.pop();
    }
}

/// Children of every task, in input order.
struct ChildIndex<'a> {
    children: HashMap<&'a TaskId, Vec<&'a Task>>,
}

impl<'a> ChildIndex<'a> {
    fn build(tasks: &'a [Task]) -> Self {
        let mut children: HashMap<&TaskId, Vec<&Task>> = HashMap::new();
        for task in tasks {
            children.entry(&task.parent_id).or_default().push(task);
        }
        Self { children }
    }

    fn children_of(&self, task_id: &TaskId) -> &[&'a Task] {
        self.children
            .get(task_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Walks the subtree below `root`, calling `visit` for every task.
///
/// With `include_root`, `root` itself is visited first with an empty chain.
/// Children of `root` always see `root` in their chain.
///
/// Visits made before a hierarchy fault stand; the fault is returned
/// instead of descending further.
pub fn walk<F>(tasks: &[Task], root: &Task, include_root: bool, mut visit: F) -> Result<(), TreeError>
where
    F: FnMut(&Task, &AncestorChain),
{
    let index = ChildIndex::build(tasks);
    let mut chain = AncestorChain::default();

    if include_root {
        visit(root, &chain);
    }

    tracing::debug!(root = %root.task_id, include_root, "walking task tree");
    descend(&index, root, &mut chain, &mut visit)
}

fn descend<F>(
    index: &ChildIndex<'_>,
    parent: &Task,
    chain: &mut AncestorChain,
    visit: &mut F,
) -> Result<(), TreeError>
where
    F: FnMut(&Task, &AncestorChain),
{
    let children = index.children_of(&parent.task_id);
    if children.is_empty() {
        return Ok(());
    }
    if chain.depth() >= MAX_WALK_DEPTH {
        return Err(TreeError::DepthLimitExceeded {
            limit: MAX_WALK_DEPTH,
        });
    }

    chain.push(parent.task_id.clone());
    let result = children.iter().copied().try_for_each(|child| {
        if chain.contains(&child.task_id) {
            return Err(TreeError::CyclicHierarchy {
                task_id: child.task_id.clone(),
            });
        }
        visit(child, chain);
        descend(index, child, &mut *chain, &mut *visit)
    });
    chain.pop();
    result
}

/// IDs of `root` and every task below it, in walk order.
pub fn descendant_ids(tasks: &[Task], root: &Task) -> Result<Vec<TaskId>, TreeError> {
    let mut ids = Vec::new();
    walk(tasks, root, true, |task, _| ids.push(task.task_id.clone()))?;
    Ok(ids)
}
