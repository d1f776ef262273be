//! Core domain logic for the TimeCamp client.
//!
//! This crate contains the fundamental types and logic for:
//! - Tree walking: rebuilding the task hierarchy from parent pointers
//! - Aggregation: rolling recorded time up through every ancestor
//! - Project views: listing and sorting top-level tasks
//!
//! Everything here is synchronous and works on collections the caller has
//! already fetched.

pub mod entry;
pub mod projects;
pub mod summary;
pub mod task;
pub mod totals;
pub mod tree;
pub mod types;

pub use entry::{DATE_FORMAT, DateParseError, DurationParseError, TimeEntry};
pub use projects::{ProjectNode, TaskNotFound, project_list, project_tree, task_by_id};
pub use summary::{entries_for_task, summarize_subtree, summarize_task};
pub use task::Task;
pub use totals::{TaskTotals, Totals};
pub use tree::{AncestorChain, MAX_WALK_DEPTH, TreeError, descendant_ids, walk};
pub use types::{NO_PARENT, TaskId, ValidationError};
