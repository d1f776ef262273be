//! Command implementations.

pub mod projects;
pub mod summary;
pub mod task;
pub mod tree;
pub mod util;
