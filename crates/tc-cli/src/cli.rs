//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// TimeCamp project browser and time summaries.
///
/// Fetches tasks and time entries from the TimeCamp API and rolls recorded
/// time up through the project hierarchy.
#[derive(Debug, Parser)]
#[command(name = "tc", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List projects and their direct tasks, sorted by name.
    Projects(ProjectsArgs),

    /// Print the task hierarchy below a task.
    Tree(TreeArgs),

    /// Summarize recorded time for a task and everything below it.
    Summary(SummaryArgs),

    /// Summarize recorded time booked directly on a single task.
    Task(TaskArgs),
}

#[derive(Debug, Args)]
pub struct ProjectsArgs {
    /// Only include active (non-archived) tasks.
    #[arg(long, conflicts_with = "archived")]
    pub active: bool,

    /// Only include archived tasks.
    #[arg(long)]
    pub archived: bool,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct TreeArgs {
    /// ID of the task to start from.
    pub root: String,

    /// Print the starting task itself.
    #[arg(long)]
    pub include_root: bool,
}

/// Date range shared by the time summaries.
#[derive(Debug, Clone, Args)]
pub struct RangeArgs {
    /// First day to include: YYYY-MM-DD, "today", "yesterday" or "N days ago".
    /// Defaults to the first day of the current month.
    #[arg(long)]
    pub from: Option<String>,

    /// Last day to include, same formats as --from. Defaults to today.
    #[arg(long)]
    pub to: Option<String>,
}

#[derive(Debug, Args)]
pub struct SummaryArgs {
    /// ID of the task or project to summarize.
    pub root: String,

    #[command(flatten)]
    pub range: RangeArgs,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct TaskArgs {
    /// ID of the task to summarize.
    pub id: String,

    #[command(flatten)]
    pub range: RangeArgs,
}
