//! TimeCamp CLI library.
//!
//! This crate provides the `tc` command-line interface: project listings,
//! task trees and time summaries fetched from the TimeCamp API.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, ProjectsArgs, RangeArgs, SummaryArgs, TaskArgs, TreeArgs};
pub use config::Config;
