//! Command line interface for batch_imaging.
//!
//! Parses arguments, loads preferences and dispatches to the command
//! executors, which report through [`OutputManager`].

mod args;
pub mod commands;
mod output;

pub use args::{Args, Command, PrefsAction, RuntimeConfig, VerbosityLevel};
pub use commands::execute_command;
pub use output::OutputManager;

use crate::error::Result;

/// Main CLI entry point
pub async fn run(args: Args) -> Result<i32> {
    execute_command(args).await
}

/// Parse arguments without executing
pub fn parse_args() -> Args {
    Args::parse_args()
}
