//! Command implementations for agentflow.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. Handlers return the process exit code on success so a
//! workflow that ran but failed can exit non-zero without being an error.

mod list;
mod run;

use crate::cli::{Cli, Command};
use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::error::Result;

/// Dispatch a command to its implementation.
pub fn dispatch(cli: Cli) -> Result<i32> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(DEFAULT_CONFIG_FILE)?,
    };

    match cli.command {
        Command::Run(args) => run::cmd_run(&config, args),
        Command::Custom(args) => run::cmd_custom(&config, args),
        Command::Workflows => list::cmd_workflows(&config),
        Command::Agents => list::cmd_agents(&config),
    }
}
