//! CLI argument parsing for agentflow.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Agentflow: run multi-agent development workflows.
///
/// A workflow is an ordered pipeline of agents (plan, code, test, review)
/// sharing one context. Built-in workflows: feature-dev, bug-fix,
/// code-review, refactor. More can be defined in agentflow.yaml.
#[derive(Parser, Debug)]
#[command(name = "agentflow")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration file (default: ./agentflow.yaml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for agentflow.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a named workflow.
    ///
    /// Resolves the workflow from the configuration or the built-ins and
    /// executes its steps in order.
    Run(RunArgs),

    /// Run an ad-hoc pipeline of agent types.
    ///
    /// Each step depends on the previous one and receives the task verbatim.
    Custom(CustomArgs),

    /// List available workflows.
    Workflows,

    /// List configured agent profiles.
    Agents,
}

/// Arguments for the `run` command.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Workflow name (e.g., feature-dev).
    pub workflow: String,

    /// The overall objective handed to the workflow.
    pub task: String,

    #[command(flatten)]
    pub execution: ExecutionArgs,
}

/// Arguments for the `custom` command.
#[derive(Parser, Debug)]
pub struct CustomArgs {
    /// The overall objective handed to every step.
    pub task: String,

    /// Agent types to run, in order.
    #[arg(long, value_delimiter = ',', required = true)]
    pub steps: Vec<String>,

    #[command(flatten)]
    pub execution: ExecutionArgs,
}

/// Options shared by `run` and `custom`.
#[derive(Args, Debug, Default)]
pub struct ExecutionArgs {
    /// File or directory to seed the workflow context with.
    #[arg(long)]
    pub context: Option<PathBuf>,

    /// Extra context values as key=value (repeatable).
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// Directory to write the summary and step outputs to.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Ask agents to stream their output.
    #[arg(long)]
    pub stream: bool,

    /// Print the result as JSON instead of a markdown summary.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
