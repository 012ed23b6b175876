//! Agentflow: run multi-agent development workflows.
//!
//! A workflow is an ordered list of steps, each handled by an agent
//! (plan, code, test, review, or a host-defined type). Steps share a
//! context, may depend on earlier steps, and their outcomes are collected
//! into a [`workflow::WorkflowResult`].
//!
//! ```no_run
//! use agentflow::config::Config;
//! use agentflow::workflow::WorkflowOrchestrator;
//!
//! let config = Config::load_or_default("agentflow.yaml")?;
//! let orchestrator = WorkflowOrchestrator::from_config(&config);
//! let result = orchestrator.execute_workflow("code-review", "Review auth module", None, false)?;
//! println!("{}", result.summary());
//! # Ok::<(), agentflow::error::FlowError>(())
//! ```

pub mod agent;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod exit_codes;
pub mod workflow;

#[cfg(test)]
mod test_support;
