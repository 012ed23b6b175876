//! Agent collaborator layer.
//!
//! The orchestrator only ever sees the [`Agent`] trait and an
//! [`AgentRegistry`] mapping agent-type tags to factories:
//!
//! - **Kind**: the [`AgentType`] tag (plan/code/test/review, extensible)
//! - **Result**: [`TaskResult`], the outcome of one invocation
//! - **Registry**: tag-to-factory map supplied by the host application
//! - **Command**: [`CommandAgent`], an agent backed by an external command
//! - **Template**: `{variable}` substitution for prompts and commands

pub mod command;
mod kind;
mod registry;
mod task_result;
pub mod template;

use crate::context::ContextMap;

// Re-export public API
pub use command::{
    AgentDefaults, AgentProfile, CommandAgent, DEFAULT_PROMPT_TEMPLATE, DEFAULT_TIMEOUT_SECONDS,
};
pub use kind::AgentType;
pub use registry::{AgentFactory, AgentRegistry};
pub use task_result::TaskResult;

/// An agent able to carry out one task.
///
/// Implementations report ordinary failures as a `TaskResult` with
/// `success == false`. Returning `Err` (or panicking) is tolerated: the
/// orchestrator converts it into a failed result for the step.
///
/// A successful result should carry no error and a failed one should say
/// why. At the step boundary the orchestrator clears the error of a
/// successful result and fills in a generic error for a failure that has
/// none.
pub trait Agent {
    /// Carry out `task` with the given context.
    ///
    /// `stream` asks the agent to surface output incrementally; it has no
    /// effect on orchestration.
    fn execute(&self, task: &str, context: &ContextMap, stream: bool) -> anyhow::Result<TaskResult>;
}
