//! Exit code constants for the agentflow CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, invalid config, unknown workflow or agent type)
//! - 2: Workflow ran but did not succeed
//! - 3: Agent failure outside a workflow step

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, invalid configuration, unknown workflow or agent type.
pub const USER_ERROR: i32 = 1;

/// The workflow ran to completion (or aborted) with failed steps.
pub const WORKFLOW_FAILURE: i32 = 2;

/// An agent collaborator failed before it could produce a result.
pub const AGENT_FAILURE: i32 = 3;
