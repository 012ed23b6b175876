//! Error types for agentflow.
//!
//! Only precondition failures travel as errors. Per-step agent failures are
//! recovered inside the orchestrator and reported as data on the result.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for agentflow operations.
#[derive(Error, Debug)]
pub enum FlowError {
    /// The workflow name matched neither a built-in nor a configured workflow.
    #[error("Unknown workflow: {0}")]
    UnknownWorkflow(String),

    /// No agent factory is registered for the tag.
    #[error("Unknown agent type: {0}")]
    UnknownAgentType(String),

    /// Configuration could not be read, parsed or validated.
    #[error("{0}")]
    ConfigError(String),

    /// User provided invalid arguments, or a CLI-level I/O operation failed.
    #[error("{0}")]
    UserError(String),

    /// An agent collaborator failed outside a workflow step.
    #[error("Agent failed: {0}")]
    AgentError(String),
}

impl FlowError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            FlowError::UnknownWorkflow(_) => exit_codes::USER_ERROR,
            FlowError::UnknownAgentType(_) => exit_codes::USER_ERROR,
            FlowError::ConfigError(_) => exit_codes::USER_ERROR,
            FlowError::UserError(_) => exit_codes::USER_ERROR,
            FlowError::AgentError(_) => exit_codes::AGENT_FAILURE,
        }
    }
}

/// Result type alias for agentflow operations.
pub type Result<T> = std::result::Result<T, FlowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_workflow_names_the_workflow() {
        let err = FlowError::UnknownWorkflow("nonexistent".to_string());
        assert_eq!(err.to_string(), "Unknown workflow: nonexistent");
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn unknown_agent_type_names_the_tag() {
        let err = FlowError::UnknownAgentType("bogus".to_string());
        assert_eq!(err.to_string(), "Unknown agent type: bogus");
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn agent_error_has_its_own_exit_code() {
        let err = FlowError::AgentError("spawn failed".to_string());
        assert_eq!(err.exit_code(), exit_codes::AGENT_FAILURE);
        assert_eq!(err.to_string(), "Agent failed: spawn failed");
    }

    #[test]
    fn config_and_user_errors_are_passthrough_messages() {
        let err = FlowError::ConfigError("bad yaml".to_string());
        assert_eq!(err.to_string(), "bad yaml");
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);

        let err = FlowError::UserError("bad arg".to_string());
        assert_eq!(err.to_string(), "bad arg");
    }
}
