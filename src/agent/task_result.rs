//! Outcome of a single agent invocation.

use crate::agent::AgentType;
use crate::context::ContextMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The result of one agent invocation.
///
/// A successful result never carries an error. A failed result carries an
/// error message, or at least has empty output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResult {
    /// Whether the agent completed its task.
    pub success: bool,

    /// Text produced by the agent.
    pub output: String,

    /// Which agent produced this result.
    pub agent_type: AgentType,

    /// The task text the agent was given.
    pub task: String,

    /// Context the agent echoes back; public keys are merged into the
    /// workflow context on success.
    #[serde(default)]
    pub context: ContextMap,

    /// Failure description.
    pub error: Option<String>,

    /// Wall-clock seconds spent in the invocation.
    #[serde(default)]
    pub execution_time: f64,
}

impl TaskResult {
    /// Create a successful result.
    pub fn success(
        agent_type: AgentType,
        task: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Self {
            success: true,
            output: output.into(),
            agent_type,
            task: task.into(),
            context: ContextMap::new(),
            error: None,
            execution_time: 0.0,
        }
    }

    /// Create a failed result with empty output.
    pub fn failure(agent_type: AgentType, task: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            output: String::new(),
            agent_type,
            task: task.into(),
            context: ContextMap::new(),
            error: Some(error.into()),
            execution_time: 0.0,
        }
    }

    /// Attach context echoed back by the agent.
    pub fn with_context(mut self, context: ContextMap) -> Self {
        self.context = context;
        self
    }

    /// Attach partial output to a result (e.g. the stdout of a failed command).
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = output.into();
        self
    }

    /// Record the measured execution time.
    pub fn with_execution_time(mut self, seconds: f64) -> Self {
        self.execution_time = seconds.max(0.0);
        self
    }

    /// Structural serialization with stable field names.
    pub fn to_dict(&self) -> Value {
        serde_json::json!({
            "success": self.success,
            "output": self.output,
            "agent_type": self.agent_type.as_str(),
            "task": self.task,
            "context": Value::Object(self.context.clone()),
            "error": self.error,
            "execution_time": self.execution_time,
        })
    }
}
