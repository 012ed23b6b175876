//! Shared workflow context.
//!
//! One [`WorkflowContext`] lives for the duration of a single workflow
//! execution. Steps read any key; after a successful step the orchestrator
//! writes the well-known keys `{agent}_output` and `{agent}_result` and merges
//! the public keys the agent echoed back.
//!
//! Well-known keys:
//! - `main_task`: the overall objective
//! - `{agent}_output`: text output of a successful step
//! - `{agent}_result`: serialized [`TaskResult`] of a successful step
//! - workflow-specific keys produced by a step's context mapping
//!
//! Keys starting with `_` are private to the agent that produced them and are
//! never merged back.

use crate::agent::{AgentType, TaskResult};
use serde_json::Value;
use std::collections::BTreeMap;

/// Ordered string-keyed map of opaque values.
pub type ContextMap = serde_json::Map<String, Value>;

/// Key holding the overall workflow objective.
pub const MAIN_TASK_KEY: &str = "main_task";

/// Prefix marking agent-private context keys.
pub const PRIVATE_KEY_PREFIX: char = '_';

/// Context key holding the text output of an agent type.
pub fn output_key(agent_type: &AgentType) -> String {
    format!("{}_output", agent_type)
}

/// Context key holding the serialized result of an agent type.
pub fn result_key(agent_type: &AgentType) -> String {
    format!("{}_result", agent_type)
}

/// The mutable context of one workflow execution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowContext {
    values: ContextMap,
}

impl WorkflowContext {
    /// Start a context from caller-supplied values plus the main task.
    ///
    /// `main_task` always reflects `task`, even if the initial values carried
    /// a different one.
    pub fn new(initial: ContextMap, task: &str) -> Self {
        let mut values = initial;
        values.insert(MAIN_TASK_KEY.to_string(), Value::String(task.to_string()));
        Self { values }
    }

    /// Look up a value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Insert or overwrite a value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    /// The overall workflow objective.
    pub fn main_task(&self) -> Option<&str> {
        self.values.get(MAIN_TASK_KEY).and_then(Value::as_str)
    }

    /// Text output recorded by a previously successful step of `agent_type`.
    pub fn output_of(&self, agent_type: &AgentType) -> Option<&str> {
        self.values
            .get(&output_key(agent_type))
            .and_then(Value::as_str)
    }

    /// Copy of the context with `src -> dst` renames applied.
    ///
    /// For every mapping whose source key exists, the copy gets `dst` set to
    /// that value. The working context itself is untouched.
    pub fn remapped(&self, mapping: &BTreeMap<String, String>) -> ContextMap {
        let mut step_context = self.values.clone();
        for (src, dst) in mapping {
            if let Some(value) = self.values.get(src) {
                step_context.insert(dst.clone(), value.clone());
            }
        }
        step_context
    }

    /// Record the outcome of a successful step.
    ///
    /// Failed results leave the context unchanged.
    pub fn record_success(&mut self, agent_type: &AgentType, result: &TaskResult) {
        if !result.success {
            return;
        }

        self.values.insert(
            output_key(agent_type),
            Value::String(result.output.clone()),
        );
        self.values.insert(result_key(agent_type), result.to_dict());

        for (key, value) in &result.context {
            if !key.starts_with(PRIVATE_KEY_PREFIX) {
                self.values.insert(key.clone(), value.clone());
            }
        }
    }

    /// Snapshot of the current values.
    pub fn snapshot(&self) -> ContextMap {
        self.values.clone()
    }

    /// Borrow the underlying map.
    pub fn as_map(&self) -> &ContextMap {
        &self.values
    }

    /// Consume the context, returning its values.
    pub fn into_map(self) -> ContextMap {
        self.values
    }
}
