//! Workflow step records.

use crate::agent::{AgentType, TaskResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One node of a workflow: which agent runs, what it needs, and how the
/// context is renamed for it.
///
/// Built by the definition resolver, mutated once by the orchestrator when
/// the step runs, then discarded after its result is copied into the
/// [`WorkflowResult`](crate::workflow::WorkflowResult).
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowStep {
    /// Agent that executes this step.
    pub agent_type: AgentType,

    /// Human-readable description.
    pub description: String,

    /// Agent types that must have succeeded earlier in the run.
    pub depends_on: BTreeSet<AgentType>,

    /// Renames applied to the step's copy of the context (`src -> dst`).
    pub context_mapping: BTreeMap<String, String>,

    /// Whether a failure of this step aborts the workflow.
    pub critical: bool,

    /// Outcome, once the step has run.
    pub result: Option<TaskResult>,

    /// Set when the agent returned a result without raising.
    pub completed: bool,
}

impl WorkflowStep {
    /// Create a step with no dependencies and no context mapping.
    ///
    /// Criticality follows the agent type: only `plan` steps are critical.
    pub fn new(agent_type: AgentType, description: impl Into<String>) -> Self {
        let critical = agent_type.is_critical();
        Self {
            agent_type,
            description: description.into(),
            depends_on: BTreeSet::new(),
            context_mapping: BTreeMap::new(),
            critical,
            result: None,
            completed: false,
        }
    }

    /// Add a prerequisite agent type.
    pub fn depends_on(mut self, agent_type: AgentType) -> Self {
        self.depends_on.insert(agent_type);
        self
    }

    /// Expose context key `src` to this step's agent as `dst`.
    pub fn map_context(mut self, src: impl Into<String>, dst: impl Into<String>) -> Self {
        self.context_mapping.insert(src.into(), dst.into());
        self
    }

    /// Dependencies that are not in `succeeded`.
    pub fn unmet_dependencies(&self, succeeded: &BTreeSet<AgentType>) -> Vec<AgentType> {
        self.depends_on
            .iter()
            .filter(|dep| !succeeded.contains(*dep))
            .cloned()
            .collect()
    }

    /// Whether every dependency is in `succeeded`.
    pub fn dependencies_met(&self, succeeded: &BTreeSet<AgentType>) -> bool {
        self.depends_on.iter().all(|dep| succeeded.contains(dep))
    }

    /// Store the step outcome. `completed` is false when the result was
    /// synthesized from an agent fault.
    pub(crate) fn record(&mut self, result: TaskResult, completed: bool) {
        self.result = Some(result);
        self.completed = completed;
    }
}

/// A step left out of a run because its dependencies did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedStep {
    /// Agent type of the skipped step.
    pub agent_type: AgentType,

    /// Description of the skipped step.
    pub description: String,

    /// Dependencies that had not succeeded.
    pub unmet_dependencies: Vec<AgentType>,
}

impl SkippedStep {
    pub(crate) fn from_step(step: &WorkflowStep, unmet_dependencies: Vec<AgentType>) -> Self {
        Self {
            agent_type: step.agent_type.clone(),
            description: step.description.clone(),
            unmet_dependencies,
        }
    }
}
