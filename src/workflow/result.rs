//! Aggregate outcome of a workflow run.

use crate::agent::TaskResult;
use crate::context::ContextMap;
use crate::workflow::SkippedStep;
use serde_json::{Value, json};

/// Everything that happened during one workflow execution.
///
/// `results` holds one entry per attempted step in execution order. Steps
/// skipped for unmet dependencies are absent from `results` but listed in
/// `skipped_steps` and counted in `total_steps`.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    /// True iff at least one step ran and every step that ran succeeded.
    pub success: bool,

    /// Per-step results, in execution order.
    pub results: Vec<TaskResult>,

    /// Workflow name (`custom` for ad-hoc pipelines).
    pub workflow_name: String,

    /// The overall objective.
    pub task: String,

    /// Number of steps in the resolved definition, skipped ones included.
    pub total_steps: usize,

    /// Number of results that succeeded.
    pub completed_steps: usize,

    /// Wall-clock seconds for the whole run.
    pub execution_time: f64,

    /// One-line failure summary (`Failed steps: N`).
    pub error: Option<String>,

    /// Context as it stood before the first step.
    pub initial_context: ContextMap,

    /// Context after the last step.
    pub final_context: ContextMap,

    /// Steps left out because their dependencies did not succeed.
    pub skipped_steps: Vec<SkippedStep>,

    /// Whether a critical failure stopped the run early.
    pub aborted: bool,
}

/// Raw material for a [`WorkflowResult`]; the derived counts are computed
/// by [`WorkflowResult::from_run`].
#[derive(Debug, Clone, Default)]
pub(crate) struct RunRecord {
    pub workflow_name: String,
    pub task: String,
    pub total_steps: usize,
    pub results: Vec<TaskResult>,
    pub skipped_steps: Vec<SkippedStep>,
    pub aborted: bool,
    pub execution_time: f64,
    pub initial_context: ContextMap,
    pub final_context: ContextMap,
}

impl WorkflowResult {
    pub(crate) fn from_run(run: RunRecord) -> Self {
        let completed_steps = run.results.iter().filter(|r| r.success).count();
        let failed = run.results.len() - completed_steps;
        let success = failed == 0 && !run.results.is_empty();
        let error = if success {
            None
        } else {
            Some(format!("Failed steps: {}", failed))
        };

        Self {
            success,
            results: run.results,
            workflow_name: run.workflow_name,
            task: run.task,
            total_steps: run.total_steps,
            completed_steps,
            execution_time: run.execution_time.max(0.0),
            error,
            initial_context: run.initial_context,
            final_context: run.final_context,
            skipped_steps: run.skipped_steps,
            aborted: run.aborted,
        }
    }

    /// Number of attempted steps that failed.
    pub fn failed_steps(&self) -> usize {
        self.results.len() - self.completed_steps
    }

    /// Execution time as `1.23 seconds` (at least one second) or `456ms`.
    pub fn execution_time_formatted(&self) -> String {
        format_duration(self.execution_time)
    }

    /// Deterministic structural serialization with stable field names.
    pub fn to_dict(&self) -> Value {
        json!({
            "success": self.success,
            "workflow_name": self.workflow_name,
            "task": self.task,
            "steps": self.results.iter().map(TaskResult::to_dict).collect::<Vec<_>>(),
            "total_steps": self.total_steps,
            "completed_steps": self.completed_steps,
            "failed_steps": self.failed_steps(),
            "total_execution_time": self.execution_time,
            "execution_time_formatted": self.execution_time_formatted(),
            "error": self.error,
            "aborted": self.aborted,
            "skipped_steps": self.skipped_steps,
            "initial_context": Value::Object(self.initial_context.clone()),
            "final_context": Value::Object(self.final_context.clone()),
        })
    }
}

/// Format seconds for reports.
pub fn format_duration(seconds: f64) -> String {
    if seconds >= 1.0 {
        format!("{:.2} seconds", seconds)
    } else {
        format!("{}ms", (seconds * 1000.0).round() as u64)
    }
}
