//! Workflow definition resolution.
//!
//! Turns a workflow name into an ordered list of [`WorkflowStep`]s. A
//! workflow configured by the user takes priority over a built-in workflow of
//! the same name; configured steps carry no dependencies or context mapping.

use crate::agent::AgentType;
use crate::config::Config;
use crate::workflow::WorkflowStep;
use serde::Serialize;

/// Names of the built-in workflows.
pub const BUILTIN_WORKFLOWS: [&str; 4] = ["feature-dev", "bug-fix", "code-review", "refactor"];

/// Source of user-configured workflows.
pub trait WorkflowSource {
    /// Ordered agent types of `workflow_name`, or empty if not configured.
    fn workflow_steps(&self, workflow_name: &str) -> Vec<AgentType>;

    /// Names of all configured workflows.
    fn workflow_names(&self) -> Vec<String> {
        Vec::new()
    }
}

impl WorkflowSource for Config {
    fn workflow_steps(&self, workflow_name: &str) -> Vec<AgentType> {
        Config::workflow_steps(self, workflow_name)
    }

    fn workflow_names(&self) -> Vec<String> {
        self.workflows.keys().cloned().collect()
    }
}

/// A source with no configured workflows; only built-ins resolve.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinOnly;

impl WorkflowSource for BuiltinOnly {
    fn workflow_steps(&self, _workflow_name: &str) -> Vec<AgentType> {
        Vec::new()
    }
}

/// Where a workflow definition came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowOrigin {
    Builtin,
    Configured,
}

/// A named workflow and its step order, for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowDefinition {
    pub name: String,
    pub origin: WorkflowOrigin,
    pub steps: Vec<AgentType>,
}

/// Resolve `workflow_name` into steps.
///
/// Returns an empty list when the name is neither configured nor built in;
/// the orchestrator turns that into `UnknownWorkflow`.
pub fn resolve_workflow(workflow_name: &str, source: &dyn WorkflowSource) -> Vec<WorkflowStep> {
    let configured = source.workflow_steps(workflow_name);
    if !configured.is_empty() {
        return configured
            .into_iter()
            .map(|agent_type| {
                let description = format!("Execute {} agent", agent_type);
                WorkflowStep::new(agent_type, description)
            })
            .collect();
    }

    builtin_workflow(workflow_name)
}

/// Steps of a built-in workflow, or empty for other names.
pub fn builtin_workflow(workflow_name: &str) -> Vec<WorkflowStep> {
    use AgentType::{Code, Plan, Review, Test};

    match workflow_name {
        "feature-dev" => vec![
            WorkflowStep::new(Plan, "Create implementation plan"),
            WorkflowStep::new(Code, "Generate code implementation")
                .depends_on(Plan)
                .map_context("plan_output", "implementation_plan"),
            WorkflowStep::new(Test, "Create and run tests")
                .depends_on(Code)
                .map_context("code_output", "code_to_test"),
            WorkflowStep::new(Review, "Review implementation")
                .depends_on(Code)
                .map_context("code_output", "code_to_review"),
        ],
        "bug-fix" => vec![
            WorkflowStep::new(Plan, "Analyze bug and create fix plan"),
            WorkflowStep::new(Code, "Implement bug fix")
                .depends_on(Plan)
                .map_context("plan_output", "fix_plan"),
            WorkflowStep::new(Test, "Test bug fix")
                .depends_on(Code)
                .map_context("code_output", "fixed_code"),
        ],
        "code-review" => vec![WorkflowStep::new(Review, "Comprehensive code review")],
        "refactor" => vec![
            WorkflowStep::new(Plan, "Create refactoring plan"),
            WorkflowStep::new(Code, "Implement refactoring")
                .depends_on(Plan)
                .map_context("plan_output", "refactor_plan"),
            WorkflowStep::new(Test, "Test refactored code")
                .depends_on(Code)
                .map_context("code_output", "refactored_code"),
            WorkflowStep::new(Review, "Review refactored implementation")
                .depends_on(Code)
                .map_context("code_output", "code_to_review"),
        ],
        _ => Vec::new(),
    }
}

/// Every resolvable workflow: built-ins first (unless overridden by
/// configuration), then configured-only names, each group in name order.
pub fn list_workflows(source: &dyn WorkflowSource) -> Vec<WorkflowDefinition> {
    let configured = source.workflow_names();
    let mut definitions = Vec::new();

    let mut builtin: Vec<&str> = BUILTIN_WORKFLOWS.to_vec();
    builtin.sort_unstable();
    for name in builtin {
        if configured.iter().any(|c| c == name) {
            continue;
        }
        definitions.push(WorkflowDefinition {
            name: name.to_string(),
            origin: WorkflowOrigin::Builtin,
            steps: builtin_workflow(name)
                .into_iter()
                .map(|step| step.agent_type)
                .collect(),
        });
    }

    let mut configured = configured;
    configured.sort();
    for name in configured {
        let steps = source.workflow_steps(&name);
        definitions.push(WorkflowDefinition {
            name,
            origin: WorkflowOrigin::Configured,
            steps,
        });
    }

    definitions
}

/// Task text handed to a named-workflow step's agent.
///
/// Built-in agent types get a fixed phrasing; other types fall back to
/// `"{description}: {task}"`.
pub fn customize_task(step: &WorkflowStep, main_task: &str) -> String {
    match step.agent_type {
        AgentType::Plan => format!("Create a detailed plan for: {}", main_task),
        AgentType::Code => format!("Implement the following: {}", main_task),
        AgentType::Test => format!("Create comprehensive tests for: {}", main_task),
        AgentType::Review => format!("Review the implementation of: {}", main_task),
        AgentType::Other(_) => format!("{}: {}", step.description, main_task),
    }
}
