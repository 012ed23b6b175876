//! Sequential workflow execution.

use crate::agent::{AgentRegistry, AgentType, TaskResult};
use crate::config::Config;
use crate::context::{ContextMap, WorkflowContext};
use crate::error::{FlowError, Result};
use crate::events::{Event, EventAction, EventLog};
use crate::workflow::result::RunRecord;
use crate::workflow::{
    BuiltinOnly, SkippedStep, WorkflowResult, WorkflowSource, WorkflowStep, customize_task,
    resolve_workflow,
};
use serde_json::json;
use std::collections::BTreeSet;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Workflow name reported for ad-hoc pipelines.
pub const CUSTOM_WORKFLOW_NAME: &str = "custom";

/// Runs workflows step by step against a registry of agents.
///
/// The orchestrator holds no per-run state: every execution builds its own
/// context, so consecutive runs never see each other's values.
pub struct WorkflowOrchestrator {
    registry: AgentRegistry,
    source: Box<dyn WorkflowSource>,
    event_log: Option<EventLog>,
}

/// Error recorded when an agent reports failure without saying why.
const UNREPORTED_FAILURE: &str = "agent reported failure without an error message";

/// How the task text handed to each agent is derived.
#[derive(Debug, Clone, Copy)]
enum TaskText {
    /// Per-agent-type phrasing (named workflows).
    Customized,
    /// The main task verbatim (custom pipelines).
    Plain,
}

impl WorkflowOrchestrator {
    /// Orchestrator over the built-in workflows only.
    pub fn new(registry: AgentRegistry) -> Self {
        Self {
            registry,
            source: Box::new(BuiltinOnly),
            event_log: None,
        }
    }

    /// Orchestrator wired from a loaded configuration: command agents,
    /// configured workflows, and the optional event log.
    pub fn from_config(config: &Config) -> Self {
        let mut orchestrator =
            Self::new(config.agent_registry()).with_source(Box::new(config.clone()));
        if let Some(path) = &config.event_log {
            orchestrator = orchestrator.with_event_log(EventLog::new(path));
        }
        orchestrator
    }

    /// Resolve workflow names against `source` instead of built-ins only.
    pub fn with_source(mut self, source: Box<dyn WorkflowSource>) -> Self {
        self.source = source;
        self
    }

    /// Append run events to `log`.
    pub fn with_event_log(mut self, log: EventLog) -> Self {
        self.event_log = Some(log);
        self
    }

    /// The agent registry.
    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    /// The workflow source used for name resolution.
    pub fn source(&self) -> &dyn WorkflowSource {
        self.source.as_ref()
    }

    /// Run a named workflow.
    ///
    /// Fails with [`FlowError::UnknownWorkflow`] if the name resolves to no
    /// steps. Agent failures never surface as `Err`; they are reported in
    /// the returned result.
    pub fn execute_workflow(
        &self,
        workflow_name: &str,
        task: &str,
        initial_context: Option<ContextMap>,
        stream: bool,
    ) -> Result<WorkflowResult> {
        let steps = resolve_workflow(workflow_name, self.source.as_ref());
        if steps.is_empty() {
            return Err(FlowError::UnknownWorkflow(workflow_name.to_string()));
        }

        Ok(self.run(
            workflow_name,
            steps,
            task,
            initial_context.unwrap_or_default(),
            stream,
            TaskText::Customized,
        ))
    }

    /// Run an ad-hoc pipeline of agent types.
    ///
    /// Each step depends on the one before it, and every agent receives the
    /// task text verbatim. All agent types are checked against the registry
    /// before anything runs. An empty list yields an unsuccessful result
    /// with no steps.
    pub fn create_custom_workflow(
        &self,
        agent_types: &[AgentType],
        task: &str,
        initial_context: Option<ContextMap>,
        stream: bool,
    ) -> Result<WorkflowResult> {
        for agent_type in agent_types {
            self.registry.ensure_registered(agent_type)?;
        }

        let mut steps: Vec<WorkflowStep> = Vec::with_capacity(agent_types.len());
        for agent_type in agent_types {
            let mut step =
                WorkflowStep::new(agent_type.clone(), format!("Execute {} agent", agent_type));
            if let Some(previous) = steps.last() {
                step = step.depends_on(previous.agent_type.clone());
            }
            steps.push(step);
        }

        Ok(self.run(
            CUSTOM_WORKFLOW_NAME,
            steps,
            task,
            initial_context.unwrap_or_default(),
            stream,
            TaskText::Plain,
        ))
    }

    fn run(
        &self,
        workflow_name: &str,
        mut steps: Vec<WorkflowStep>,
        task: &str,
        initial: ContextMap,
        stream: bool,
        task_text: TaskText,
    ) -> WorkflowResult {
        let started = Instant::now();
        let mut context = WorkflowContext::new(initial, task);
        let initial_context = context.snapshot();
        let total_steps = steps.len();

        info!(workflow = workflow_name, steps = total_steps, "starting workflow");
        self.emit(
            Event::new(EventAction::WorkflowStart)
                .with_workflow(workflow_name)
                .with_details(json!({
                    "task": task,
                    "steps": steps.iter().map(|s| s.agent_type.as_str()).collect::<Vec<_>>(),
                })),
        );

        let mut succeeded: BTreeSet<AgentType> = BTreeSet::new();
        let mut results: Vec<TaskResult> = Vec::new();
        let mut skipped_steps: Vec<SkippedStep> = Vec::new();
        let mut aborted = false;

        for (index, step) in steps.iter_mut().enumerate() {
            let unmet = step.unmet_dependencies(&succeeded);
            if !unmet.is_empty() {
                info!(
                    workflow = workflow_name,
                    agent_type = %step.agent_type,
                    "skipping step with unmet dependencies"
                );
                self.emit(
                    Event::new(EventAction::StepSkipped)
                        .with_workflow(workflow_name)
                        .with_details(json!({
                            "step": index + 1,
                            "agent_type": step.agent_type,
                            "unmet_dependencies": unmet,
                        })),
                );
                skipped_steps.push(SkippedStep::from_step(step, unmet));
                continue;
            }

            let step_task = match task_text {
                TaskText::Customized => customize_task(step, task),
                TaskText::Plain => task.to_string(),
            };
            let step_context = context.remapped(&step.context_mapping);

            debug!(
                workflow = workflow_name,
                agent_type = %step.agent_type,
                step = index + 1,
                "executing step"
            );
            let (result, completed) = self.invoke(&step.agent_type, &step_task, &step_context, stream);

            info!(
                workflow = workflow_name,
                agent_type = %step.agent_type,
                step = index + 1,
                success = result.success,
                duration_ms = (result.execution_time * 1000.0).round() as u64,
                "step complete"
            );

            if result.success {
                context.record_success(&step.agent_type, &result);
                succeeded.insert(step.agent_type.clone());
            } else {
                warn!(
                    workflow = workflow_name,
                    agent_type = %step.agent_type,
                    error = result.error.as_deref().unwrap_or(""),
                    "step failed"
                );
            }

            self.emit(
                Event::new(EventAction::StepComplete)
                    .with_workflow(workflow_name)
                    .with_details(json!({
                        "step": index + 1,
                        "agent_type": step.agent_type,
                        "success": result.success,
                        "execution_time": result.execution_time,
                        "error": result.error,
                    })),
            );

            let abort = !result.success && step.critical;
            results.push(result.clone());
            step.record(result, completed);

            if abort {
                warn!(
                    workflow = workflow_name,
                    agent_type = %step.agent_type,
                    "critical step failed, aborting workflow"
                );
                self.emit(
                    Event::new(EventAction::WorkflowAborted)
                        .with_workflow(workflow_name)
                        .with_details(json!({
                            "step": index + 1,
                            "agent_type": step.agent_type,
                        })),
                );
                aborted = true;
                break;
            }
        }

        let result = WorkflowResult::from_run(RunRecord {
            workflow_name: workflow_name.to_string(),
            task: task.to_string(),
            total_steps,
            results,
            skipped_steps,
            aborted,
            execution_time: started.elapsed().as_secs_f64(),
            initial_context,
            final_context: context.into_map(),
        });

        info!(
            workflow = workflow_name,
            success = result.success,
            completed = result.completed_steps,
            total = result.total_steps,
            "workflow finished"
        );
        self.emit(
            Event::new(EventAction::WorkflowComplete)
                .with_workflow(workflow_name)
                .with_details(json!({
                    "success": result.success,
                    "completed_steps": result.completed_steps,
                    "total_steps": result.total_steps,
                    "skipped_steps": result.skipped_steps.len(),
                    "aborted": result.aborted,
                    "execution_time": result.execution_time,
                })),
        );

        result
    }

    /// Create and execute the agent for one step.
    ///
    /// Returns the result plus whether the agent actually produced it. Errors
    /// and panics from the factory or the agent become a failed result.
    fn invoke(
        &self,
        agent_type: &AgentType,
        task: &str,
        context: &ContextMap,
        stream: bool,
    ) -> (TaskResult, bool) {
        let started = Instant::now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let agent = self.registry.create(agent_type)?;
            agent.execute(task, context, stream)
        }));
        let elapsed = started.elapsed().as_secs_f64();

        match outcome {
            Ok(Ok(mut result)) => {
                if result.execution_time <= 0.0 {
                    result.execution_time = elapsed;
                }
                if result.success {
                    result.error = None;
                } else if result.error.as_deref().is_none_or(str::is_empty) {
                    result.error = Some(UNREPORTED_FAILURE.to_string());
                }
                (result, true)
            }
            Ok(Err(err)) => (
                TaskResult::failure(agent_type.clone(), task, format!("{:#}", err))
                    .with_execution_time(elapsed),
                false,
            ),
            Err(payload) => {
                let message = if let Some(s) = payload.downcast_ref::<&str>() {
                    (*s).to_string()
                } else if let Some(s) = payload.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "agent panicked".to_string()
                };
                (
                    TaskResult::failure(agent_type.clone(), task, message)
                        .with_execution_time(elapsed),
                    false,
                )
            }
        }
    }

    fn emit(&self, event: Event) {
        if let Some(log) = &self.event_log
            && let Err(err) = log.append(&event)
        {
            warn!(path = %log.path().display(), error = %err, "failed to write event log");
        }
    }
}

impl std::fmt::Debug for WorkflowOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowOrchestrator")
            .field("registry", &self.registry)
            .field("workflows", &self.source.workflow_names())
            .field("event_log", &self.event_log)
            .finish()
    }
}
